//! Gossiper HTTP Client
//!
//! Thin JSON client for the gossiper's GUI endpoints. Every `GET` returns
//! the full current collection of a resource; every `POST` carries one
//! command payload and answers with an ack.

pub mod dto;
mod error;

pub use error::{ClientError, ClientResult};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;

use crate::poller::Fetcher;
use crate::resource::Resource;
use dto::{AckResponse, IdResponse};

/// Connection settings for [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the gossiper GUI server (e.g. "http://127.0.0.1:13081")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:13081".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

/// HTTP client for one gossiper. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn classify(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Unavailable(self.base_url.clone())
        } else {
            ClientError::Request(e)
        }
    }

    /// Read a 2xx body as text, or turn the response into a status error
    async fn body_text(&self, response: Response) -> ClientResult<String> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    /// Fetch the gossiper's node name
    pub async fn node_id(&self) -> ClientResult<String> {
        let response = self
            .client
            .get(self.url("id"))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let text = self.body_text(response).await?;
        let body: IdResponse = serde_json::from_str(&text)?;
        Ok(body.id)
    }

    /// Fetch the full current collection of `R`
    pub async fn collection<R: Resource>(&self) -> ClientResult<Vec<R::Item>> {
        let response = self
            .client
            .get(self.url(R::PATH))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let text = self.body_text(response).await?;
        let body: R::Body = serde_json::from_str(&text)?;
        Ok(R::items(body))
    }

    /// POST one JSON command payload.
    ///
    /// An empty or non-JSON 2xx body counts as a successful ack.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<AckResponse> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let text = self.body_text(response).await?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}

#[async_trait]
impl<R: Resource> Fetcher<R> for ApiClient {
    async fn fetch(&self) -> ClientResult<Vec<R::Item>> {
        self.collection::<R>().await
    }
}
