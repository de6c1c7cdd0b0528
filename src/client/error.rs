//! Transport error types

use thiserror::Error;

/// Errors that can occur while talking to the gossiper GUI endpoints
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection refused or host unreachable
    #[error("Gossiper unavailable at {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not the expected JSON
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Status code of a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
