//! Request and response bodies of the gossiper GUI endpoints.
//!
//! Field names follow the gossiper's JSON exactly, which mixes lower-case
//! keys (`text`, `addr`) with Go-style capitalised ones (`Name`, `Dest`).

use serde::{Deserialize, Serialize};

/// `GET id`
#[derive(Debug, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

/// Body of every successful POST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

impl Default for AckResponse {
    fn default() -> Self {
        Self { success: true }
    }
}

/// `POST message`
#[derive(Debug, Serialize)]
pub struct PostMessageRequest<'a> {
    pub text: &'a str,
}

/// `POST node`
#[derive(Debug, Serialize)]
pub struct AddPeerRequest<'a> {
    pub addr: &'a str,
}

/// `POST routing`
#[derive(Debug, Serialize)]
pub struct PrivateMessageRequest<'a> {
    #[serde(rename = "Text")]
    pub text: &'a str,
    #[serde(rename = "Dest")]
    pub dest: &'a str,
}

/// `POST sharing` and `POST download`
#[derive(Debug, Serialize)]
pub struct FileNameRequest<'a> {
    #[serde(rename = "Name")]
    pub name: &'a str,
}

/// `POST request`
#[derive(Debug, Serialize)]
pub struct RequestFileRequest<'a> {
    #[serde(rename = "Dest")]
    pub dest: &'a str,
    #[serde(rename = "FileName")]
    pub file_name: &'a str,
    #[serde(rename = "MetaHash")]
    pub meta_hash: &'a str,
}

/// `POST search`
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    #[serde(rename = "Keywords")]
    pub keywords: &'a str,
}
