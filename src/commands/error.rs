//! Command error types

use thiserror::Error;

use crate::client::ClientError;
use crate::render::Notice;

/// Errors surfaced by the command dispatcher
#[derive(Error, Debug)]
pub enum CommandError {
    /// Peer address failed local validation; no request was sent
    #[error("Bad IP address: {0}")]
    InvalidAddress(String),

    /// The gossiper refused to share the named file
    #[error("Input file name not valid: {name}")]
    ShareRejected { name: String, status: u16 },

    /// 2xx answer carrying `success: false`
    #[error("{command} rejected by gossiper")]
    Rejected { command: &'static str },

    /// Network failure or non-2xx answer
    #[error("{command} failed: {source}")]
    Failed {
        command: &'static str,
        #[source]
        source: ClientError,
    },
}

impl CommandError {
    /// True when the command never left the client
    pub fn is_validation(&self) -> bool {
        matches!(self, CommandError::InvalidAddress(_))
    }

    pub fn notice(&self) -> Notice {
        Notice::failure(self.to_string())
    }
}
