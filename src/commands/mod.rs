//! Command Dispatch
//!
//! User actions become one-shot write requests. Each command is validated
//! locally, sent as a single JSON POST and answered with an [`Ack`] or a
//! [`CommandError`]; there is no retry. The dispatcher never touches a
//! resource cache: a successful write shows up only once a later poll sees
//! a longer collection.

mod error;
pub mod forms;
mod validate;

pub use error::CommandError;
pub use forms::{Form, Forms, InputField};
pub use validate::validate_peer_address;

use crate::client::dto::{
    AckResponse, AddPeerRequest, FileNameRequest, PostMessageRequest, PrivateMessageRequest,
    RequestFileRequest, SearchRequest,
};
use crate::client::{ApiClient, ClientResult};
use crate::render::Notice;

/// A user-initiated write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Broadcast a chat message
    PostMessage { text: String },
    /// Add a peer by address
    AddPeer { addr: String },
    /// Send a private message to a routable peer
    PrivateMessage { dest: String, text: String },
    /// Index a local file for sharing
    ShareFile { name: String },
    /// Request a file by metahash from a peer
    RequestFile {
        dest: String,
        file_name: String,
        meta_hash: String,
    },
    /// Start a keyword search (comma-separated keywords)
    Search { keywords: String },
    /// Download a previously matched file
    Download { name: String },
}

impl Command {
    /// Human-readable command name
    pub fn name(&self) -> &'static str {
        match self {
            Command::PostMessage { .. } => "Post message",
            Command::AddPeer { .. } => "Add peer",
            Command::PrivateMessage { .. } => "Private message",
            Command::ShareFile { .. } => "Share file",
            Command::RequestFile { .. } => "Request file",
            Command::Search { .. } => "Search",
            Command::Download { .. } => "Download",
        }
    }

    /// Endpoint path the command is posted to
    pub fn path(&self) -> &'static str {
        match self {
            Command::PostMessage { .. } => "message",
            Command::AddPeer { .. } => "node",
            Command::PrivateMessage { .. } => "routing",
            Command::ShareFile { .. } => "sharing",
            Command::RequestFile { .. } => "request",
            Command::Search { .. } => "search",
            Command::Download { .. } => "download",
        }
    }

    /// Local checks run before any request is made.
    ///
    /// Only peer addresses are checked; every other payload is forwarded
    /// as typed, empty values included.
    pub fn validate(&self) -> Result<(), CommandError> {
        match self {
            Command::AddPeer { addr } => validate_peer_address(addr),
            _ => Ok(()),
        }
    }

    fn success_text(&self) -> &'static str {
        match self {
            Command::PostMessage { .. } => "Message posted",
            Command::AddPeer { .. } => "Peer added",
            Command::PrivateMessage { .. } => "Private message sent",
            Command::ShareFile { .. } => "File shared",
            Command::RequestFile { .. } => "File requested",
            Command::Search { .. } => "Search started",
            Command::Download { .. } => "Download started",
        }
    }
}

/// Successful acknowledgement of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub command: &'static str,
    pub message: &'static str,
}

impl Ack {
    pub fn notice(&self) -> Notice {
        Notice::success(self.message)
    }
}

/// Turns commands into POST requests
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    client: ApiClient,
}

impl CommandDispatcher {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Take the command out of `form` (clearing it) and submit it
    pub async fn submit_form<F: Form + ?Sized>(&self, form: &mut F) -> Result<Ack, CommandError> {
        let command = form.take_command();
        self.submit(command).await
    }

    /// Validate and send one command
    pub async fn submit(&self, command: Command) -> Result<Ack, CommandError> {
        if let Err(e) = command.validate() {
            tracing::debug!(command = command.name(), "Validation failed: {}", e);
            return Err(e);
        }

        tracing::debug!(command = command.name(), path = command.path(), "Submitting command");

        let result = self.send(&command).await;
        match result {
            Ok(ack) if ack.success => {
                tracing::info!(command = command.name(), "Command acknowledged");
                Ok(Ack {
                    command: command.name(),
                    message: command.success_text(),
                })
            }
            Ok(_) => {
                tracing::warn!(command = command.name(), "Command rejected");
                Err(CommandError::Rejected {
                    command: command.name(),
                })
            }
            Err(source) => {
                if let (Command::ShareFile { name }, Some(status)) = (&command, source.status()) {
                    tracing::warn!(file = %name, status, "Share rejected");
                    return Err(CommandError::ShareRejected {
                        name: name.clone(),
                        status,
                    });
                }

                tracing::warn!(command = command.name(), "Command failed: {}", source);
                Err(CommandError::Failed {
                    command: command.name(),
                    source,
                })
            }
        }
    }

    async fn send(&self, command: &Command) -> ClientResult<AckResponse> {
        let path = command.path();
        match command {
            Command::PostMessage { text } => {
                self.client.post(path, &PostMessageRequest { text }).await
            }
            Command::AddPeer { addr } => self.client.post(path, &AddPeerRequest { addr }).await,
            Command::PrivateMessage { dest, text } => {
                self.client
                    .post(path, &PrivateMessageRequest { text, dest })
                    .await
            }
            Command::ShareFile { name } | Command::Download { name } => {
                self.client.post(path, &FileNameRequest { name }).await
            }
            Command::RequestFile {
                dest,
                file_name,
                meta_hash,
            } => {
                self.client
                    .post(
                        path,
                        &RequestFileRequest {
                            dest,
                            file_name,
                            meta_hash,
                        },
                    )
                    .await
            }
            Command::Search { keywords } => {
                self.client.post(path, &SearchRequest { keywords }).await
            }
        }
    }
}

/// Notice to show for a command outcome
pub fn outcome_notice(result: &Result<Ack, CommandError>) -> Notice {
    match result {
        Ok(ack) => ack.notice(),
        Err(e) => e.notice(),
    }
}
