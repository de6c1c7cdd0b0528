//! # Peerster GUI
//!
//! Polling client for a Peerster gossiper. Keeps a local view of the
//! gossiper's peers, routing table, messages and search matches, and sends
//! the GUI's write commands.
//!
//! ## How it works
//!
//! - A [`Poller`] per resource fetches the full collection every second.
//! - The resource's [`ResourceCache`] accepts a collection only when it is
//!   longer than the cached one (growth-based change detection).
//! - Accepted collections are rebuilt into a [`View`] and handed to a
//!   [`Renderer`].
//! - The [`CommandDispatcher`] validates and posts user commands.
//!
//! ## Modules
//!
//! - [`resource`]: polled collections and their wire shapes
//! - [`cache`]: reconciliation of fetched collections
//! - [`poller`]: per-resource polling tasks
//! - [`render`]: view building and renderers
//! - [`commands`]: command validation and dispatch
//! - [`session`]: wiring of all of the above for one gossiper
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use peerster_gui::{Config, Session, TerminalRenderer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let session = Session::start(&config, Arc::new(TerminalRenderer::stdout()))?;
//!
//!     session
//!         .submit(peerster_gui::Command::PostMessage { text: "hello".into() })
//!         .await
//!         .ok();
//!
//!     tokio::signal::ctrl_c().await?;
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod commands;
pub mod config;
pub mod console;
pub mod poller;
pub mod render;
pub mod resource;
pub mod session;

pub use cache::{ChangeDetection, Reconciliation, ResourceCache};
pub use client::{ApiClient, ClientConfig, ClientError, ClientResult};
pub use commands::{Ack, Command, CommandDispatcher, CommandError, Form, Forms, InputField};
pub use config::{Config, ConfigError, LoggingConfig};
pub use console::{Console, ConsoleAction};
pub use poller::{Fetcher, Poller, PollerConfig};
pub use render::{Notice, NoticeLevel, Renderer, TerminalRenderer, View, ViewNode, ViewOptions};
pub use resource::{
    Message, MessageEntry, Messages, Peers, Resource, ResourceKind, RoutablePeers, SearchMatches,
};
pub use session::Session;
