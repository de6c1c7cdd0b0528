//! Client Session
//!
//! Wires one gossiper into a running client: fetches the node id once,
//! starts a poller for each resource and exposes the command dispatcher.
//! Pollers live as long as the session; [`Session::shutdown`] stops them.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::{ApiClient, ClientResult};
use crate::commands::{outcome_notice, Ack, Command, CommandDispatcher, CommandError, Form};
use crate::config::Config;
use crate::poller::{Fetcher, Poller, PollerConfig};
use crate::render::Renderer;
use crate::resource::{Messages, Peers, Resource, RoutablePeers, SearchMatches};

/// A running client attached to one gossiper
pub struct Session {
    dispatcher: CommandDispatcher,
    renderer: Arc<dyn Renderer>,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Session {
    /// Connect to the configured gossiper and start polling
    pub fn start(config: &Config, renderer: Arc<dyn Renderer>) -> ClientResult<Self> {
        let client = ApiClient::new(config.client_config())?;
        Ok(Self::with_client(client, config.poller_config(), renderer))
    }

    pub fn with_client(
        client: ApiClient,
        poller_config: PollerConfig,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);

        tracing::info!(gossiper = client.base_url(), "Starting session");

        let mut tasks = vec![spawn_identity(client.clone(), Arc::clone(&renderer))];
        tasks.push(spawn_poller::<Messages>(&client, &poller_config, &renderer, &shutdown_rx));
        tasks.push(spawn_poller::<Peers>(&client, &poller_config, &renderer, &shutdown_rx));
        tasks.push(spawn_poller::<RoutablePeers>(&client, &poller_config, &renderer, &shutdown_rx));
        tasks.push(spawn_poller::<SearchMatches>(&client, &poller_config, &renderer, &shutdown_rx));

        Self {
            dispatcher: CommandDispatcher::new(client),
            renderer,
            shutdown,
            tasks,
        }
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Submit a command and surface its outcome through the renderer
    pub async fn submit(&self, command: Command) -> Result<Ack, CommandError> {
        let result = self.dispatcher.submit(command).await;
        self.renderer.notify(&outcome_notice(&result));
        result
    }

    /// Submit a command on its own task.
    ///
    /// The outcome is rendered when the request completes; the handle
    /// yields the same result.
    pub fn spawn_submit(&self, command: Command) -> JoinHandle<Result<Ack, CommandError>> {
        let dispatcher = self.dispatcher.clone();
        let renderer = Arc::clone(&self.renderer);

        tokio::spawn(async move {
            let result = dispatcher.submit(command).await;
            renderer.notify(&outcome_notice(&result));
            result
        })
    }

    /// Submit the command held by `form`, clearing it first
    pub async fn submit_form<F: Form + ?Sized>(&self, form: &mut F) -> Result<Ack, CommandError> {
        let result = self.dispatcher.submit_form(form).await;
        self.renderer.notify(&outcome_notice(&result));
        result
    }

    /// Stop all pollers and wait for them to finish
    pub async fn shutdown(self) {
        // Receivers may already be gone if every poller has exited
        let _ = self.shutdown.send(true);

        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!("Session task ended abnormally: {}", e);
            }
        }

        tracing::info!("Session stopped");
    }
}

fn spawn_identity(client: ApiClient, renderer: Arc<dyn Renderer>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match client.node_id().await {
            Ok(id) => renderer.identity(&id),
            Err(e) => tracing::warn!("Failed to fetch node id: {}", e),
        }
    })
}

fn spawn_poller<R: Resource>(
    client: &ApiClient,
    config: &PollerConfig,
    renderer: &Arc<dyn Renderer>,
    shutdown: &watch::Receiver<bool>,
) -> JoinHandle<()>
where
    ApiClient: Fetcher<R>,
{
    let fetcher: Arc<dyn Fetcher<R>> = Arc::new(client.clone());
    let poller = Poller::<R>::new(fetcher, Arc::clone(renderer), config.clone());
    let shutdown = shutdown.clone();

    tokio::spawn(async move {
        poller.run(shutdown).await;
    })
}
