//! Resource Poller
//!
//! One long-lived task per resource. Every interval it fires an
//! independent fetch; results are reconciled by the task that owns the
//! cache, in the order they arrive, and a changed cache is re-rendered.
//!
//! A failed fetch (network error, bad status, malformed JSON) is dropped.
//! Nothing is shown to the user and nothing is retried out of band: the
//! next tick is the retry.
//!
//! Pollers run until the shutdown signal fires or its sender is dropped.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::cache::{ChangeDetection, ResourceCache};
use crate::client::ClientResult;
use crate::render::{Renderer, View, ViewOptions};
use crate::resource::Resource;

/// Shortest accepted polling period
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Source of full collections for one resource
#[async_trait]
pub trait Fetcher<R: Resource>: Send + Sync + 'static {
    async fn fetch(&self) -> ClientResult<Vec<R::Item>>;
}

/// Scheduling and presentation settings of a poller
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    pub change_detection: ChangeDetection,
    pub view: ViewOptions,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            change_detection: ChangeDetection::Growth,
            view: ViewOptions::default(),
        }
    }
}

/// Polls one resource and keeps its cache and view current
pub struct Poller<R: Resource> {
    fetcher: Arc<dyn Fetcher<R>>,
    renderer: Arc<dyn Renderer>,
    config: PollerConfig,
}

impl<R: Resource> Poller<R> {
    pub fn new(
        fetcher: Arc<dyn Fetcher<R>>,
        renderer: Arc<dyn Renderer>,
        mut config: PollerConfig,
    ) -> Self {
        // tokio's interval panics on a zero period
        config.interval = config.interval.max(MIN_INTERVAL);

        Self {
            fetcher,
            renderer,
            config,
        }
    }

    /// Spawn the polling task.
    ///
    /// The handle yields the final cache once the poller stops.
    pub fn start(self, shutdown: watch::Receiver<bool>) -> JoinHandle<ResourceCache<R::Item>> {
        tokio::spawn(self.run(shutdown))
    }

    /// Poll until shutdown, then return the cache
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> ResourceCache<R::Item> {
        let mut cache = ResourceCache::with_strategy(self.config.change_detection);

        if *shutdown.borrow() {
            return cache;
        }

        let (results_tx, mut results_rx) = mpsc::unbounded_channel();
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(
            resource = %R::KIND,
            interval_ms = self.config.interval.as_millis() as u64,
            "Poller started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let fetcher = Arc::clone(&self.fetcher);
                    let results_tx = results_tx.clone();
                    tokio::spawn(async move {
                        let result = fetcher.fetch().await;
                        // Receiver is gone once the poller has stopped
                        let _ = results_tx.send(result);
                    });
                }
                Some(result) = results_rx.recv() => {
                    self.apply(&mut cache, result);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!(resource = %R::KIND, entries = cache.len(), "Poller stopped");
        cache
    }

    fn apply(&self, cache: &mut ResourceCache<R::Item>, result: ClientResult<Vec<R::Item>>) {
        match result {
            Ok(items) => {
                let incoming = items.len();
                if cache.reconcile(items).is_changed() {
                    tracing::debug!(resource = %R::KIND, entries = incoming, "Cache changed");
                    let view = View::build::<R>(cache.current(), &self.config.view);
                    self.renderer.render(R::KIND, &view);
                } else {
                    tracing::trace!(
                        resource = %R::KIND,
                        incoming,
                        cached = cache.len(),
                        "Cache unchanged"
                    );
                }
            }
            Err(e) => {
                tracing::debug!(resource = %R::KIND, "Poll dropped: {}", e);
            }
        }
    }
}
