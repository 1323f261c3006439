//! Background lookup/watch lifecycle for one resolution target.
//!
//! Two tasks run per engine:
//! - the lookup task waits for a resolve-now signal, runs one discovery query
//!   bounded by `lookup_timeout`, then holds for `min_resolve_interval` before
//!   accepting the next signal;
//! - the watch task turns every delivered record into a full-replacement
//!   address update for the consumer.
//!
//! Both observe a single `CancellationToken` and are joined through a
//! `TaskTracker`, so once `close()` returns neither task can touch the discovery
//! client or the consumer again.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use shared::types::{DiscoveredRecord, ResolverState};
use crate::config::EngineSettings;
use crate::discovery::DiscoveryClient;
use crate::error::DiscoveryError;
use crate::locator::Locator;
use crate::resolver::Resolver;
use crate::sink::ConsumerSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    /// Cancellation has been signalled but the tasks have not been joined yet.
    /// Only observable when a `close()` future is dropped before it completes;
    /// calling `close()` again finishes the shutdown.
    Stopping,
    Stopped,
}

pub struct ResolutionEngine {
    locator: Arc<Locator>,
    discovery: Arc<dyn DiscoveryClient>,
    /// Single-slot queue of resolve-now requests; extra requests are dropped
    resolve_tx: mpsc::Sender<()>,
    cancel: CancellationToken,
    tasks: TaskTracker,
    lifecycle: Lifecycle,
}

impl ResolutionEngine {
    /// Start the lookup and watch tasks and prime them with one resolve-now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        locator: Locator,
        discovery: Arc<dyn DiscoveryClient>,
        sink: Arc<dyn ConsumerSink>,
        settings: EngineSettings,
    ) -> Self {
        let locator = Arc::new(locator);
        let cancel = CancellationToken::new();
        let tasks = TaskTracker::new();

        let (resolve_tx, resolve_rx) = mpsc::channel(1);
        let (entries_tx, entries_rx) = mpsc::channel(settings.entries_capacity.max(1));

        tasks.spawn(lookup_loop(
            locator.clone(),
            discovery.clone(),
            entries_tx,
            resolve_rx,
            settings,
            cancel.clone(),
        ));
        tasks.spawn(watch_loop(locator.clone(), entries_rx, sink, cancel.clone()));
        tasks.close();

        tracing::info!("Started mDNS resolver for {}", locator);

        let engine = Self {
            locator,
            discovery,
            resolve_tx,
            cancel,
            tasks,
            lifecycle: Lifecycle::Running,
        };
        engine.resolve_now();
        engine
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

impl Resolver for ResolutionEngine {
    fn resolve_now(&self) {
        // Full means a request is already pending; closed means we are shut down.
        let _ = self.resolve_tx.try_send(());
    }

    fn close(&mut self) -> impl Future<Output = ()> + Send {
        async move {
            if self.lifecycle == Lifecycle::Stopped {
                return;
            }

            self.lifecycle = Lifecycle::Stopping;
            self.cancel.cancel();
            self.tasks.wait().await;

            self.discovery.shutdown();
            self.lifecycle = Lifecycle::Stopped;
            tracing::info!("Closed mDNS resolver for {}", self.locator);
        }
    }
}

impl Drop for ResolutionEngine {
    /// Cancels the tasks without joining them. The discovery client is shut
    /// down once both tasks have exited.
    fn drop(&mut self) {
        if self.lifecycle == Lifecycle::Stopped {
            return;
        }
        self.cancel.cancel();

        let tasks = self.tasks.clone();
        let discovery = self.discovery.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tasks.wait().await;
                    discovery.shutdown();
                });
            }
            // Without a runtime the tasks can no longer be polled.
            Err(_) => discovery.shutdown(),
        }
    }
}

async fn lookup_loop(
    locator: Arc<Locator>,
    discovery: Arc<dyn DiscoveryClient>,
    entries: mpsc::Sender<DiscoveredRecord>,
    mut resolve_rx: mpsc::Receiver<()>,
    settings: EngineSettings,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            signal = resolve_rx.recv() => {
                if signal.is_none() {
                    break;
                }
            }
        }

        // The query is not cancelled on shutdown; its deadline bounds it.
        let deadline = Instant::now() + settings.lookup_timeout;
        let query = discovery.lookup(&locator, deadline, entries.clone());
        match tokio::time::timeout_at(deadline, query).await {
            Ok(Ok(found)) => {
                tracing::debug!("Lookup for {} delivered {} record(s)", locator, found);
            }
            Ok(Err(DiscoveryError::Timeout)) | Err(_) => {
                tracing::debug!("Lookup for {} timed out without a response", locator);
            }
            Ok(Err(e)) => {
                tracing::warn!("Lookup for {} failed: {}", locator, e);
            }
        }

        // Requests arriving during the hold stay queued in resolve_rx.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(settings.min_resolve_interval) => {}
        }
    }

    tracing::info!("Lookup task for {} shutting down", locator);
}

async fn watch_loop(
    locator: Arc<Locator>,
    mut entries: mpsc::Receiver<DiscoveredRecord>,
    sink: Arc<dyn ConsumerSink>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            entry = entries.recv() => {
                let Some(record) = entry else {
                    break;
                };
                if record.is_empty() {
                    tracing::debug!("Ignoring record without IPv4 addresses for {}", locator);
                    continue;
                }

                let state = ResolverState::from(&record);
                for address in &state.addresses {
                    tracing::info!("Resolved {} to {}", locator, address);
                }
                sink.update_state(state);
            }
        }
    }

    tracing::info!("Watch task for {} shutting down", locator);
}
