use futures::future::BoxFuture;
use shared::types::DiscoveredRecord;
use tokio::sync::mpsc;
use tokio::time::Instant;
use crate::error::DiscoveryError;
use crate::locator::Locator;

/// A multicast discovery backend.
///
/// One `lookup` call is one query: it delivers zero or more records onto
/// `entries` and returns once `deadline` has passed or the query is exhausted.
/// The returned count is informational only.
pub trait DiscoveryClient: Send + Sync + 'static {
    fn lookup<'a>(
        &'a self,
        locator: &'a Locator,
        deadline: Instant,
        entries: mpsc::Sender<DiscoveredRecord>,
    ) -> BoxFuture<'a, Result<usize, DiscoveryError>>;

    /// Release backend resources. Called once, after the engine's tasks have exited.
    fn shutdown(&self) {}
}
