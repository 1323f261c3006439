use shared::types::ResolverState;
use tokio::sync::{mpsc, watch};

/// Receives address updates from the resolver.
///
/// Every call carries the complete address set and replaces whatever was
/// delivered before.
pub trait ConsumerSink: Send + Sync + 'static {
    fn update_state(&self, state: ResolverState);
}

/// Latest-value consumers: receivers only ever see the current address set.
impl ConsumerSink for watch::Sender<ResolverState> {
    fn update_state(&self, state: ResolverState) {
        self.send_replace(state);
    }
}

/// Every update, in delivery order.
impl ConsumerSink for mpsc::UnboundedSender<ResolverState> {
    fn update_state(&self, state: ResolverState) {
        if self.send(state).is_err() {
            tracing::debug!("Address update dropped, consumer has gone away");
        }
    }
}
