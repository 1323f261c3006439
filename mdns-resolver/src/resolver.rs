use std::future::Future;
use std::sync::Arc;
use crate::error::ResolverError;
use crate::locator::Target;
use crate::sink::ConsumerSink;

/// A running name resolver as seen by the host.
pub trait Resolver: Send {
    /// Ask for a fresh resolution. This is a hint: it never blocks, and a
    /// request made while another is pending is dropped.
    fn resolve_now(&self);

    /// Stop background work and wait until it has fully exited.
    /// No update reaches the consumer after this returns. Calling it again is a no-op.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Creates resolvers for targets of one URI scheme.
pub trait Builder: Send + Sync {
    type Resolver: Resolver;

    fn scheme(&self) -> &'static str;

    fn build(
        &self,
        target: &Target,
        sink: Arc<dyn ConsumerSink>,
    ) -> Result<Self::Resolver, ResolverError>;
}
