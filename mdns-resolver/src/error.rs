//! Error types for the mDNS resolver.

use thiserror::Error;

/// Errors returned synchronously while building a resolver.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The target could not be decomposed into instance, service and domain
    #[error("invalid locator: {0}")]
    InvalidLocator(String),

    /// Interface enumeration or discovery client construction failed
    #[error("initialization failed: {0}")]
    InitializationFailed(String),
}

/// Errors from a single discovery query.
///
/// These are expected under normal multicast conditions and never reach the
/// consumer; the lookup task logs them and waits for its next cycle.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("discovery query failed: {0}")]
    QueryFailed(String),

    #[error("discovery query timed out")]
    Timeout,
}

impl From<mdns_sd::Error> for DiscoveryError {
    fn from(e: mdns_sd::Error) -> Self {
        Self::QueryFailed(e.to_string())
    }
}
