use std::sync::Arc;
use shared::protocol::SCHEME;
use crate::config::{EngineSettings, ResolverConfig};
use crate::engine::ResolutionEngine;
use crate::error::ResolverError;
use crate::locator::{Locator, Target};
use crate::mdns::MdnsDiscovery;
use crate::resolver::Builder;
use crate::sink::ConsumerSink;

/// Builds mDNS resolvers for `mdns://<service>/<instance>.<domain>` targets.
#[derive(Debug, Clone, Default)]
pub struct MdnsBuilder {
    config: ResolverConfig,
}

impl MdnsBuilder {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }
}

impl Builder for MdnsBuilder {
    type Resolver = ResolutionEngine;

    fn scheme(&self) -> &'static str {
        SCHEME
    }

    /// Fails synchronously on a malformed target or when the local interfaces
    /// cannot be bound. The locator is validated before any socket is opened.
    fn build(
        &self,
        target: &Target,
        sink: Arc<dyn ConsumerSink>,
    ) -> Result<ResolutionEngine, ResolverError> {
        let locator = Locator::from_target(target)?;
        let discovery = MdnsDiscovery::bind(&self.config.interfaces)?;

        Ok(ResolutionEngine::spawn(
            locator,
            Arc::new(discovery),
            sink,
            EngineSettings::from(&self.config),
        ))
    }
}
