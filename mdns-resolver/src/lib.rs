//! # mdns-resolver
//!
//! Resolves `mdns://<service>/<instance>.<domain>` targets to IPv4 `host:port`
//! addresses using multicast DNS-SD, and keeps pushing fresh address sets to a
//! consumer until closed.
//!
//! ```no_run
//! use std::sync::Arc;
//! use mdns_resolver::{Builder, MdnsBuilder, Resolver, ResolverConfig, Target};
//! use shared::types::ResolverState;
//!
//! # async fn run() -> Result<(), mdns_resolver::ResolverError> {
//! let (tx, mut rx) = tokio::sync::watch::channel(ResolverState::default());
//! let target = Target::parse("mdns://_myservice._tcp/instance1.local")?;
//! let mut resolver = MdnsBuilder::new(ResolverConfig::default()).build(&target, Arc::new(tx))?;
//!
//! rx.changed().await.ok();
//! println!("{:?}", rx.borrow().addrs());
//! resolver.close().await;
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod discovery;
mod engine;
mod error;
mod locator;
mod mdns;
mod resolver;
mod sink;

pub use builder::MdnsBuilder;
pub use config::{EngineSettings, ResolverConfig};
pub use discovery::DiscoveryClient;
pub use engine::{Lifecycle, ResolutionEngine};
pub use error::{DiscoveryError, ResolverError};
pub use locator::{Locator, Target};
pub use mdns::MdnsDiscovery;
pub use resolver::{Builder, Resolver};
pub use sink::ConsumerSink;
