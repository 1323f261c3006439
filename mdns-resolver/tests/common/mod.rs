//! Shared test infrastructure for resolver lifecycle tests.

use std::collections::{HashMap, VecDeque};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::time::Instant;

use mdns_resolver::{ConsumerSink, DiscoveryClient, DiscoveryError, EngineSettings, Locator};
use shared::types::{DiscoveredRecord, ResolverState};

// --- Constants ---

pub const SERVICE: &str = "_svc._tcp";
pub const ENDPOINT: &str = "instance1.local";
pub const WINDOW: Duration = Duration::from_secs(30);

// --- ScriptedDiscovery ---

/// What one lookup call does.
pub enum Step {
    /// Deliver these records, then return.
    Deliver(Vec<DiscoveredRecord>),
    /// Return a query error without delivering anything.
    Fail,
    /// Deliver nothing and only return at the deadline.
    Hang,
}

/// Discovery double that plays back a script, one step per lookup call.
///
/// Every call reports its start time on the channel returned by `new`, so tests
/// can observe exactly when the engine dispatched a query.
pub struct ScriptedDiscovery {
    script: Mutex<VecDeque<Step>>,
    calls: mpsc::UnboundedSender<Instant>,
    shutdowns: AtomicUsize,
}

impl ScriptedDiscovery {
    pub fn new(script: Vec<Step>) -> (Arc<Self>, mpsc::UnboundedReceiver<Instant>) {
        let (calls, calls_rx) = mpsc::unbounded_channel();
        let discovery = Arc::new(Self {
            script: Mutex::new(script.into()),
            calls,
            shutdowns: AtomicUsize::new(0),
        });
        (discovery, calls_rx)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

impl DiscoveryClient for ScriptedDiscovery {
    fn lookup<'a>(
        &'a self,
        _locator: &'a Locator,
        deadline: Instant,
        entries: mpsc::Sender<DiscoveredRecord>,
    ) -> BoxFuture<'a, Result<usize, DiscoveryError>> {
        let _ = self.calls.send(Instant::now());
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Step::Deliver(Vec::new()));

        Box::pin(async move {
            match step {
                Step::Deliver(records) => {
                    let count = records.len();
                    for record in records {
                        entries.send(record).await.unwrap();
                    }
                    Ok(count)
                }
                Step::Fail => Err(DiscoveryError::QueryFailed("no responders".to_string())),
                Step::Hang => {
                    tokio::time::sleep_until(deadline).await;
                    Err(DiscoveryError::Timeout)
                }
            }
        })
    }

    fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

// --- Builders ---

pub fn locator() -> Locator {
    Locator::parse(SERVICE, ENDPOINT).unwrap()
}

pub fn settings() -> EngineSettings {
    EngineSettings::default()
        .with_lookup_timeout(WINDOW)
        .with_min_resolve_interval(WINDOW)
}

pub fn record(ips: &[[u8; 4]], port: u16) -> DiscoveredRecord {
    DiscoveredRecord {
        instance_name: "instance1._svc._tcp.local.".to_string(),
        hostname: "instance1.local.".to_string(),
        addr_ipv4: ips.iter().map(|o| Ipv4Addr::from(*o)).collect(),
        port,
        txt: HashMap::new(),
    }
}

/// Sink that records every update in order. The engine holds the only sender.
pub fn update_sink() -> (Arc<dyn ConsumerSink>, mpsc::UnboundedReceiver<ResolverState>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(tx), rx)
}
