use std::collections::HashMap;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};
use serde::{Serialize, Deserialize};

/// One discovery response for a single service instance.
/// Produced by the discovery client and read once by the resolver's watch task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredRecord {
    /// Full DNS-SD instance name, e.g. "instance1._svc._tcp.local."
    pub instance_name: String,

    /// Hostname, e.g. "nas.local."
    pub hostname: String,

    /// IPv4 addresses in the order the record carries them
    pub addr_ipv4: Vec<Ipv4Addr>,

    /// Service port
    pub port: u16,

    /// TXT record key-value pairs
    pub txt: HashMap<String, String>,
}

impl DiscoveredRecord {
    /// A record with no IPv4 addresses carries nothing to advertise.
    pub fn is_empty(&self) -> bool {
        self.addr_ipv4.is_empty()
    }

    /// One address per IPv4 entry, each paired with the record's port.
    /// Order is preserved and duplicates are kept.
    pub fn addresses(&self) -> Vec<Address> {
        self.addr_ipv4
            .iter()
            .map(|ip| Address::from(SocketAddrV4::new(*ip, self.port)))
            .collect()
    }
}

/// A resolved `host:port` endpoint handed to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub addr: String,
}

impl From<SocketAddrV4> for Address {
    fn from(addr: SocketAddrV4) -> Self {
        Self { addr: addr.to_string() }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addr)
    }
}

/// Full-replacement address set pushed to the consumer on every update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverState {
    pub addresses: Vec<Address>,
}

impl ResolverState {
    pub fn addrs(&self) -> Vec<&str> {
        self.addresses.iter().map(|a| a.addr.as_str()).collect()
    }
}

impl From<&DiscoveredRecord> for ResolverState {
    fn from(record: &DiscoveredRecord) -> Self {
        Self { addresses: record.addresses() }
    }
}
