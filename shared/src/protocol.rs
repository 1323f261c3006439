/// URI scheme the mDNS resolver is registered under, e.g. `mdns://_svc._tcp/instance1.local`
pub const SCHEME: &str = "mdns";

/// Separator between the instance name and the domain in a locator endpoint
pub const DOMAIN_SEPARATOR: char = '.';

/// Upper bound on a single discovery query
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 30;

/// Minimum spacing between two discovery queries for the same target
pub const DEFAULT_MIN_RESOLVE_INTERVAL_SECS: u64 = 30;

/// Buffered records between the lookup and watch tasks
pub const DEFAULT_ENTRIES_CAPACITY: usize = 10;
