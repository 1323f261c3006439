use std::time::Duration;
use serde::Deserialize;
use shared::protocol::{
    DEFAULT_ENTRIES_CAPACITY, DEFAULT_LOOKUP_TIMEOUT_SECS, DEFAULT_MIN_RESOLVE_INTERVAL_SECS,
};

/// Resolver configuration as read from a config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Upper bound on a single discovery query
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
    /// Minimum spacing between successive discovery queries
    #[serde(default = "default_min_resolve_interval")]
    pub min_resolve_interval_secs: u64,
    /// Records buffered between the lookup and watch tasks
    #[serde(default = "default_entries_capacity")]
    pub entries_capacity: usize,
    /// Interface names to query on. Empty means every local interface.
    #[serde(default)]
    pub interfaces: Vec<String>,
}

fn default_lookup_timeout() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT_SECS
}

fn default_min_resolve_interval() -> u64 {
    DEFAULT_MIN_RESOLVE_INTERVAL_SECS
}

fn default_entries_capacity() -> usize {
    DEFAULT_ENTRIES_CAPACITY
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_secs: default_lookup_timeout(),
            min_resolve_interval_secs: default_min_resolve_interval(),
            entries_capacity: default_entries_capacity(),
            interfaces: Vec::new(),
        }
    }
}

/// Timing knobs the resolution engine runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub lookup_timeout: Duration,
    pub min_resolve_interval: Duration,
    pub entries_capacity: usize,
}

impl EngineSettings {
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn with_min_resolve_interval(mut self, interval: Duration) -> Self {
        self.min_resolve_interval = interval;
        self
    }

    pub fn with_entries_capacity(mut self, capacity: usize) -> Self {
        self.entries_capacity = capacity;
        self
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&ResolverConfig::default())
    }
}

impl From<&ResolverConfig> for EngineSettings {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            lookup_timeout: Duration::from_secs(config.lookup_timeout_secs),
            min_resolve_interval: Duration::from_secs(config.min_resolve_interval_secs),
            // tokio channels panic on a zero bound
            entries_capacity: config.entries_capacity.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();

        assert_eq!(settings.lookup_timeout, Duration::from_secs(30));
        assert_eq!(settings.min_resolve_interval, Duration::from_secs(30));
        assert_eq!(settings.entries_capacity, 10);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ResolverConfig = toml::from_str(
            r#"
            min_resolve_interval_secs = 5
            interfaces = ["eth0"]
            "#,
        )
        .unwrap();

        assert_eq!(config.lookup_timeout_secs, 30);
        assert_eq!(config.min_resolve_interval_secs, 5);
        assert_eq!(config.interfaces, vec!["eth0".to_string()]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let config = ResolverConfig {
            entries_capacity: 0,
            ..ResolverConfig::default()
        };

        assert_eq!(EngineSettings::from(&config).entries_capacity, 1);
    }
}
