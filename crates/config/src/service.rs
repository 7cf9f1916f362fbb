//! Service-wide engine settings

use serde::Deserialize;
use std::time::Duration;

/// Engine-wide settings
///
/// # Example
///
/// ```toml
/// [service]
/// flush_interval = "5s"
/// grace_period = "5s"
/// retry_limit = 5
/// retry_base = "1s"
/// retry_cap = "60s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Interval of the periodic global flush
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub flush_interval: Duration,

    /// Grace period between a stop request and forced termination
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub grace_period: Duration,

    /// Maximum scheduled retries per (task, destination) pair
    /// Default: 5
    pub retry_limit: u32,

    /// Backoff delay of the first retry
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub retry_base: Duration,

    /// Upper bound on any retry delay
    /// Default: 60s
    #[serde(with = "humantime_serde")]
    pub retry_cap: Duration,

    /// Enable the in-memory buffering adapter
    /// Default: false
    pub buffering: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_secs(5),
            grace_period: Duration::from_secs(5),
            retry_limit: 5,
            retry_base: Duration::from_secs(1),
            retry_cap: Duration::from_secs(60),
            buffering: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.flush_interval, Duration::from_secs(5));
        assert_eq!(config.grace_period, Duration::from_secs(5));
        assert_eq!(config.retry_limit, 5);
        assert!(!config.buffering);
    }

    #[test]
    fn test_deserialize_with_durations() {
        let toml = r#"
flush_interval = "250ms"
retry_cap = "2m"
"#;
        let config: ServiceConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.flush_interval, Duration::from_millis(250));
        assert_eq!(config.retry_cap, Duration::from_secs(120));
        // untouched fields keep defaults
        assert_eq!(config.retry_limit, 5);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.retry_base, Duration::from_secs(1));
    }
}
