//! Engine configuration
//!
//! One explicit settings object, built once at startup and handed to the
//! engine; there is no ambient global state.

use std::time::Duration;

/// Engine settings
///
/// All fields have defaults matching the service defaults; construct with
/// struct update syntax to override individual values.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Interval of the periodic global flush
    pub flush_interval: Duration,

    /// Grace period between a stop request and forced termination
    pub grace_period: Duration,

    /// Maximum scheduled retries per (task, destination) pair; the request
    /// after the limit converts to a permanent error
    pub retry_limit: u32,

    /// Backoff delay of the first retry
    pub retry_base: Duration,

    /// Upper bound on any retry delay
    pub retry_cap: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_secs(5),
            grace_period: Duration::from_secs(5),
            retry_limit: 5,
            retry_base: Duration::from_secs(1),
            retry_cap: Duration::from_secs(60),
        }
    }
}
