//! Collector specification
//!
//! Describes how the engine drives an input's `collect` callback.

use std::time::Duration;

/// How an input's collector is registered with the reactor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorSpec {
    /// Fire `collect` on a repeating timer
    Interval(Duration),

    /// No reactor-driven collection: the input is fed externally (a worker
    /// thread or the process pushing records) and only participates in
    /// flush cycles
    Manual,
}

impl CollectorSpec {
    /// Create an interval collector from seconds
    #[must_use]
    pub fn interval_secs(secs: u64) -> Self {
        Self::Interval(Duration::from_secs(secs))
    }

    /// Get the interval, if this is a timer collector
    #[inline]
    pub fn interval(&self) -> Option<Duration> {
        match self {
            Self::Interval(d) => Some(*d),
            Self::Manual => None,
        }
    }
}
