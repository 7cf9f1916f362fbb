//! Counter input - synthetic record generator
//!
//! Emits one numbered record per collect tick. Useful for smoke-testing a
//! pipeline without any external resource.

use std::time::Duration;

use relay_plugin::{CollectError, CollectorSpec, Input};
use relay_protocol::{Chunk, ChunkBuilder};

use crate::common::InputMetrics;

/// Configuration for the counter input
#[derive(Debug, Clone)]
pub struct CounterInputConfig {
    /// Instance name
    pub name: String,

    /// Collect tick interval
    pub interval: Duration,

    /// Stop emitting after this many records (None = unbounded)
    pub limit: Option<u64>,
}

impl Default for CounterInputConfig {
    fn default() -> Self {
        Self {
            name: "counter".into(),
            interval: Duration::from_secs(1),
            limit: None,
        }
    }
}

/// Input that emits a synthetic record on every collect
pub struct CounterInput {
    config: CounterInputConfig,
    pending: ChunkBuilder,
    emitted: u64,
    metrics: InputMetrics,
}

impl CounterInput {
    /// Create a counter input with default configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(CounterInputConfig {
            name: name.into(),
            ..Default::default()
        })
    }

    /// Create a counter input with full configuration
    pub fn with_config(config: CounterInputConfig) -> Self {
        Self {
            config,
            pending: ChunkBuilder::new(),
            emitted: 0,
            metrics: InputMetrics::new(),
        }
    }

    /// Get the number of records emitted so far
    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &InputMetrics {
        &self.metrics
    }
}

impl Input for CounterInput {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn collector(&self) -> CollectorSpec {
        CollectorSpec::Interval(self.config.interval)
    }

    fn collect(&mut self) -> Result<(), CollectError> {
        if let Some(limit) = self.config.limit {
            if self.emitted >= limit {
                return Err(CollectError::Closed);
            }
        }

        let record = format!("counter={}", self.emitted);
        self.pending.push(record.as_bytes());
        self.emitted += 1;
        self.metrics.record_collected(record.len() as u64);
        Ok(())
    }

    fn flush(&mut self) -> Option<Chunk> {
        let chunk = self.pending.take()?;
        self.metrics.chunk_flushed();
        Some(chunk)
    }

    fn exit(&mut self) {
        tracing::info!(
            input = %self.config.name,
            emitted = self.emitted,
            "counter input exiting"
        );
    }
}

#[cfg(test)]
#[path = "counter_test.rs"]
mod counter_test;
