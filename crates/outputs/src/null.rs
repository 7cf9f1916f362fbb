//! Null output - accepts and discards all data
//!
//! Every flush succeeds immediately. Used for benchmarking the engine
//! without delivery overhead and for validating routing configuration.

use std::sync::Arc;

use async_trait::async_trait;
use relay_plugin::Output;
use relay_protocol::{Chunk, FlushOutcome, Tag};

use crate::common::OutputMetrics;

/// Output that discards every chunk
pub struct NullOutput {
    name: String,
    metrics: Arc<OutputMetrics>,
}

impl NullOutput {
    /// Create a new null output
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: Arc::new(OutputMetrics::new()),
        }
    }

    /// Get a shared handle to the metrics
    ///
    /// Remains valid after the output is handed to the engine.
    pub fn metrics(&self) -> Arc<OutputMetrics> {
        Arc::clone(&self.metrics)
    }
}

#[async_trait]
impl Output for NullOutput {
    fn name(&self) -> &str {
        &self.name
    }

    async fn flush(&self, chunk: Arc<Chunk>, _tag: &Tag) -> FlushOutcome {
        self.metrics
            .chunk_written(chunk.count() as u64, chunk.total_bytes() as u64);
        FlushOutcome::Ok
    }

    fn exit(&self) {
        let snapshot = self.metrics.snapshot();
        tracing::info!(
            output = %self.name,
            chunks = snapshot.chunks_written,
            records = snapshot.records_written,
            bytes = snapshot.bytes_written,
            "null output exiting"
        );
    }
}
