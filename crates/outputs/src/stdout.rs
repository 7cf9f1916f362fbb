//! Stdout output - prints each record
//!
//! Development/demo destination. Records are written line by line, prefixed
//! with the chunk's tag. Non-UTF8 records are printed lossily.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use relay_plugin::Output;
use relay_protocol::{Chunk, FlushOutcome, Tag};

use crate::common::OutputMetrics;

/// Output that writes records to stdout
pub struct StdoutOutput {
    name: String,
    metrics: Arc<OutputMetrics>,
}

impl StdoutOutput {
    /// Create a new stdout output
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: Arc::new(OutputMetrics::new()),
        }
    }

    /// Get a shared handle to the metrics
    pub fn metrics(&self) -> Arc<OutputMetrics> {
        Arc::clone(&self.metrics)
    }
}

#[async_trait]
impl Output for StdoutOutput {
    fn name(&self) -> &str {
        &self.name
    }

    async fn flush(&self, chunk: Arc<Chunk>, tag: &Tag) -> FlushOutcome {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();

        for record in chunk.records() {
            let line = String::from_utf8_lossy(record);
            if writeln!(lock, "[{tag}] {line}").is_err() {
                self.metrics.flush_error();
                return FlushOutcome::Error;
            }
        }

        if lock.flush().is_err() {
            self.metrics.flush_error();
            return FlushOutcome::Error;
        }

        self.metrics
            .chunk_written(chunk.count() as u64, chunk.total_bytes() as u64);
        FlushOutcome::Ok
    }
}

#[cfg(test)]
mod tests {
    use relay_protocol::ChunkBuilder;

    use super::*;

    #[tokio::test]
    async fn test_flush_writes_and_succeeds() {
        let output = StdoutOutput::new("stdout");
        let mut builder = ChunkBuilder::new();
        builder.push(b"hello");
        builder.push(b"world");

        let outcome = output
            .flush(Arc::new(builder.finish()), &Tag::new("demo"))
            .await;

        assert_eq!(outcome, FlushOutcome::Ok);
        assert_eq!(output.metrics().snapshot().records_written, 2);
    }
}
