//! Memory input - records pushed from the process
//!
//! The input side of the engine's library mode: any thread can push records
//! through a [`MemoryHandle`]; the next flush cycle snapshots them into a
//! chunk. The pending buffer is the only shared state and sits behind a
//! mutex, so producers never touch reactor-owned structures.

use std::sync::Arc;

use parking_lot::Mutex;
use relay_plugin::{CollectError, CollectorSpec, Input};
use relay_protocol::{Chunk, ChunkBuilder};

use crate::common::InputMetrics;

/// Input fed by in-process record pushes
pub struct MemoryInput {
    /// Instance name
    name: String,

    /// Pending records shared with producer handles
    pending: Arc<Mutex<ChunkBuilder>>,

    /// Metrics shared with producer handles
    metrics: Arc<InputMetrics>,
}

/// Producer-side handle for pushing records into a [`MemoryInput`]
///
/// Cloneable and thread-safe; may be handed to worker threads.
#[derive(Clone)]
pub struct MemoryHandle {
    pending: Arc<Mutex<ChunkBuilder>>,
    metrics: Arc<InputMetrics>,
}

impl MemoryInput {
    /// Create a new memory input and its producer handle
    pub fn new(name: impl Into<String>) -> (Self, MemoryHandle) {
        let pending = Arc::new(Mutex::new(ChunkBuilder::new()));
        let metrics = Arc::new(InputMetrics::new());

        let handle = MemoryHandle {
            pending: Arc::clone(&pending),
            metrics: Arc::clone(&metrics),
        };

        (
            Self {
                name: name.into(),
                pending,
                metrics,
            },
            handle,
        )
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &InputMetrics {
        &self.metrics
    }
}

impl MemoryHandle {
    /// Push one serialized record
    pub fn push(&self, record: &[u8]) {
        self.pending.lock().push(record);
        self.metrics.record_collected(record.len() as u64);
    }

    /// Get the number of records waiting for the next flush
    pub fn pending_records(&self) -> usize {
        self.pending.lock().count()
    }
}

impl Input for MemoryInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn collector(&self) -> CollectorSpec {
        CollectorSpec::Manual
    }

    fn collect(&mut self) -> Result<(), CollectError> {
        // Producers write straight into the pending buffer
        Ok(())
    }

    fn flush(&mut self) -> Option<Chunk> {
        let chunk = self.pending.lock().take()?;
        self.metrics.chunk_flushed();
        tracing::trace!(
            input = %self.name,
            records = chunk.count(),
            bytes = chunk.total_bytes(),
            "memory input flushed"
        );
        Some(chunk)
    }

    fn exit(&mut self) {
        let snapshot = self.metrics.snapshot();
        tracing::info!(
            input = %self.name,
            records = snapshot.records_collected,
            bytes = snapshot.bytes_collected,
            chunks = snapshot.chunks_flushed,
            "memory input exiting"
        );
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
