//! Common types for outputs

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics shared by all output types
#[derive(Debug, Default)]
pub struct OutputMetrics {
    /// Total chunks delivered successfully
    pub chunks_written: AtomicU64,

    /// Total records delivered successfully
    pub records_written: AtomicU64,

    /// Total bytes delivered successfully
    pub bytes_written: AtomicU64,

    /// Flush attempts that did not succeed
    pub flush_errors: AtomicU64,
}

impl OutputMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            chunks_written: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            flush_errors: AtomicU64::new(0),
        }
    }

    /// Record a successfully delivered chunk
    #[inline]
    pub fn chunk_written(&self, records: u64, bytes: u64) {
        self.chunks_written.fetch_add(1, Ordering::Relaxed);
        self.records_written.fetch_add(records, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a failed flush
    #[inline]
    pub fn flush_error(&self) {
        self.flush_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            chunks_written: self.chunks_written.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            flush_errors: self.flush_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of output metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub chunks_written: u64,
    pub records_written: u64,
    pub bytes_written: u64,
    pub flush_errors: u64,
}
