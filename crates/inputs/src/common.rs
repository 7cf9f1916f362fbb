//! Common types for inputs

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics shared by all input types
#[derive(Debug, Default)]
pub struct InputMetrics {
    /// Total records accumulated
    pub records_collected: AtomicU64,

    /// Total bytes accumulated
    pub bytes_collected: AtomicU64,

    /// Total chunks handed to the dispatcher
    pub chunks_flushed: AtomicU64,

    /// Collect calls that returned an error
    pub collect_errors: AtomicU64,
}

impl InputMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            records_collected: AtomicU64::new(0),
            bytes_collected: AtomicU64::new(0),
            chunks_flushed: AtomicU64::new(0),
            collect_errors: AtomicU64::new(0),
        }
    }

    /// Record an accumulated record
    #[inline]
    pub fn record_collected(&self, bytes: u64) {
        self.records_collected.fetch_add(1, Ordering::Relaxed);
        self.bytes_collected.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a flushed chunk
    #[inline]
    pub fn chunk_flushed(&self) {
        self.chunks_flushed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a collect error
    #[inline]
    pub fn collect_error(&self) {
        self.collect_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_collected: self.records_collected.load(Ordering::Relaxed),
            bytes_collected: self.bytes_collected.load(Ordering::Relaxed),
            chunks_flushed: self.chunks_flushed.load(Ordering::Relaxed),
            collect_errors: self.collect_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of input metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_collected: u64,
    pub bytes_collected: u64,
    pub chunks_flushed: u64,
    pub collect_errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_tracking() {
        let metrics = InputMetrics::new();
        metrics.record_collected(10);
        metrics.record_collected(20);
        metrics.chunk_flushed();
        metrics.collect_error();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.records_collected, 2);
        assert_eq!(snapshot.bytes_collected, 30);
        assert_eq!(snapshot.chunks_flushed, 1);
        assert_eq!(snapshot.collect_errors, 1);
    }
}
