//! Output plugin contract

use std::sync::Arc;

use async_trait::async_trait;
use relay_protocol::{Chunk, FlushOutcome, Tag};

use crate::error::PluginError;

/// An output destination
///
/// Each flush of a task against this destination runs as one cooperative
/// delivery attempt: the engine spawns `flush` and the returned outcome is
/// reported back to the reactor through the manager channel, never by a
/// direct call into engine state. The future may suspend at I/O boundaries;
/// it must not block the thread.
///
/// `flush` takes `&self` because several attempts (for different tasks) may
/// run against the same destination concurrently.
#[async_trait]
pub trait Output: Send + Sync {
    /// Instance name, used in logs and routing diagnostics
    fn name(&self) -> &str;

    /// Prepare the destination before the engine loop starts
    ///
    /// # Errors
    ///
    /// A failed init aborts engine startup.
    fn init(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Deliver one chunk
    ///
    /// The outcome decides the task transition: `Ok` releases the attempt,
    /// `Retry` requests a scheduled re-delivery (subject to the retry cap),
    /// `Error` abandons this (task, destination) pair.
    async fn flush(&self, chunk: Arc<Chunk>, tag: &Tag) -> FlushOutcome;

    /// Release resources at engine shutdown
    fn exit(&self) {}
}
