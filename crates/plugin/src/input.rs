//! Input plugin contract

use relay_protocol::Chunk;

use crate::collector::CollectorSpec;
use crate::error::{CollectError, PluginError};

/// An input plugin instance
///
/// Inputs accumulate records between flush cycles. The engine invokes
/// `collect` on the reactor thread when the input's collector fires, and
/// `flush` when the flush timer (or a forced flush) triggers dispatch.
///
/// Inputs that read from a blocking resource should run their read loop on
/// their own worker and hand records over through a shared pending buffer;
/// the trait methods themselves are always called on the reactor thread.
pub trait Input: Send {
    /// Instance name, used in logs and diagnostics
    fn name(&self) -> &str;

    /// How the engine drives this input's `collect`
    fn collector(&self) -> CollectorSpec;

    /// Prepare the input before the engine loop starts
    ///
    /// # Errors
    ///
    /// A failed init aborts engine startup.
    fn init(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Collect pending data from the underlying resource
    ///
    /// Called when this input's collector event fires. Errors are logged and
    /// non-fatal, except [`CollectError::Closed`] which removes the
    /// collector.
    fn collect(&mut self) -> Result<(), CollectError>;

    /// Hand over accumulated records as an immutable chunk
    ///
    /// Returns `None` when there is nothing to send. Called on every flush
    /// cycle; a non-empty result becomes one delivery task.
    fn flush(&mut self) -> Option<Chunk>;

    /// Release resources at engine shutdown
    fn exit(&mut self) {}
}
