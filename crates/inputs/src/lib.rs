//! Relay - Reference inputs
//!
//! Input plugins that exercise the engine without external resources:
//!
//! - [`MemoryInput`] - records pushed from the process (or a worker thread)
//!   through a shared handle; flush-driven only
//! - [`CounterInput`] - emits one synthetic record per collect tick; handy
//!   for smoke tests and demos

mod common;
mod counter;
mod memory;

pub use common::{InputMetrics, MetricsSnapshot};
pub use counter::{CounterInput, CounterInputConfig};
pub use memory::{MemoryHandle, MemoryInput};
