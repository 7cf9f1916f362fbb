//! Relay - Reference outputs
//!
//! Output plugins that exercise the engine without external services:
//!
//! - [`NullOutput`] - accepts and discards everything; benchmark/testing
//! - [`StdoutOutput`] - prints each record; development and demos
//! - [`ScriptedOutput`] - replays a pre-programmed outcome sequence and
//!   records every call; the test double for retry/lifecycle scenarios

mod common;
mod null;
mod scripted;
mod stdout;

pub use common::{MetricsSnapshot, OutputMetrics};
pub use null::NullOutput;
pub use scripted::{ScriptedOutput, ScriptedRecorder};
pub use stdout::StdoutOutput;
