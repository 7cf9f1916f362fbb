//! Relay - Plugin contracts
//!
//! The fixed set of operations every input and output variant implements.
//! The engine drives plugins exclusively through these traits; how a plugin
//! gets constructed (static registration, dynamic loading) is the caller's
//! concern.
//!
//! # Lifecycle
//!
//! ```text
//! Input:  init -> { collect* , flush* } -> exit
//! Output: init -> flush* -> exit
//! ```
//!
//! Failures cross this boundary only as status values, never as panics: a
//! failed `collect` is logged by the engine and the collector keeps being
//! polled; an output reports `FlushOutcome::{Ok, Retry, Error}` per attempt.

mod collector;
mod error;
mod input;
mod output;

pub use collector::CollectorSpec;
pub use error::{CollectError, PluginError};
pub use input::Input;
pub use output::Output;
