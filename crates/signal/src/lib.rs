//! Relay - Signal
//!
//! The manager channel is the single cross-thread notification primitive of
//! the engine. Every notification is one 64-bit word; any component that
//! needs to wake the reactor encodes a [`Signal`] into a word and writes it
//! to the channel. The reactor is the only reader, so word arrival order is
//! the order in which state transitions are applied.
//!
//! # Wire format
//!
//! ```text
//! 63            32 31             0
//! +---------------+---------------+
//! |   category    |      key      |
//! +---------------+---------------+
//!
//! category TASK, key layout:
//! 31  30 29       28 27        14 13         0
//! +-----+-----------+------------+------------+
//! |  0  |  outcome  |  task id   | attempt id |
//! +-----+-----------+------------+------------+
//! ```

mod channel;
mod error;
mod word;

pub use channel::{ManagerChannel, ManagerSender};
pub use error::{Result, SignalError};
pub use word::Signal;
