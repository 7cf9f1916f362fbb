//! Relay - Protocol
//!
//! Core data types that flow through the forwarding engine.
//!
//! - [`Chunk`] - immutable, zero-copy snapshot of serialized records
//! - [`Tag`] - routing tag attached to every chunk
//! - [`InputId`] / [`OutputId`] - lightweight plugin instance identifiers
//! - [`TaskId`] / [`AttemptId`] - delivery bookkeeping identifiers, bounded
//!   to the bit widths of the manager-channel wire format
//! - [`FlushOutcome`] - terminal status of one delivery attempt

mod chunk;
mod ids;
mod outcome;
mod tag;

pub use chunk::{Chunk, ChunkBuilder};
pub use ids::{AttemptId, InputId, OutputId, TaskId};
pub use outcome::FlushOutcome;
pub use tag::Tag;

/// Default capacity (bytes) pre-allocated by a `ChunkBuilder`
pub const DEFAULT_CHUNK_CAPACITY: usize = 16 * 1024;

/// Default record count pre-allocated by a `ChunkBuilder`
pub const DEFAULT_CHUNK_RECORDS: usize = 256;
