//! Relay - Engine
//!
//! The single-threaded event-driven core of the forwarding pipeline. One
//! reactor task multiplexes every event source and owns all delivery state;
//! nothing else ever mutates it.
//!
//! # Architecture
//!
//! ```text
//! [Collectors]          [Reactor loop]                [Outputs]
//!  timer ticks ──┐   ┌────────────────────┐   spawn   ┌──→ attempt (output A)
//!  worker pushes ┼──→│ flush timer        │──────────→┼──→ attempt (output B)
//!                │   │ manager channel ←──│←──────────┘  outcome words
//!  EngineHandle ─┘   │ retry time wheel   │
//!   stop/flush/stats │ collector timers   │──→ TaskTable / RetryScheduler
//!                    └────────────────────┘
//! ```
//!
//! # Key design
//!
//! - **Single writer**: task table, router, and collector registry are only
//!   touched inside reactor event handlers - no locks in the core
//! - **Manager channel**: the only cross-thread boundary; one 64-bit word
//!   per notification, decoded by the reactor ([`relay_signal`])
//! - **Cooperative attempts**: each delivery attempt is a spawned future
//!   that reports its terminal outcome back as a task word, never by
//!   reaching into engine state
//! - **Bounded retries**: transient failures re-arm through a
//!   `DelayQueue`-backed scheduler with capped, non-decreasing backoff
//! - **Graceful stop**: a stop word triggers one final full flush, halts the
//!   buffering adapter, then serves in-flight events for a fixed grace
//!   period before teardown

mod buffer;
mod collector;
mod config;
mod dispatch;
mod engine;
mod error;
mod handle;
mod retry;
mod setup;
mod task;

pub use buffer::{BufferAdapter, MemoryBuffer, MemoryBufferHandle};
pub use config::EngineConfig;
pub use engine::{Engine, EngineReport, EngineStats, ExitStatus};
pub use error::{EngineError, Result};
pub use handle::EngineHandle;
pub use retry::{RetryError, RetryRecord, RetryScheduler};
pub use setup::{build_engine, EngineSetup};
pub use task::{Task, TaskError, TaskTable};

// Re-export the seam types plugins and embedders need
pub use relay_config::Config;
pub use relay_inputs::MemoryHandle;
pub use relay_plugin::{CollectorSpec, Input, Output};
pub use relay_protocol::{AttemptId, Chunk, FlushOutcome, InputId, OutputId, Tag, TaskId};
pub use relay_signal::{ManagerSender, Signal};
