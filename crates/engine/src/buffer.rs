//! Buffering adapter seam
//!
//! The engine core never persists chunks itself; a pluggable adapter
//! observes the terminal outcome of every delivery attempt and may react
//! (mark a store entry delivered, requeue, drop). Callbacks run inside the
//! reactor, synchronously, before the task is considered for destruction,
//! so the adapter always sees the attempt while its task still exists.
//!
//! Adapters that run their own background machinery can wake the reactor
//! with buffer words on the manager channel; the payload `u32` is opaque to
//! the engine and routed straight to [`BufferAdapter::on_buffer_event`].

use std::sync::Arc;

use parking_lot::Mutex;
use relay_protocol::{AttemptId, FlushOutcome, TaskId};

/// Hook invoked by the reactor on buffering-relevant events
pub trait BufferAdapter: Send {
    /// A delivery attempt reached a terminal outcome
    ///
    /// `outcome` is the effective one after retry accounting: a transient
    /// failure past the retry budget arrives here as
    /// [`FlushOutcome::Error`].
    fn on_attempt_result(&mut self, task: TaskId, attempt: AttemptId, outcome: FlushOutcome);

    /// A buffer word arrived on the manager channel
    fn on_buffer_event(&mut self, _event: u32) {}

    /// The engine is shutting down; flush adapter state
    fn stop(&mut self) {}
}

#[derive(Debug, Default)]
struct MemoryBufferState {
    results: Vec<(TaskId, AttemptId, FlushOutcome)>,
    events: Vec<u32>,
    stopped: bool,
}

/// In-process adapter that records every callback
///
/// Stands in for a persistent store in embedders that do not need one and
/// doubles as the observer used by the engine tests.
#[derive(Debug, Default)]
pub struct MemoryBuffer {
    state: Arc<Mutex<MemoryBufferState>>,
}

impl MemoryBuffer {
    /// Create an adapter and a handle for inspecting it from outside
    #[must_use]
    pub fn new() -> (Self, MemoryBufferHandle) {
        let state = Arc::new(Mutex::new(MemoryBufferState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MemoryBufferHandle { state },
        )
    }
}

impl BufferAdapter for MemoryBuffer {
    fn on_attempt_result(&mut self, task: TaskId, attempt: AttemptId, outcome: FlushOutcome) {
        self.state.lock().results.push((task, attempt, outcome));
    }

    fn on_buffer_event(&mut self, event: u32) {
        self.state.lock().events.push(event);
    }

    fn stop(&mut self) {
        self.state.lock().stopped = true;
    }
}

/// Read side of a [`MemoryBuffer`]
#[derive(Debug, Clone)]
pub struct MemoryBufferHandle {
    state: Arc<Mutex<MemoryBufferState>>,
}

impl MemoryBufferHandle {
    /// All attempt results observed so far
    pub fn results(&self) -> Vec<(TaskId, AttemptId, FlushOutcome)> {
        self.state.lock().results.clone()
    }

    /// Outcomes only, in observation order
    pub fn outcomes(&self) -> Vec<FlushOutcome> {
        self.state
            .lock()
            .results
            .iter()
            .map(|(_, _, outcome)| *outcome)
            .collect()
    }

    /// Buffer words observed so far
    pub fn events(&self) -> Vec<u32> {
        self.state.lock().events.clone()
    }

    /// Whether `stop` ran
    pub fn stopped(&self) -> bool {
        self.state.lock().stopped
    }
}
