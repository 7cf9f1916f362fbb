//! Scripted output - pre-programmed outcome sequence
//!
//! The test double for engine lifecycle and retry scenarios. Each flush call
//! consumes the next outcome from the script (the last outcome repeats once
//! the script is exhausted) and every call is recorded for later assertions.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use relay_plugin::Output;
use relay_protocol::{Chunk, FlushOutcome, Tag};

/// Recorded state of a scripted output, shared with the test
#[derive(Debug, Default)]
struct ScriptState {
    /// Remaining scripted outcomes, in order
    script: Vec<FlushOutcome>,

    /// Position in the script
    cursor: usize,

    /// Every flush call: (tag, record count, outcome returned)
    calls: Vec<(String, usize, FlushOutcome)>,
}

/// Output replaying a fixed outcome sequence
pub struct ScriptedOutput {
    name: String,
    state: Arc<Mutex<ScriptState>>,
}

/// Test-side view of a [`ScriptedOutput`]'s recorded calls
#[derive(Clone)]
pub struct ScriptedRecorder {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedOutput {
    /// Create a scripted output and its recorder
    ///
    /// `script` must be non-empty; the last outcome repeats for any calls
    /// beyond the script length.
    pub fn new(name: impl Into<String>, script: Vec<FlushOutcome>) -> (Self, ScriptedRecorder) {
        assert!(!script.is_empty(), "script must contain at least one outcome");

        let state = Arc::new(Mutex::new(ScriptState {
            script,
            cursor: 0,
            calls: Vec::new(),
        }));

        let recorder = ScriptedRecorder {
            state: Arc::clone(&state),
        };

        (
            Self {
                name: name.into(),
                state,
            },
            recorder,
        )
    }

    /// Convenience: an output that always succeeds
    pub fn always_ok(name: impl Into<String>) -> (Self, ScriptedRecorder) {
        Self::new(name, vec![FlushOutcome::Ok])
    }

    /// Convenience: an output that always fails permanently
    pub fn always_error(name: impl Into<String>) -> (Self, ScriptedRecorder) {
        Self::new(name, vec![FlushOutcome::Error])
    }
}

impl ScriptedRecorder {
    /// Number of flush calls observed
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Outcomes returned so far, in call order
    pub fn outcomes(&self) -> Vec<FlushOutcome> {
        self.state.lock().calls.iter().map(|(_, _, o)| *o).collect()
    }

    /// Tags observed so far, in call order
    pub fn tags(&self) -> Vec<String> {
        self.state.lock().calls.iter().map(|(t, _, _)| t.clone()).collect()
    }

    /// Record counts observed so far, in call order
    pub fn record_counts(&self) -> Vec<usize> {
        self.state.lock().calls.iter().map(|(_, c, _)| *c).collect()
    }
}

#[async_trait]
impl Output for ScriptedOutput {
    fn name(&self) -> &str {
        &self.name
    }

    async fn flush(&self, chunk: Arc<Chunk>, tag: &Tag) -> FlushOutcome {
        let mut state = self.state.lock();
        let index = state.cursor.min(state.script.len() - 1);
        let outcome = state.script[index];
        state.cursor += 1;
        state
            .calls
            .push((tag.as_str().to_string(), chunk.count(), outcome));
        outcome
    }
}
