//! Signal word codec
//!
//! Encodes and decodes the 64-bit notification words carried by the manager
//! channel. The bit layout is a wire contract shared with any retained
//! component that writes words directly; it must not change.

use relay_protocol::{AttemptId, FlushOutcome, TaskId};

use crate::error::SignalError;

/// High-half categories
const CATEGORY_ENGINE: u32 = 1;
const CATEGORY_INPUT_THREAD: u32 = 2;
const CATEGORY_TASK: u32 = 3;
const CATEGORY_BUFFER: u32 = 4;

/// Engine-category keys
const KEY_STOP: u32 = 0xdead_beef;
const KEY_FLUSH: u32 = 1;
const KEY_STATS: u32 = 2;
const KEY_STARTED: u32 = 3;

/// Task-word field layout (low half)
const OUTCOME_SHIFT: u32 = 28;
const TASK_SHIFT: u32 = 14;
const FIELD_MASK: u32 = (1 << 14) - 1;
const OUTCOME_MASK: u32 = 0b11;

/// One manager-channel notification
///
/// The typed form of a 64-bit signal word. `encode`/`decode` round-trip
/// exactly for every valid value within the field bit widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Stop requested: the reactor performs one final flush, then arms the
    /// shutdown grace timer
    Stop,
    /// Force a full flush of all inputs
    FlushAll,
    /// Log a point-in-time snapshot of engine state
    Stats,
    /// The reactor loop is armed and serving events
    Started,
    /// An input-side worker finished and its resources can be released
    InputThread(u32),
    /// A delivery attempt reported its terminal outcome
    TaskEvent {
        outcome: FlushOutcome,
        task: TaskId,
        attempt: AttemptId,
    },
    /// Event for the buffering adapter, opaque to the reactor
    Buffer(u32),
}

impl Signal {
    /// Encode this signal into a 64-bit word
    #[must_use]
    pub fn encode(self) -> u64 {
        let (category, key) = match self {
            Self::Stop => (CATEGORY_ENGINE, KEY_STOP),
            Self::FlushAll => (CATEGORY_ENGINE, KEY_FLUSH),
            Self::Stats => (CATEGORY_ENGINE, KEY_STATS),
            Self::Started => (CATEGORY_ENGINE, KEY_STARTED),
            Self::InputThread(id) => (CATEGORY_INPUT_THREAD, id),
            Self::TaskEvent {
                outcome,
                task,
                attempt,
            } => {
                let key = (outcome.to_bits() << OUTCOME_SHIFT)
                    | ((task.value() as u32) << TASK_SHIFT)
                    | attempt.value() as u32;
                (CATEGORY_TASK, key)
            }
            Self::Buffer(key) => (CATEGORY_BUFFER, key),
        };

        ((category as u64) << 32) | key as u64
    }

    /// Decode a 64-bit word into a signal
    ///
    /// # Errors
    ///
    /// Returns an error for unknown categories, unknown engine keys, or a
    /// task word carrying an outcome outside the 2-bit range.
    pub fn decode(word: u64) -> Result<Self, SignalError> {
        let category = (word >> 32) as u32;
        let key = word as u32;

        match category {
            CATEGORY_ENGINE => match key {
                KEY_STOP => Ok(Self::Stop),
                KEY_FLUSH => Ok(Self::FlushAll),
                KEY_STATS => Ok(Self::Stats),
                KEY_STARTED => Ok(Self::Started),
                other => Err(SignalError::UnknownEngineKey(other)),
            },
            CATEGORY_INPUT_THREAD => Ok(Self::InputThread(key)),
            CATEGORY_TASK => {
                let bits = (key >> OUTCOME_SHIFT) & OUTCOME_MASK;
                let outcome = FlushOutcome::from_bits(bits)
                    .ok_or(SignalError::InvalidOutcome(bits))?;
                Ok(Self::TaskEvent {
                    outcome,
                    task: TaskId::new(((key >> TASK_SHIFT) & FIELD_MASK) as u16),
                    attempt: AttemptId::new((key & FIELD_MASK) as u16),
                })
            }
            CATEGORY_BUFFER => Ok(Self::Buffer(key)),
            other => Err(SignalError::UnknownCategory(other)),
        }
    }

    /// Build a task event signal
    #[inline]
    #[must_use]
    pub fn task_event(outcome: FlushOutcome, task: TaskId, attempt: AttemptId) -> Self {
        Self::TaskEvent {
            outcome,
            task,
            attempt,
        }
    }
}

#[cfg(test)]
#[path = "word_test.rs"]
mod word_test;
