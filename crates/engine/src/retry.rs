//! Retry scheduling with capped exponential backoff
//!
//! A transient delivery failure does not respawn immediately; it arms a
//! record in a time wheel and the reactor redelivers when the record fires.
//! Delays grow as `base * 2^(n-1)` for the n-th retry and saturate at the
//! configured cap, so a flapping destination settles into a steady probe
//! rate instead of a thundering herd.
//!
//! The scheduler never touches task state. The reactor owns the pairing of
//! fired records with the task table; a record for a task that was destroyed
//! in the meantime is simply dropped there.

use std::future::poll_fn;
use std::time::Duration;

use relay_protocol::{OutputId, TaskId};
use thiserror::Error;
use tokio_util::time::DelayQueue;

/// Hard cap on armed retry records, independent of per-task limits
const MAX_PENDING_RETRIES: usize = 16 * 1024;

/// Errors from retry scheduling
#[derive(Debug, Error)]
pub enum RetryError {
    /// The (task, destination) pair spent its retry budget
    #[error("retry limit reached for {task} -> output {output} after {attempts} attempts")]
    Exhausted {
        task: TaskId,
        output: OutputId,
        attempts: u32,
    },

    /// The time wheel is at capacity
    #[error("retry queue full ({0} records armed)")]
    Resource(usize),
}

/// One armed retry, yielded back to the reactor when its delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryRecord {
    /// Task to redeliver
    pub task: TaskId,
    /// Destination that asked for the retry
    pub output: OutputId,
    /// Which retry this is for the pair (1-based)
    pub attempt_number: u32,
}

/// Time wheel of pending redeliveries
pub struct RetryScheduler {
    queue: DelayQueue<RetryRecord>,
    limit: u32,
    base: Duration,
    cap: Duration,
}

impl RetryScheduler {
    /// Create a scheduler
    ///
    /// `limit` bounds scheduled retries per (task, destination) pair, `base`
    /// is the first delay, and `cap` bounds every delay.
    #[must_use]
    pub fn new(limit: u32, base: Duration, cap: Duration) -> Self {
        Self {
            queue: DelayQueue::new(),
            limit,
            base,
            cap,
        }
    }

    /// Backoff delay for the n-th retry (1-based), capped
    #[must_use]
    pub fn backoff(&self, attempt_number: u32) -> Duration {
        // Shift saturates well past any sane cap; 2^16 * base overflows
        // nothing we accept as configuration.
        let exp = attempt_number.saturating_sub(1).min(16);
        self.base.saturating_mul(1 << exp).min(self.cap)
    }

    /// Arm a retry record for the given pair
    ///
    /// `attempt_number` is the retry count already consumed by the pair,
    /// including this one. Returns the delay the record was armed with.
    ///
    /// # Errors
    ///
    /// [`RetryError::Exhausted`] when the pair is over its budget and
    /// [`RetryError::Resource`] when the wheel is full. Both are terminal
    /// for the pair; the caller converts them to a permanent error.
    pub fn schedule(
        &mut self,
        task: TaskId,
        output: OutputId,
        attempt_number: u32,
    ) -> Result<Duration, RetryError> {
        if attempt_number > self.limit {
            return Err(RetryError::Exhausted {
                task,
                output,
                attempts: attempt_number - 1,
            });
        }
        if self.queue.len() >= MAX_PENDING_RETRIES {
            return Err(RetryError::Resource(self.queue.len()));
        }

        let delay = self.backoff(attempt_number);
        self.queue.insert(
            RetryRecord {
                task,
                output,
                attempt_number,
            },
            delay,
        );
        Ok(delay)
    }

    /// Check whether any record is armed
    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Number of armed records
    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Wait for the next record to fire
    ///
    /// Must only be polled while [`has_pending`](Self::has_pending) is true;
    /// an empty `DelayQueue` yields `None` and would otherwise resolve
    /// immediately in a select loop.
    pub async fn next_fired(&mut self) -> Option<RetryRecord> {
        poll_fn(|cx| self.queue.poll_expired(cx))
            .await
            .map(|expired| expired.into_inner())
    }
}

impl std::fmt::Debug for RetryScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryScheduler")
            .field("pending", &self.queue.len())
            .field("limit", &self.limit)
            .field("base", &self.base)
            .field("cap", &self.cap)
            .finish()
    }
}

#[cfg(test)]
#[path = "retry_test.rs"]
mod retry_test;
