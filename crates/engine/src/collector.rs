//! Collector timers for interval-driven inputs
//!
//! Inputs that pull data on a cadence (rather than being pushed to by a
//! worker) declare an interval; the registry keeps one armed timer per such
//! input on a shared time wheel and the reactor invokes `collect` when an
//! entry fires. Timers are one-shot and re-armed after each collect so a
//! slow plugin delays its own next tick instead of stacking callbacks.

use std::collections::HashMap;
use std::future::poll_fn;
use std::time::Duration;

use relay_protocol::InputId;
use tokio_util::time::delay_queue::{DelayQueue, Key};

struct Entry {
    interval: Duration,
    key: Option<Key>,
}

/// Timer registry for interval collectors
pub struct CollectorRegistry {
    queue: DelayQueue<InputId>,
    entries: HashMap<InputId, Entry>,
}

impl CollectorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: DelayQueue::new(),
            entries: HashMap::new(),
        }
    }

    /// Arm a recurring timer for an input
    ///
    /// The first fire happens one full interval from now.
    pub fn arm(&mut self, input: InputId, interval: Duration) {
        let key = self.queue.insert(input, interval);
        self.entries.insert(
            input,
            Entry {
                interval,
                key: Some(key),
            },
        );
    }

    /// Re-arm an input after its collect ran
    ///
    /// No-op for inputs that were disarmed in the meantime.
    pub fn rearm(&mut self, input: InputId) {
        if let Some(entry) = self.entries.get_mut(&input) {
            let key = self.queue.insert(input, entry.interval);
            entry.key = Some(key);
        }
    }

    /// Permanently remove an input's timer
    pub fn disarm(&mut self, input: InputId) {
        if let Some(entry) = self.entries.remove(&input) {
            if let Some(key) = entry.key {
                // Key may already have expired off the wheel
                let _ = self.queue.try_remove(&key);
            }
        }
    }

    /// Check whether any timer is armed
    #[inline]
    pub fn has_armed(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Wait for the next timer to fire
    ///
    /// Only poll while [`has_armed`](Self::has_armed) is true. The fired
    /// input stays registered but unarmed until [`rearm`](Self::rearm).
    pub async fn next_fired(&mut self) -> Option<InputId> {
        let input = poll_fn(|cx| self.queue.poll_expired(cx))
            .await
            .map(|expired| expired.into_inner())?;
        if let Some(entry) = self.entries.get_mut(&input) {
            entry.key = None;
        }
        Some(input)
    }
}

impl Default for CollectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CollectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorRegistry")
            .field("registered", &self.entries.len())
            .field("armed", &self.queue.len())
            .finish()
    }
}
