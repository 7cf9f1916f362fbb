//! Task registry and lifecycle bookkeeping
//!
//! A task is one logical delivery job: an immutable chunk plus the set of
//! delivery attempts currently running against it and the retry state per
//! destination. The table owns every in-flight task, keyed by a 14-bit id
//! (the width the manager-channel task word can carry).
//!
//! Liveness contract: a task is destroyed if and only if its reference count
//! (`users`, the number of live attempts) is zero AND no armed retry still
//! references it. The reactor checks `is_done()` after every transition; it
//! is never assumed.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use relay_protocol::{AttemptId, Chunk, InputId, OutputId, Tag, TaskId};
use thiserror::Error;

/// Errors from task bookkeeping
#[derive(Debug, Error)]
pub enum TaskError {
    /// The 14-bit task id space is saturated
    #[error("task table full ({0} tasks in flight)")]
    TableFull(usize),

    /// The task already has the maximum number of concurrent attempts
    #[error("attempt id space exhausted for {0}")]
    AttemptIdsExhausted(TaskId),

    /// Operation referenced a task id not present in the table
    #[error("unknown task: {0}")]
    UnknownTask(TaskId),
}

/// One in-flight delivery job
#[derive(Debug)]
pub struct Task {
    id: TaskId,
    input: InputId,
    tag: Tag,
    chunk: Arc<Chunk>,

    /// Live delivery attempts: attempt id -> destination
    attempts: HashMap<AttemptId, OutputId>,

    /// Next candidate attempt id (14-bit, wraps)
    next_attempt: u16,

    /// Reference count: number of live attempts
    users: u32,

    /// Scheduled retries consumed per destination (monotonic, cleared on ok)
    retry_attempts: HashMap<OutputId, u32>,

    /// Destinations with an armed retry record not yet fired
    pending_retries: HashSet<OutputId>,
}

impl Task {
    fn new(id: TaskId, input: InputId, tag: Tag, chunk: Arc<Chunk>) -> Self {
        Self {
            id,
            input,
            tag,
            chunk,
            attempts: HashMap::new(),
            next_attempt: 0,
            users: 0,
            retry_attempts: HashMap::new(),
            pending_retries: HashSet::new(),
        }
    }

    /// Get the task id
    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Get the originating input
    #[inline]
    pub fn input(&self) -> InputId {
        self.input
    }

    /// Get the routing tag
    #[inline]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Get a shared handle to the payload
    #[inline]
    pub fn chunk(&self) -> Arc<Chunk> {
        Arc::clone(&self.chunk)
    }

    /// Get the reference count (live attempts)
    #[inline]
    pub fn users(&self) -> u32 {
        self.users
    }

    /// Get the number of live attempts
    #[inline]
    pub fn active_attempts(&self) -> usize {
        self.attempts.len()
    }

    /// Check if any armed retry references this task
    #[inline]
    pub fn has_pending_retries(&self) -> bool {
        !self.pending_retries.is_empty()
    }

    /// Check the destroy condition: no users and no armed retries
    #[inline]
    pub fn is_done(&self) -> bool {
        self.users == 0 && self.pending_retries.is_empty()
    }

    /// Register a new delivery attempt against a destination
    ///
    /// Increments the reference count and returns the attempt id.
    ///
    /// # Errors
    ///
    /// Fails when the 14-bit per-task attempt id space has no free slot.
    pub fn add_attempt(&mut self, output: OutputId) -> Result<AttemptId, TaskError> {
        if self.attempts.len() > AttemptId::MAX as usize {
            return Err(TaskError::AttemptIdsExhausted(self.id));
        }

        loop {
            let candidate = AttemptId::new(self.next_attempt);
            self.next_attempt = self.next_attempt.wrapping_add(1) & AttemptId::MAX;
            if !self.attempts.contains_key(&candidate) {
                self.attempts.insert(candidate, output);
                self.users += 1;
                return Ok(candidate);
            }
        }
    }

    /// Remove a completed attempt and decrement the reference count
    ///
    /// Returns the destination the attempt ran against, or `None` if the
    /// attempt id is unknown (already consumed - the count is untouched, it
    /// must never go negative).
    pub fn finish_attempt(&mut self, attempt: AttemptId) -> Option<OutputId> {
        let output = self.attempts.remove(&attempt)?;
        debug_assert!(self.users > 0, "users underflow on {}", self.id);
        self.users = self.users.saturating_sub(1);
        Some(output)
    }

    /// Consume one more retry for a destination; returns the new count
    pub fn bump_retry(&mut self, output: OutputId) -> u32 {
        let count = self.retry_attempts.entry(output).or_insert(0);
        *count += 1;
        *count
    }

    /// Get the retries consumed so far for a destination
    #[inline]
    pub fn retry_count(&self, output: OutputId) -> u32 {
        self.retry_attempts.get(&output).copied().unwrap_or(0)
    }

    /// Clear retry bookkeeping for a destination (on successful delivery)
    pub fn clear_retry(&mut self, output: OutputId) {
        self.retry_attempts.remove(&output);
        self.pending_retries.remove(&output);
    }

    /// Mark a destination as having an armed retry record
    pub fn mark_retry_pending(&mut self, output: OutputId) {
        self.pending_retries.insert(output);
    }

    /// Consume the armed-retry mark when the record fires
    ///
    /// Returns `false` if no retry was pending for this destination.
    pub fn take_retry_pending(&mut self, output: OutputId) -> bool {
        self.pending_retries.remove(&output)
    }
}

/// Owner of all in-flight tasks, indexed by task id
#[derive(Debug, Default)]
pub struct TaskTable {
    tasks: HashMap<TaskId, Task>,
    next: u16,
}

impl TaskTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new task holding the given chunk
    ///
    /// # Errors
    ///
    /// Fails when all 16384 task ids are in flight.
    pub fn create(&mut self, input: InputId, tag: Tag, chunk: Chunk) -> Result<TaskId, TaskError> {
        if self.tasks.len() > TaskId::MAX as usize {
            return Err(TaskError::TableFull(self.tasks.len()));
        }

        loop {
            let candidate = TaskId::new(self.next);
            self.next = self.next.wrapping_add(1) & TaskId::MAX;
            if !self.tasks.contains_key(&candidate) {
                self.tasks
                    .insert(candidate, Task::new(candidate, input, tag, Arc::new(chunk)));
                return Ok(candidate);
            }
        }
    }

    /// Look up a task
    #[inline]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Look up a task mutably
    #[inline]
    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(&id)
    }

    /// Remove a task from the table
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        self.tasks.remove(&id)
    }

    /// Number of in-flight tasks
    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if no tasks are in flight
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterate over in-flight tasks
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }
}

#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;
