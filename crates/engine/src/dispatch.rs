//! Dispatch handlers: flush cycles, delivery attempts, task transitions
//!
//! Everything here runs on the reactor with exclusive access to the task
//! table. The only thing that escapes is a spawned attempt future, which
//! holds an `Arc` of the chunk and a manager sender and nothing else.

use std::sync::Arc;

use tracing::{debug, warn};

use relay_plugin::CollectError;
use relay_protocol::{AttemptId, FlushOutcome, InputId, OutputId, TaskId};
use relay_signal::Signal;

use crate::engine::{Reactor, StatsCounters};
use crate::retry::RetryRecord;

impl Reactor {
    /// Run one flush cycle over every input
    pub(crate) fn flush_all(&mut self) {
        for i in 0..self.inputs.len() {
            self.flush_input(InputId::new(i as u16));
        }
    }

    /// Flush one input: take its pending chunk, create a task, fan out
    pub(crate) fn flush_input(&mut self, input_id: InputId) {
        let (chunk, tag) = {
            let input = &mut self.inputs[input_id.as_usize()];
            match input.plugin.flush() {
                Some(chunk) if !chunk.is_empty() => (chunk, input.tag.clone()),
                _ => return,
            }
        };

        let routes = self.router.route(input_id);
        if routes.is_empty() {
            debug!(tag = %tag, records = chunk.count(), "chunk has no route, dropping");
            StatsCounters::incr(&self.counters.chunks_dropped);
            return;
        }
        let routes = routes.to_vec();

        let records = chunk.count();
        let task_id = match self.tasks.create(input_id, tag.clone(), chunk) {
            Ok(id) => id,
            Err(err) => {
                warn!(tag = %tag, %err, "dropping chunk");
                StatsCounters::incr(&self.counters.chunks_dropped);
                return;
            }
        };
        StatsCounters::incr(&self.counters.tasks_created);
        debug!(%task_id, tag = %tag, records, destinations = routes.len(), "task created");

        for output in routes {
            self.spawn_attempt(task_id, output);
        }
        self.destroy_if_done(task_id);
    }

    /// Spawn one cooperative delivery attempt for a (task, destination) pair
    pub(crate) fn spawn_attempt(&mut self, task_id: TaskId, output_id: OutputId) {
        let Some(task) = self.tasks.get_mut(task_id) else {
            debug!(%task_id, "attempt requested for released task");
            return;
        };
        let attempt = match task.add_attempt(output_id) {
            Ok(attempt) => attempt,
            Err(err) => {
                warn!(%task_id, %err, "cannot spawn attempt");
                return;
            }
        };
        let chunk = task.chunk();
        let tag = task.tag().clone();

        let output = Arc::clone(&self.outputs[output_id.as_usize()].plugin);
        let sender = self.sender.clone();
        StatsCounters::incr(&self.counters.attempts_spawned);

        tokio::spawn(async move {
            let outcome = output.flush(chunk, &tag).await;
            // A send failure means the reactor is already gone
            let _ = sender.send(Signal::task_event(outcome, task_id, attempt));
        });
    }

    /// Apply the reported outcome of a finished attempt
    ///
    /// Order matters: resolve the effective outcome first (retry accounting
    /// may turn a `Retry` into an `Error`), then inform the buffering
    /// adapter, then consider the task for destruction.
    pub(crate) fn handle_task_event(
        &mut self,
        outcome: FlushOutcome,
        task_id: TaskId,
        attempt_id: AttemptId,
    ) {
        let Some(task) = self.tasks.get_mut(task_id) else {
            warn!(%task_id, %attempt_id, "outcome for unknown task");
            return;
        };
        let Some(output) = task.finish_attempt(attempt_id) else {
            warn!(%task_id, %attempt_id, "outcome for unknown attempt");
            return;
        };

        let effective = match outcome {
            FlushOutcome::Ok => {
                task.clear_retry(output);
                StatsCounters::incr(&self.counters.attempts_ok);
                FlushOutcome::Ok
            }
            FlushOutcome::Error => {
                task.clear_retry(output);
                StatsCounters::incr(&self.counters.attempts_failed);
                FlushOutcome::Error
            }
            FlushOutcome::Retry if self.stopping => {
                // No new retries once shutdown began
                debug!(%task_id, output = output.index(), "dropping retry request during shutdown");
                task.clear_retry(output);
                StatsCounters::incr(&self.counters.attempts_failed);
                FlushOutcome::Error
            }
            FlushOutcome::Retry => {
                StatsCounters::incr(&self.counters.attempts_retried);
                let attempt_number = task.bump_retry(output);
                match self.retries.schedule(task_id, output, attempt_number) {
                    Ok(delay) => {
                        task.mark_retry_pending(output);
                        StatsCounters::incr(&self.counters.retries_scheduled);
                        debug!(
                            %task_id,
                            output = output.index(),
                            attempt_number,
                            ?delay,
                            "retry scheduled"
                        );
                        FlushOutcome::Retry
                    }
                    Err(err) => {
                        warn!(%task_id, output = output.index(), %err, "retry not scheduled, failing pair");
                        task.clear_retry(output);
                        StatsCounters::incr(&self.counters.retries_exhausted);
                        StatsCounters::incr(&self.counters.attempts_failed);
                        FlushOutcome::Error
                    }
                }
            }
        };

        if let Some(buffer) = self.buffer.as_mut() {
            buffer.on_attempt_result(task_id, attempt_id, effective);
        }
        self.destroy_if_done(task_id);
    }

    /// Respawn the attempt whose retry record just fired
    pub(crate) fn handle_retry_fired(&mut self, record: RetryRecord) {
        StatsCounters::incr(&self.counters.retries_fired);

        let Some(task) = self.tasks.get_mut(record.task) else {
            debug!(task_id = %record.task, "retry fired for released task");
            return;
        };
        if !task.take_retry_pending(record.output) {
            // Pair was cleared between arming and firing
            debug!(task_id = %record.task, output = record.output.index(), "stale retry record");
            self.destroy_if_done(record.task);
            return;
        }

        debug!(
            task_id = %record.task,
            output = record.output.index(),
            attempt_number = record.attempt_number,
            "retry firing"
        );
        self.spawn_attempt(record.task, record.output);
        self.destroy_if_done(record.task);
    }

    /// Drive one interval collector tick
    pub(crate) fn run_collector(&mut self, input_id: InputId) {
        let result = {
            let input = &mut self.inputs[input_id.as_usize()];
            input.plugin.collect()
        };
        match result {
            Ok(()) => self.collectors.rearm(input_id),
            Err(CollectError::Closed) => {
                let name = &self.inputs[input_id.as_usize()].name;
                debug!(input = %name, "collector closed, disarming");
                self.collectors.disarm(input_id);
            }
            Err(err) => {
                let name = &self.inputs[input_id.as_usize()].name;
                warn!(input = %name, %err, "collect failed");
                StatsCounters::incr(&self.counters.collect_errors);
                self.collectors.rearm(input_id);
            }
        }
    }

    /// Release a task once nothing references it
    pub(crate) fn destroy_if_done(&mut self, task_id: TaskId) {
        let done = self.tasks.get(task_id).is_some_and(|task| task.is_done());
        if done {
            self.tasks.remove(task_id);
            StatsCounters::incr(&self.counters.tasks_destroyed);
            debug!(%task_id, "task destroyed");
        }
    }
}
