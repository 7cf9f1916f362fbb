//! Engine builder and reactor loop
//!
//! [`Engine`] is the startup-time registry: plugins, routing patterns, the
//! buffering adapter. `run` consumes it, initializes every plugin, compiles
//! the routing table, and becomes the reactor: one `select!` loop that owns
//! all mutable delivery state and serves five event sources (flush timer,
//! manager channel, retry wheel, collector timers, shutdown grace timer).
//!
//! Every handler runs to completion before the next event is served, which
//! is the whole concurrency story for the task table: no locks, no torn
//! state, transitions are atomic by construction.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{self, Instant, MissedTickBehavior, Sleep};
use tracing::{debug, info, warn};

use relay_plugin::{Input, Output};
use relay_protocol::{InputId, OutputId, Tag};
use relay_routing::{RoutingTable, RoutingTableBuilder};
use relay_signal::{ManagerChannel, ManagerSender, Signal};

use crate::buffer::BufferAdapter;
use crate::collector::CollectorRegistry;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::handle::EngineHandle;
use crate::retry::{RetryRecord, RetryScheduler};
use crate::task::TaskTable;

/// Shared engine counters, updated by the reactor, read by handles
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    pub(crate) flush_cycles: AtomicU64,
    pub(crate) tasks_created: AtomicU64,
    pub(crate) tasks_destroyed: AtomicU64,
    pub(crate) attempts_spawned: AtomicU64,
    pub(crate) attempts_ok: AtomicU64,
    pub(crate) attempts_retried: AtomicU64,
    pub(crate) attempts_failed: AtomicU64,
    pub(crate) retries_scheduled: AtomicU64,
    pub(crate) retries_fired: AtomicU64,
    pub(crate) retries_exhausted: AtomicU64,
    pub(crate) chunks_dropped: AtomicU64,
    pub(crate) collect_errors: AtomicU64,
    pub(crate) workers_released: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> EngineStats {
        EngineStats {
            flush_cycles: self.flush_cycles.load(Ordering::Relaxed),
            tasks_created: self.tasks_created.load(Ordering::Relaxed),
            tasks_destroyed: self.tasks_destroyed.load(Ordering::Relaxed),
            attempts_spawned: self.attempts_spawned.load(Ordering::Relaxed),
            attempts_ok: self.attempts_ok.load(Ordering::Relaxed),
            attempts_retried: self.attempts_retried.load(Ordering::Relaxed),
            attempts_failed: self.attempts_failed.load(Ordering::Relaxed),
            retries_scheduled: self.retries_scheduled.load(Ordering::Relaxed),
            retries_fired: self.retries_fired.load(Ordering::Relaxed),
            retries_exhausted: self.retries_exhausted.load(Ordering::Relaxed),
            chunks_dropped: self.chunks_dropped.load(Ordering::Relaxed),
            collect_errors: self.collect_errors.load(Ordering::Relaxed),
            workers_released: self.workers_released.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of engine activity counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Flush cycles run (timed and forced)
    pub flush_cycles: u64,
    /// Tasks created from flushed chunks
    pub tasks_created: u64,
    /// Tasks fully released
    pub tasks_destroyed: u64,
    /// Delivery attempts spawned
    pub attempts_spawned: u64,
    /// Attempts that delivered
    pub attempts_ok: u64,
    /// Attempts that asked for a retry
    pub attempts_retried: u64,
    /// Attempts that failed permanently (including exhausted retries)
    pub attempts_failed: u64,
    /// Retry records armed
    pub retries_scheduled: u64,
    /// Retry records that fired and respawned an attempt
    pub retries_fired: u64,
    /// Retry requests past the per-pair budget
    pub retries_exhausted: u64,
    /// Chunks dropped without a task (no route, or table full)
    pub chunks_dropped: u64,
    /// Non-fatal collector failures
    pub collect_errors: u64,
    /// Input workers released after completion
    pub workers_released: u64,
}

/// How the engine loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Stop completed with no work left in flight
    Stopped,
    /// Grace period elapsed with tasks still in flight
    GraceExpired,
}

/// Final accounting returned by [`Engine::run`]
#[derive(Debug, Clone)]
pub struct EngineReport {
    pub status: ExitStatus,
    pub stats: EngineStats,
    /// Tasks abandoned when the grace period ran out
    pub tasks_abandoned: usize,
}

struct InputRegistration {
    tag: Tag,
    plugin: Box<dyn Input>,
}

struct OutputRegistration {
    patterns: Vec<String>,
    plugin: Box<dyn Output>,
}

pub(crate) struct InputRt {
    pub(crate) tag: Tag,
    pub(crate) name: String,
    pub(crate) plugin: Box<dyn Input>,
}

pub(crate) struct OutputRt {
    pub(crate) name: String,
    pub(crate) plugin: Arc<dyn Output>,
}

/// Forwarding engine, in its pre-run registration phase
///
/// # Example
///
/// ```no_run
/// # use relay_engine::{Engine, EngineConfig, Tag};
/// # use relay_inputs::CounterInput;
/// # use relay_outputs::StdoutOutput;
/// # async fn demo() -> relay_engine::Result<()> {
/// let mut engine = Engine::new(EngineConfig::default());
/// engine.add_input(Tag::new("counter.demo"), Box::new(CounterInput::new("demo")))?;
/// engine.add_output("counter.*", Box::new(StdoutOutput::new("stdout")))?;
///
/// let handle = engine.handle();
/// let report = engine.run().await?;
/// # Ok(()) }
/// ```
pub struct Engine {
    config: EngineConfig,
    channel: ManagerChannel,
    counters: Arc<StatsCounters>,
    inputs: Vec<InputRegistration>,
    outputs: Vec<OutputRegistration>,
    buffer: Option<Box<dyn BufferAdapter>>,
    workers: HashMap<u32, String>,
}

impl Engine {
    /// Create an engine with the given settings
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            channel: ManagerChannel::new(),
            counters: Arc::new(StatsCounters::default()),
            inputs: Vec::new(),
            outputs: Vec::new(),
            buffer: None,
            workers: HashMap::new(),
        }
    }

    /// Register an input under a routing tag
    ///
    /// # Errors
    ///
    /// Fails when the input id space is exhausted.
    pub fn add_input(&mut self, tag: Tag, plugin: Box<dyn Input>) -> Result<InputId> {
        if self.inputs.len() > usize::from(u16::MAX) {
            return Err(EngineError::TooManyInputs);
        }
        let id = InputId::new(self.inputs.len() as u16);
        self.inputs.push(InputRegistration { tag, plugin });
        Ok(id)
    }

    /// Register an output with the tag pattern that routes to it
    ///
    /// # Errors
    ///
    /// Fails when the output id space is exhausted.
    pub fn add_output(&mut self, pattern: impl Into<String>, plugin: Box<dyn Output>) -> Result<OutputId> {
        self.add_output_patterns(vec![pattern.into()], plugin)
    }

    /// Register an output subscribed under several tag patterns at once
    ///
    /// An empty pattern list routes nothing to the output.
    ///
    /// # Errors
    ///
    /// Fails when the output id space is exhausted.
    pub fn add_output_patterns(&mut self, patterns: Vec<String>, plugin: Box<dyn Output>) -> Result<OutputId> {
        if self.outputs.len() > usize::from(u16::MAX) {
            return Err(EngineError::TooManyOutputs);
        }
        let id = OutputId::new(self.outputs.len() as u16);
        self.outputs.push(OutputRegistration { patterns, plugin });
        Ok(id)
    }

    /// Install the buffering adapter
    pub fn set_buffer(&mut self, adapter: Box<dyn BufferAdapter>) {
        self.buffer = Some(adapter);
    }

    /// Name an input worker so its channel notifications log usefully
    pub fn register_worker(&mut self, worker: u32, name: impl Into<String>) {
        self.workers.insert(worker, name.into());
    }

    /// Get a control handle; valid before and during `run`
    #[must_use]
    pub fn handle(&self) -> EngineHandle {
        EngineHandle::new(self.channel.sender(), Arc::clone(&self.counters))
    }

    /// Get a raw manager sender for input workers
    #[must_use]
    pub fn sender(&self) -> ManagerSender {
        self.channel.sender()
    }

    /// Initialize plugins, compile routing, and run the reactor to stop
    ///
    /// # Errors
    ///
    /// Startup errors (plugin init, routing compilation) and a fully closed
    /// manager channel. A graceful stop is `Ok`.
    pub async fn run(mut self) -> Result<EngineReport> {
        let rx = self.channel.take_receiver()?;

        let mut inputs = Vec::with_capacity(self.inputs.len());
        for mut reg in self.inputs {
            let name = reg.plugin.name().to_string();
            reg.plugin.init().map_err(|source| EngineError::InputInit {
                name: name.clone(),
                source,
            })?;
            inputs.push(InputRt {
                tag: reg.tag,
                name,
                plugin: reg.plugin,
            });
        }

        let mut builder = RoutingTableBuilder::new();
        let mut outputs = Vec::with_capacity(self.outputs.len());
        for mut reg in self.outputs {
            let name = reg.plugin.name().to_string();
            reg.plugin.init().map_err(|source| EngineError::OutputInit {
                name: name.clone(),
                source,
            })?;
            builder.register_output_patterns(&name, reg.patterns);
            outputs.push(OutputRt {
                name,
                plugin: Arc::from(reg.plugin),
            });
        }

        let input_tags: Vec<(InputId, Tag)> = inputs
            .iter()
            .enumerate()
            .map(|(i, rt)| (InputId::new(i as u16), rt.tag.clone()))
            .collect();
        let router = builder.compile(&input_tags)?;

        let mut collectors = CollectorRegistry::new();
        for (i, rt) in inputs.iter().enumerate() {
            if let Some(interval) = rt.plugin.collector().interval() {
                collectors.arm(InputId::new(i as u16), interval);
            }
        }

        info!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            flush_interval = ?self.config.flush_interval,
            "engine starting"
        );
        self.channel.sender().send(Signal::Started)?;

        let reactor = Reactor {
            retries: RetryScheduler::new(
                self.config.retry_limit,
                self.config.retry_base,
                self.config.retry_cap,
            ),
            config: self.config,
            sender: self.channel.sender(),
            counters: self.counters,
            inputs,
            outputs,
            router,
            tasks: TaskTable::new(),
            collectors,
            buffer: self.buffer,
            workers: self.workers,
            stopping: false,
        };
        reactor.run(rx).await
    }
}

/// Running engine state; single writer for everything in here
pub(crate) struct Reactor {
    pub(crate) config: EngineConfig,
    pub(crate) sender: ManagerSender,
    pub(crate) counters: Arc<StatsCounters>,
    pub(crate) inputs: Vec<InputRt>,
    pub(crate) outputs: Vec<OutputRt>,
    pub(crate) router: RoutingTable,
    pub(crate) tasks: TaskTable,
    pub(crate) retries: RetryScheduler,
    pub(crate) collectors: CollectorRegistry,
    pub(crate) buffer: Option<Box<dyn BufferAdapter>>,
    pub(crate) workers: HashMap<u32, String>,
    pub(crate) stopping: bool,
}

/// Which event source woke the loop
enum Wake {
    FlushTick,
    Word(u64),
    Retry(RetryRecord),
    Collect(InputId),
    GraceElapsed,
}

async fn wait_grace(grace: &mut Option<Pin<Box<Sleep>>>) {
    match grace {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

impl Reactor {
    async fn run(mut self, mut rx: UnboundedReceiver<u64>) -> Result<EngineReport> {
        let mut ticker = time::interval_at(
            Instant::now() + self.config.flush_interval,
            self.config.flush_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Armed only after a stop request
        let mut grace: Option<Pin<Box<Sleep>>> = None;

        loop {
            let retries_armed = self.retries.has_pending();
            let collectors_armed = self.collectors.has_armed();

            let wake = tokio::select! {
                _ = ticker.tick() => Wake::FlushTick,
                word = rx.recv() => match word {
                    Some(word) => Wake::Word(word),
                    None => return Err(EngineError::ManagerChannelClosed),
                },
                Some(record) = self.retries.next_fired(), if retries_armed => {
                    Wake::Retry(record)
                }
                Some(input) = self.collectors.next_fired(), if collectors_armed => {
                    Wake::Collect(input)
                }
                () = wait_grace(&mut grace) => Wake::GraceElapsed,
            };

            match wake {
                Wake::FlushTick => {
                    StatsCounters::incr(&self.counters.flush_cycles);
                    self.flush_all();
                }
                Wake::Word(word) => match Signal::decode(word) {
                    Ok(Signal::Stop) => {
                        if !self.stopping {
                            info!(grace = ?self.config.grace_period, "stop requested");
                            StatsCounters::incr(&self.counters.flush_cycles);
                            self.flush_all();
                            if let Some(buffer) = self.buffer.as_mut() {
                                buffer.stop();
                            }
                            self.stopping = true;
                            grace = Some(Box::pin(time::sleep(self.config.grace_period)));
                        }
                    }
                    Ok(Signal::FlushAll) => {
                        StatsCounters::incr(&self.counters.flush_cycles);
                        self.flush_all();
                    }
                    Ok(Signal::Stats) => self.log_stats(),
                    Ok(Signal::Started) => info!("engine started"),
                    Ok(Signal::InputThread(worker)) => self.handle_worker_event(worker),
                    Ok(Signal::TaskEvent {
                        outcome,
                        task,
                        attempt,
                    }) => self.handle_task_event(outcome, task, attempt),
                    Ok(Signal::Buffer(event)) => {
                        if let Some(buffer) = self.buffer.as_mut() {
                            buffer.on_buffer_event(event);
                        }
                    }
                    Err(err) => warn!(word = %format!("{word:#018x}"), %err, "discarding undecodable word"),
                },
                Wake::Retry(record) => self.handle_retry_fired(record),
                Wake::Collect(input) => self.run_collector(input),
                // The grace period always runs to completion, even when
                // everything drained early; in-flight attempts get the full
                // window and the exit point stays deterministic.
                Wake::GraceElapsed => break,
            }
        }

        Ok(self.shutdown())
    }

    fn handle_worker_event(&mut self, worker: u32) {
        match self.workers.remove(&worker) {
            Some(name) => {
                StatsCounters::incr(&self.counters.workers_released);
                debug!(worker, name = %name, "input worker released");
            }
            None => warn!(worker, "release for unknown input worker"),
        }
    }

    fn log_stats(&self) {
        let stats = self.counters.snapshot();
        info!(
            tasks_in_flight = self.tasks.len(),
            retries_pending = self.retries.pending(),
            tasks_created = stats.tasks_created,
            tasks_destroyed = stats.tasks_destroyed,
            attempts_ok = stats.attempts_ok,
            attempts_failed = stats.attempts_failed,
            retries_scheduled = stats.retries_scheduled,
            chunks_dropped = stats.chunks_dropped,
            "engine stats"
        );
    }

    fn shutdown(mut self) -> EngineReport {
        let tasks_abandoned = self.tasks.len();
        if tasks_abandoned > 0 {
            warn!(tasks = tasks_abandoned, "grace period expired with tasks in flight");
        }

        for input in &mut self.inputs {
            input.plugin.exit();
        }
        for output in &self.outputs {
            output.plugin.exit();
        }

        let stats = self.counters.snapshot();
        let status = if tasks_abandoned == 0 {
            ExitStatus::Stopped
        } else {
            ExitStatus::GraceExpired
        };
        info!(
            ?status,
            tasks_created = stats.tasks_created,
            tasks_destroyed = stats.tasks_destroyed,
            attempts_ok = stats.attempts_ok,
            attempts_failed = stats.attempts_failed,
            "engine stopped"
        );

        EngineReport {
            status,
            stats,
            tasks_abandoned,
        }
    }
}
