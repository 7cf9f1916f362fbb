//! External control surface
//!
//! A cheap, cloneable handle for talking to a running engine from outside
//! the reactor. Everything it does goes over the manager channel as a
//! 64-bit word except stats reads, which snapshot shared counters directly.

use std::sync::Arc;

use relay_signal::{ManagerSender, Signal};

use crate::engine::{EngineStats, StatsCounters};
use crate::error::Result;

/// Handle to a running engine
#[derive(Debug, Clone)]
pub struct EngineHandle {
    sender: ManagerSender,
    counters: Arc<StatsCounters>,
}

impl EngineHandle {
    pub(crate) fn new(sender: ManagerSender, counters: Arc<StatsCounters>) -> Self {
        Self { sender, counters }
    }

    /// Request a graceful stop
    ///
    /// The engine runs one final flush, then serves in-flight work for the
    /// configured grace period before returning from `run`.
    pub fn stop(&self) -> Result<()> {
        self.sender.send(Signal::Stop)?;
        Ok(())
    }

    /// Trigger an immediate flush of all inputs, outside the timer cadence
    pub fn flush_now(&self) -> Result<()> {
        self.sender.send(Signal::FlushAll)?;
        Ok(())
    }

    /// Ask the engine to log a stats summary
    pub fn log_stats(&self) -> Result<()> {
        self.sender.send(Signal::Stats)?;
        Ok(())
    }

    /// Snapshot the engine counters
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.counters.snapshot()
    }

    /// Get the raw manager sender, for wiring input workers or adapters
    #[must_use]
    pub fn sender(&self) -> ManagerSender {
        self.sender.clone()
    }
}
