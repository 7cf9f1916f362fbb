//! Engine error types
//!
//! Only startup failures and a dead manager channel are fatal; everything
//! the reactor encounters while serving events resolves into a task-state
//! transition or a log line.

use thiserror::Error;

use relay_plugin::PluginError;
use relay_routing::RoutingError;
use relay_signal::SignalError;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// All manager senders disappeared while the reactor was running
    #[error("manager channel closed")]
    ManagerChannelClosed,

    /// Manager channel setup failed
    #[error(transparent)]
    Signal(#[from] SignalError),

    /// Routing table compilation failed
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// An input plugin failed to initialize
    #[error("input '{name}' failed to initialize: {source}")]
    InputInit {
        name: String,
        #[source]
        source: PluginError,
    },

    /// An output plugin failed to initialize
    #[error("output '{name}' failed to initialize: {source}")]
    OutputInit {
        name: String,
        #[source]
        source: PluginError,
    },

    /// Input registration exceeded the id space
    #[error("too many inputs registered")]
    TooManyInputs,

    /// Output registration exceeded the id space
    #[error("too many outputs registered")]
    TooManyOutputs,
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
