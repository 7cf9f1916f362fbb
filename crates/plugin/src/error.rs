//! Plugin error types

use thiserror::Error;

/// Errors from plugin init/exit
#[derive(Debug, Error)]
pub enum PluginError {
    /// Plugin could not initialize
    #[error("failed to initialize plugin: {0}")]
    Init(String),

    /// Configuration handed to the plugin was invalid
    #[error("plugin configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    /// Create an initialization error
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Errors from an input's `collect` callback
#[derive(Debug, Error)]
pub enum CollectError {
    /// Collection failed; logged by the engine, the collector keeps running
    #[error("collect failed: {0}")]
    Failed(String),

    /// The underlying resource closed; the engine removes this collector
    #[error("collector resource closed")]
    Closed,
}

impl CollectError {
    /// Create a non-fatal collection failure
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}
