//! Signal error types

use thiserror::Error;

/// Errors from encoding, decoding, or sending signal words
#[derive(Debug, Error)]
pub enum SignalError {
    /// Word carried an unknown high-half category
    #[error("unknown signal category: {0}")]
    UnknownCategory(u32),

    /// Engine-category word carried an unknown key
    #[error("unknown engine signal key: {0:#x}")]
    UnknownEngineKey(u32),

    /// Task word carried outcome bits outside the defined range
    #[error("invalid attempt outcome bits: {0}")]
    InvalidOutcome(u32),

    /// The reactor side of the manager channel is gone
    #[error("manager channel closed")]
    ChannelClosed,

    /// The channel receiver was already taken
    #[error("manager channel receiver already taken")]
    ReceiverTaken,
}

/// Result type for signal operations
pub type Result<T> = std::result::Result<T, SignalError>;
