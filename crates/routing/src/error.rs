//! Routing error types

use thiserror::Error;

/// Errors from routing table compilation
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Input ids handed to `compile` were not dense registration order
    #[error("inputs must be registered densely: expected id {expected}, found {found}")]
    NonDenseInputs { expected: usize, found: usize },

    /// An output subscribed with an empty pattern
    #[error("output '{output}' has an empty match pattern")]
    EmptyPattern { output: String },
}

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;
