//! Configuration error types

use std::io;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error - output referenced in routing doesn't exist
    #[error("routing references unknown output '{output}'")]
    UnknownOutput {
        /// Name of the missing output
        output: String,
    },

    /// Validation error - two instances share a name
    #[error("duplicate {component} name '{name}'")]
    DuplicateName {
        /// Component type (e.g. "input", "output")
        component: &'static str,
        /// The conflicting name
        name: String,
    },

    /// Validation error - required field missing
    #[error("{component} '{name}' is missing required field '{field}'")]
    MissingField {
        /// Component type
        component: &'static str,
        /// Name of the component
        name: String,
        /// Missing field name
        field: &'static str,
    },

    /// Validation error - invalid value
    #[error("{component} '{name}' has invalid {field}: {message}")]
    InvalidValue {
        /// Component type
        component: &'static str,
        /// Name of the component
        name: String,
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },

    /// A routing rule has no match condition
    #[error("routing rule {index} has an empty match condition")]
    EmptyMatch {
        /// Zero-based rule index
        index: usize,
    },
}

impl ConfigError {
    /// Create an UnknownOutput error
    pub fn unknown_output(output: impl Into<String>) -> Self {
        Self::UnknownOutput {
            output: output.into(),
        }
    }

    /// Create a DuplicateName error
    pub fn duplicate_name(component: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            component,
            name: name.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
    ) -> Self {
        Self::MissingField {
            component,
            name: name.into(),
            field,
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            component,
            name: name.into(),
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_output_error() {
        let err = ConfigError::unknown_output("archive");
        assert!(err.to_string().contains("archive"));
        assert!(err.to_string().contains("unknown output"));
    }

    #[test]
    fn test_duplicate_name_error() {
        let err = ConfigError::duplicate_name("input", "app");
        assert!(err.to_string().contains("input"));
        assert!(err.to_string().contains("app"));
    }

    #[test]
    fn test_missing_field_error() {
        let err = ConfigError::missing_field("input", "app", "tag");
        assert!(err.to_string().contains("'app'"));
        assert!(err.to_string().contains("tag"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("input", "hb", "interval", "must be non-zero");
        assert!(err.to_string().contains("hb"));
        assert!(err.to_string().contains("interval"));
        assert!(err.to_string().contains("non-zero"));
    }
}
