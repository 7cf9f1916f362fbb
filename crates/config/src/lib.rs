//! Relay Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! A minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use relay_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[outputs.stdout]\ntype = \"stdout\"").unwrap();
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [[inputs.memory]]
//! tag = "app.log"
//!
//! [outputs.stdout]
//! type = "stdout"
//!
//! [routing]
//! default = ["stdout"]
//! ```

mod error;
mod inputs;
mod outputs;
mod routing;
mod service;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use inputs::{CounterInputConfig, InputsConfig, MemoryInputConfig};
pub use outputs::{NullOutputConfig, OutputConfig, OutputsConfig, StdoutOutputConfig};
pub use routing::{MatchCondition, RoutingConfig, RoutingRule};
pub use service::ServiceConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine-wide settings (flush cadence, grace period, retry policy)
    pub service: ServiceConfig,

    /// Data inputs (memory, counter)
    pub inputs: InputsConfig,

    /// Delivery destinations (stdout, null)
    pub outputs: OutputsConfig,

    /// Routing rules (tag pattern -> output mapping)
    pub routing: RoutingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Checks for:
    /// - Routing references only declared outputs
    /// - No duplicate input or output names
    /// - Counter intervals are non-zero
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Get list of enabled input names
    pub fn enabled_inputs(&self) -> Vec<&str> {
        self.inputs
            .iter()
            .filter(|(_, _, enabled)| *enabled)
            .map(|(name, _, _)| name)
            .collect()
    }

    /// Get list of enabled output names
    pub fn enabled_outputs(&self) -> Vec<String> {
        self.outputs
            .iter()
            .filter(|(_, output)| output.is_enabled())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
