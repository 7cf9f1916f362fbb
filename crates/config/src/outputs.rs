//! Output configuration types
//!
//! Outputs are declared as a name -> config map with an internally tagged
//! `type` field, so `[outputs.primary]` with `type = "stdout"` declares a
//! stdout destination named `primary`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Container for all output configurations, keyed by instance name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct OutputsConfig {
    entries: BTreeMap<String, OutputConfig>,
}

impl OutputsConfig {
    /// Look up an output by name
    pub fn get(&self, name: &str) -> Option<&OutputConfig> {
        self.entries.get(name)
    }

    /// Iterate over (name, config) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &OutputConfig)> {
        self.entries.iter()
    }

    /// Number of declared outputs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no outputs are declared
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One output destination
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputConfig {
    /// Write records to standard output
    Stdout(StdoutOutputConfig),

    /// Accept and discard everything
    Null(NullOutputConfig),
}

impl OutputConfig {
    /// Check whether this output is enabled
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Stdout(c) => c.enabled,
            Self::Null(c) => c.enabled,
        }
    }

    /// The `type` string this output was declared with
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Stdout(_) => "stdout",
            Self::Null(_) => "null",
        }
    }
}

/// Stdout output configuration
///
/// # Example
///
/// ```toml
/// [outputs.console]
/// type = "stdout"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StdoutOutputConfig {
    /// Whether this output is enabled
    /// Default: true
    pub enabled: bool,
}

impl Default for StdoutOutputConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Null output configuration
///
/// # Example
///
/// ```toml
/// [outputs.discard]
/// type = "null"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NullOutputConfig {
    /// Whether this output is enabled
    /// Default: true
    pub enabled: bool,
}

impl Default for NullOutputConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
