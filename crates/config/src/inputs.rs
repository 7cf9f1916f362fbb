//! Input configuration types
//!
//! Inputs produce the records that flow into the pipeline. Each instance
//! carries the routing tag its chunks are stamped with.

use serde::Deserialize;
use std::time::Duration;

/// Container for all input configurations
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    /// Memory inputs (push-fed by the embedding application)
    /// Can have multiple instances with different tags
    #[serde(default)]
    pub memory: Vec<MemoryInputConfig>,

    /// Counter inputs (synthetic records on a timer, for smoke tests)
    #[serde(default)]
    pub counter: Vec<CounterInputConfig>,
}

impl InputsConfig {
    /// Iterate over all instances as (name, tag, enabled)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        let memory = self
            .memory
            .iter()
            .map(|m| (m.name.as_str(), m.tag.as_str(), m.enabled));
        let counter = self
            .counter
            .iter()
            .map(|c| (c.name.as_str(), c.tag.as_str(), c.enabled));
        memory.chain(counter)
    }

    /// Check if no inputs are declared
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty() && self.counter.is_empty()
    }
}

/// Memory input configuration
///
/// # Example
///
/// ```toml
/// [[inputs.memory]]
/// name = "app"
/// tag = "app.log"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryInputConfig {
    /// Whether this input is enabled
    /// Default: true (enabled when config is present)
    pub enabled: bool,

    /// Instance name, used in logs
    /// Default: "memory"
    pub name: String,

    /// Routing tag stamped on every chunk this input produces
    pub tag: String,
}

impl Default for MemoryInputConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "memory".into(),
            tag: String::new(),
        }
    }
}

/// Counter input configuration
///
/// # Example
///
/// ```toml
/// [[inputs.counter]]
/// tag = "counter.demo"
/// interval = "1s"
/// limit = 100
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CounterInputConfig {
    /// Whether this input is enabled
    /// Default: true
    pub enabled: bool,

    /// Instance name, used in logs
    /// Default: "counter"
    pub name: String,

    /// Routing tag stamped on every chunk this input produces
    pub tag: String,

    /// Collect tick interval
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Stop emitting after this many records
    /// Default: unbounded
    pub limit: Option<u64>,
}

impl Default for CounterInputConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "counter".into(),
            tag: String::new(),
            interval: Duration::from_secs(1),
            limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_multiple_memory() {
        let toml = r#"
[[memory]]
name = "app"
tag = "app.log"

[[memory]]
name = "audit"
tag = "audit.log"
enabled = false
"#;
        let config: InputsConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.memory.len(), 2);
        assert!(config.memory[0].enabled);
        assert!(!config.memory[1].enabled);
        assert_eq!(config.memory[1].tag, "audit.log");
    }

    #[test]
    fn test_deserialize_counter_with_interval() {
        let toml = r#"
[[counter]]
tag = "counter.demo"
interval = "250ms"
limit = 10
"#;
        let config: InputsConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.counter[0].interval, Duration::from_millis(250));
        assert_eq!(config.counter[0].limit, Some(10));
        assert_eq!(config.counter[0].name, "counter");
    }

    #[test]
    fn test_iter_spans_all_kinds() {
        let toml = r#"
[[memory]]
name = "app"
tag = "app.log"

[[counter]]
name = "hb"
tag = "counter.hb"
"#;
        let config: InputsConfig = toml::from_str(toml).unwrap();
        let all: Vec<_> = config.iter().collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], ("app", "app.log", true));
        assert_eq!(all[1], ("hb", "counter.hb", true));
    }

    #[test]
    fn test_deserialize_empty() {
        let config: InputsConfig = toml::from_str("").unwrap();
        assert!(config.is_empty());
    }
}
