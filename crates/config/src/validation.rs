//! Configuration validation
//!
//! Validates config consistency:
//! - Input and output names are unique
//! - Enabled inputs have a tag
//! - Counter intervals are non-zero
//! - Routing rules have a match condition and reference declared outputs

use crate::error::{ConfigError, Result};
use crate::Config;
use std::collections::HashSet;
use std::time::Duration;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_inputs(config)?;
    validate_outputs(config)?;
    validate_routing(config)?;
    Ok(())
}

fn validate_inputs(config: &Config) -> Result<()> {
    let mut names: HashSet<&str> = HashSet::new();

    for (name, tag, enabled) in config.inputs.iter() {
        if !names.insert(name) {
            return Err(ConfigError::duplicate_name("input", name));
        }
        if enabled && tag.is_empty() {
            return Err(ConfigError::missing_field("input", name, "tag"));
        }
    }

    for counter in &config.inputs.counter {
        if counter.enabled && counter.interval == Duration::ZERO {
            return Err(ConfigError::invalid_value(
                "input",
                &counter.name,
                "interval",
                "must be non-zero",
            ));
        }
    }

    Ok(())
}

fn validate_outputs(_config: &Config) -> Result<()> {
    // Names are map keys, so uniqueness comes from the TOML structure;
    // nothing else to check for the current output kinds.
    Ok(())
}

fn validate_routing(config: &Config) -> Result<()> {
    for (index, rule) in config.routing.rules.iter().enumerate() {
        if rule.match_condition.is_empty() {
            return Err(ConfigError::EmptyMatch { index });
        }
    }

    for output in config.routing.referenced_outputs() {
        if config.outputs.get(output).is_none() {
            return Err(ConfigError::unknown_output(output));
        }
    }

    Ok(())
}
