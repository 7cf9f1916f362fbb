//! Wiring an engine from a parsed configuration
//!
//! Bridges the declarative [`relay_config`] model onto a registered
//! [`Engine`]: one plugin instance per enabled input and output, router
//! subscriptions derived from the routing section, and the in-memory
//! buffering adapter when `service.buffering` is set.
//!
//! Routing defaults are resolved here rather than in the router: a default
//! output receives the tags matched by no rule, which depends on the whole
//! rule set, so the bridge expands the default list into exact-tag
//! subscriptions against the configured inputs.

use std::collections::HashMap;

use tracing::debug;

use relay_config::{Config, OutputConfig, RoutingConfig, ServiceConfig};
use relay_inputs::{CounterInput, MemoryHandle, MemoryInput};
use relay_outputs::{NullOutput, StdoutOutput};
use relay_plugin::Output;
use relay_protocol::Tag;
use relay_routing::tag_match;

use crate::buffer::{MemoryBuffer, MemoryBufferHandle};
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::Result;

impl From<&ServiceConfig> for EngineConfig {
    fn from(service: &ServiceConfig) -> Self {
        Self {
            flush_interval: service.flush_interval,
            grace_period: service.grace_period,
            retry_limit: service.retry_limit,
            retry_base: service.retry_base,
            retry_cap: service.retry_cap,
        }
    }
}

/// A registered engine plus the handles the embedder keeps
pub struct EngineSetup {
    /// Fully registered engine, ready to run
    pub engine: Engine,

    /// Producer handles for the memory inputs, keyed by instance name
    pub memory: HashMap<String, MemoryHandle>,

    /// Read side of the buffering adapter, present when `service.buffering`
    /// is set
    pub buffer: Option<MemoryBufferHandle>,
}

/// Build a wired engine from a validated configuration
///
/// Disabled instances are skipped entirely. An enabled output referenced by
/// no rule and absent from the routing default receives nothing.
///
/// # Errors
///
/// Fails when input or output registration exhausts the id space.
pub fn build_engine(config: &Config) -> Result<EngineSetup> {
    let mut engine = Engine::new(EngineConfig::from(&config.service));
    let mut memory = HashMap::new();
    let mut input_tags: Vec<String> = Vec::new();

    for m in config.inputs.memory.iter().filter(|m| m.enabled) {
        let (input, handle) = MemoryInput::new(m.name.clone());
        engine.add_input(Tag::new(m.tag.as_str()), Box::new(input))?;
        memory.insert(m.name.clone(), handle);
        input_tags.push(m.tag.clone());
    }
    for c in config.inputs.counter.iter().filter(|c| c.enabled) {
        let input = CounterInput::with_config(relay_inputs::CounterInputConfig {
            name: c.name.clone(),
            interval: c.interval,
            limit: c.limit,
        });
        engine.add_input(Tag::new(c.tag.as_str()), Box::new(input))?;
        input_tags.push(c.tag.clone());
    }

    let fallback = fallback_tags(&config.routing, &input_tags);
    for (name, output) in config.outputs.iter() {
        if !output.is_enabled() {
            debug!(output = %name, "skipping disabled output");
            continue;
        }
        let patterns = subscription_patterns(&config.routing, name, &fallback);
        if patterns.is_empty() {
            debug!(output = %name, "output has no subscriptions");
        }
        let plugin: Box<dyn Output> = match output {
            OutputConfig::Stdout(_) => Box::new(StdoutOutput::new(name.clone())),
            OutputConfig::Null(_) => Box::new(NullOutput::new(name.clone())),
        };
        engine.add_output_patterns(patterns, plugin)?;
    }

    let buffer = if config.service.buffering {
        let (adapter, handle) = MemoryBuffer::new();
        engine.set_buffer(Box::new(adapter));
        Some(handle)
    } else {
        None
    };

    debug!(
        inputs = input_tags.len(),
        outputs = config.outputs.len(),
        buffering = config.service.buffering,
        "engine wired from config"
    );
    Ok(EngineSetup {
        engine,
        memory,
        buffer,
    })
}

/// Input tags matched by no routing rule; these fall through to the default
/// outputs
fn fallback_tags<'a>(routing: &RoutingConfig, input_tags: &'a [String]) -> Vec<&'a str> {
    input_tags
        .iter()
        .map(String::as_str)
        .filter(|tag| {
            !routing.rules.iter().any(|rule| {
                rule.match_condition
                    .tag
                    .as_deref()
                    .is_some_and(|pattern| tag_match(pattern, tag))
            })
        })
        .collect()
}

/// Router subscriptions for one output: its rule patterns, plus the exact
/// fallback tags when it is a default output
fn subscription_patterns(routing: &RoutingConfig, name: &str, fallback: &[&str]) -> Vec<String> {
    let mut patterns: Vec<String> = routing
        .patterns_for(name)
        .into_iter()
        .map(String::from)
        .collect();
    if routing.default.iter().any(|d| d == name) {
        for tag in fallback {
            if !patterns.iter().any(|p| p == tag) {
                patterns.push((*tag).to_string());
            }
        }
    }
    patterns
}

#[cfg(test)]
#[path = "setup_test.rs"]
mod setup_test;
