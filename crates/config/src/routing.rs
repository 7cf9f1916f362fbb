//! Routing configuration
//!
//! Maps chunk tags to outputs. A rule's `match` condition carries a tag
//! pattern where a trailing `*` matches any suffix; every matching rule
//! contributes its outputs. Tags matched by no rule go to the default
//! outputs, and an empty default means such chunks are dropped.
//!
//! # Example
//!
//! ```toml
//! [routing]
//! default = ["console"]
//!
//! [[routing.rules]]
//! match = { tag = "app.*" }
//! outputs = ["console", "archive"]
//!
//! [[routing.rules]]
//! match = { tag = "counter.demo" }
//! outputs = ["discard"]
//! ```

use serde::Deserialize;

/// Routing configuration - defines how tags map to outputs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Default outputs for tags matched by no rule
    /// If empty, unmatched chunks are dropped
    pub default: Vec<String>,

    /// Routing rules; every matching rule contributes its outputs
    pub rules: Vec<RoutingRule>,
}

impl RoutingConfig {
    /// Check if any routing rules are configured
    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty()
    }

    /// Check if default outputs are configured
    pub fn has_default(&self) -> bool {
        !self.default.is_empty()
    }

    /// Get all output names referenced in routing (for validation)
    pub fn referenced_outputs(&self) -> Vec<&str> {
        let mut outputs: Vec<&str> = self.default.iter().map(|s| s.as_str()).collect();

        for rule in &self.rules {
            for output in &rule.outputs {
                if !outputs.contains(&output.as_str()) {
                    outputs.push(output.as_str());
                }
            }
        }

        outputs
    }

    /// Get the tag patterns that route to a given output
    pub fn patterns_for(&self, output: &str) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.outputs.iter().any(|o| o == output))
            .filter_map(|rule| rule.match_condition.tag.as_deref())
            .collect()
    }
}

/// A single routing rule
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingRule {
    /// Match condition (tag pattern)
    #[serde(rename = "match")]
    pub match_condition: MatchCondition,

    /// Target outputs for matched chunks
    pub outputs: Vec<String>,
}

/// Condition for matching chunk tags
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchCondition {
    /// Tag pattern; `*` matches any run of characters
    /// (e.g. "app.*" matches "app.log" and "app.audit")
    pub tag: Option<String>,
}

impl MatchCondition {
    /// Check if a pattern is specified
    pub fn is_empty(&self) -> bool {
        self.tag.is_none()
    }
}
