//! Routing table for O(1) input-to-outputs lookup
//!
//! The table is compiled once at startup, after every input and output
//! instance is registered. All allocation happens during compilation; the
//! `route()` call on the flush path is a bounds-checked index returning a
//! slice reference.

use relay_protocol::{InputId, OutputId, Tag};

use crate::error::{Result, RoutingError};
use crate::matcher::tag_match;

/// Pre-compiled routing table
///
/// Maps each input (by dense integer id) to the ordered set of outputs
/// subscribed to its tag. Immutable after compilation.
///
/// # Example
///
/// ```
/// use relay_routing::{InputId, RoutingTableBuilder, Tag};
///
/// let mut builder = RoutingTableBuilder::new();
/// let stdout = builder.register_output("stdout", "serial.*");
/// let nats = builder.register_output("nats", "*");
///
/// let table = builder
///     .compile(&[
///         (InputId::new(0), Tag::new("serial.tty0")),
///         (InputId::new(1), Tag::new("http.request")),
///     ])
///     .unwrap();
///
/// assert_eq!(table.route(InputId::new(0)), &[stdout, nats]);
/// assert_eq!(table.route(InputId::new(1)), &[nats]);
/// ```
#[derive(Debug, Clone)]
pub struct RoutingTable {
    /// Routes indexed by input id
    routes: Vec<Vec<OutputId>>,

    /// Output names for logging/diagnostics (indexed by OutputId)
    output_names: Vec<String>,
}

impl RoutingTable {
    /// Route an input to its destination outputs
    ///
    /// This is the hot path: O(1) index, returns a slice into pre-allocated
    /// storage. An unknown input id routes nowhere.
    #[inline]
    #[must_use]
    pub fn route(&self, input: InputId) -> &[OutputId] {
        self.routes
            .get(input.as_usize())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Get the name of an output by id
    #[inline]
    pub fn output_name(&self, id: OutputId) -> Option<&str> {
        self.output_names.get(id.as_usize()).map(String::as_str)
    }

    /// Get the number of registered outputs
    #[inline]
    pub fn output_count(&self) -> usize {
        self.output_names.len()
    }

    /// Get the number of routed inputs
    #[inline]
    pub fn input_count(&self) -> usize {
        self.routes.len()
    }

    /// Iterate over all routes
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (InputId, &[OutputId])> {
        self.routes
            .iter()
            .enumerate()
            .map(|(i, outs)| (InputId::new(i as u16), outs.as_slice()))
    }
}

/// Builder that compiles output subscriptions into a routing table
///
/// Each output registers with one or more tag patterns; at compile time
/// every input's route set becomes the outputs (in registration order) with
/// a pattern matching the input's tag.
#[derive(Debug, Default)]
pub struct RoutingTableBuilder {
    /// Output names in registration order
    output_names: Vec<String>,

    /// Subscription patterns per output (parallel to output_names); an
    /// output matches an input when any of its patterns does
    patterns: Vec<Vec<String>>,
}

impl RoutingTableBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an output with its subscription pattern
    ///
    /// Returns the assigned output id. Ids are sequential registration order.
    pub fn register_output(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> OutputId {
        self.register_output_patterns(name, vec![pattern.into()])
    }

    /// Register an output subscribed under several patterns at once
    ///
    /// An empty pattern list subscribes the output to nothing.
    pub fn register_output_patterns(&mut self, name: impl Into<String>, patterns: Vec<String>) -> OutputId {
        let id = OutputId::new(self.output_names.len() as u16);
        self.output_names.push(name.into());
        self.patterns.push(patterns);
        id
    }

    /// Get the id of a registered output by name
    pub fn output_id(&self, name: &str) -> Option<OutputId> {
        self.output_names
            .iter()
            .position(|n| n == name)
            .map(|i| OutputId::new(i as u16))
    }

    /// Compile the routing table against the registered inputs
    ///
    /// Inputs must be dense: ids 0..n in order. Inputs whose tag matches no
    /// subscription get an empty route set; the dispatcher drops their data
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if input ids are not dense registration order, or if
    /// an output was registered with an empty pattern.
    pub fn compile(self, inputs: &[(InputId, Tag)]) -> Result<RoutingTable> {
        for (index, (id, _)) in inputs.iter().enumerate() {
            if id.as_usize() != index {
                return Err(RoutingError::NonDenseInputs {
                    expected: index,
                    found: id.as_usize(),
                });
            }
        }

        for (name, patterns) in self.output_names.iter().zip(self.patterns.iter()) {
            if patterns.iter().any(String::is_empty) {
                return Err(RoutingError::EmptyPattern { output: name.clone() });
            }
        }

        let mut routes = Vec::with_capacity(inputs.len());
        for (_, tag) in inputs {
            let outs: Vec<OutputId> = self
                .patterns
                .iter()
                .enumerate()
                .filter(|(_, patterns)| patterns.iter().any(|p| tag_match(p, tag.as_str())))
                .map(|(i, _)| OutputId::new(i as u16))
                .collect();
            routes.push(outs);
        }

        Ok(RoutingTable {
            routes,
            output_names: self.output_names,
        })
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;
