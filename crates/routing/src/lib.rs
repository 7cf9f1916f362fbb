//! Relay - Routing
//!
//! Static routing from inputs to their subscribed outputs. The table is
//! compiled once after all plugins are registered and is immutable
//! afterwards; the dispatcher queries it in O(1) during every flush.
//!
//! Rules match output subscriptions against input tags, with `*` wildcard
//! support, at compile time only - the hot path never touches a pattern.

mod error;
mod matcher;
mod table;

pub use error::{Result, RoutingError};
pub use matcher::tag_match;
pub use table::{RoutingTable, RoutingTableBuilder};

// Re-export the identifier types the table is keyed on
pub use relay_protocol::{InputId, OutputId, Tag};
