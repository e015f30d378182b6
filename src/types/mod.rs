//! Graph description types: attributes, identifiers, statements and the assembled graph.
//!
//! All types are plain values; they derive serde so a graph can be dumped as JSON.

mod attribute;
mod dot_graph;
mod graph_id;
mod html_label;
mod node_label;
mod statement;

pub use attribute::{Attribute, AttributeValue, attr};
pub use dot_graph::DotGraph;
pub use graph_id::GraphId;
pub use html_label::HtmlLabel;
pub use node_label::NodeLabel;
pub use statement::{AttributeScope, Statement};
