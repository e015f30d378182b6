//! # dotweave
//!
//! Build attributed graphs by composing statement runs, write them as canonical
//! Graphviz DOT, and pipe them through an external layout engine.
//!
//! ## Architecture
//!
//! - [`builder`]: `BuilderRun` accumulates statements in call order.
//! - [`cluster`] / [`assemble`]: nest runs into subgroups and finalize a [`DotGraph`].
//! - [`dot_writer`] / [`dot_parser`]: canonical DOT text and back.
//! - [`invoke`]: runs a renderer process with stdin, stdout and stderr handled
//!   concurrently.
//! - [`engine`]: Graphviz engines, output formats and render helpers.
//! - [`dot_io`]: files and open streams.

pub mod assemble;
pub mod builder;
pub mod cluster;
pub mod dot_io;
pub mod dot_parser;
#[cfg(test)]
mod dot_parser_test;
pub mod dot_writer;
pub mod engine;
pub mod error;
pub mod invoke;
pub mod text_codec;
#[cfg(test)]
mod test_support;
pub mod types;

pub use assemble::{assemble, digraph, digraph_unnamed, graph, graph_unnamed};
pub use builder::{
  BuilderRun, arrow, edge, edge_attrs, graph_attrs, line, node, node_attrs, node_plain,
};
pub use cluster::{cluster, subgroup};
pub use dot_parser::parse_dot;
pub use dot_writer::ToDot;
pub use engine::{LayoutEngine, OutputFormat};
pub use error::DotError;
pub use invoke::{InvokeOptions, OutputConsumer, invoke, invoke_text, invoke_to_file};
pub use types::{
  Attribute, AttributeScope, AttributeValue, DotGraph, GraphId, HtmlLabel, NodeLabel, Statement,
  attr,
};
