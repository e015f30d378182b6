//! Read and write DOT graphs from files and open streams.

use crate::dot_parser::parse_dot;
use crate::dot_writer::ToDot;
use crate::error::DotError;
use crate::text_codec::{decode_text_owned, encode_text};
use crate::types::{DotGraph, NodeLabel};
use std::io::{Read, Write};
use std::path::Path;
use tracing::instrument;

/// Conventional extension for DOT files.
pub const DOT_EXTENSION: &str = "dot";

/// Writes the readable form of `graph` to `path`, creating parent directories.
#[instrument(level = "trace", skip(path, graph))]
pub fn write_dot_file<N: NodeLabel>(path: &Path, graph: &DotGraph<N>) -> Result<(), DotError> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, encode_text(&graph.to_dot()))?;
  tracing::debug!(path = %path.display(), "wrote DOT file");
  Ok(())
}

/// Reads and parses the DOT file at `path`.
#[instrument(level = "trace", skip(path))]
pub fn read_dot_file<N: NodeLabel>(path: &Path) -> Result<DotGraph<N>, DotError> {
  let bytes = std::fs::read(path)?;
  let text = decode_text_owned(bytes)?;
  parse_dot(&text)
}

/// Writes the readable form of `graph` to an open stream and flushes it.
pub fn write_dot<N: NodeLabel, W: Write>(writer: &mut W, graph: &DotGraph<N>) -> Result<(), DotError> {
  writer.write_all(encode_text(&graph.to_dot()))?;
  writer.flush()?;
  Ok(())
}

/// Writes the compact form of `graph` to an open stream and flushes it.
pub fn write_compact_dot<N: NodeLabel, W: Write>(
  writer: &mut W,
  graph: &DotGraph<N>,
) -> Result<(), DotError> {
  writer.write_all(encode_text(&graph.to_compact_dot()))?;
  writer.flush()?;
  Ok(())
}

/// Reads an open stream to its end and parses it.
pub fn read_dot<N: NodeLabel, R: Read>(reader: &mut R) -> Result<DotGraph<N>, DotError> {
  let mut bytes = Vec::new();
  reader.read_to_end(&mut bytes)?;
  let text = decode_text_owned(bytes)?;
  parse_dot(&text)
}
