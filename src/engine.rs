//! Graphviz layout engines and output formats, plus render helpers built on
//! [`crate::invoke`].

use crate::dot_parser::parse_dot;
use crate::error::DotError;
use crate::invoke::{CollectBytes, InvokeOptions, invoke, invoke_text, invoke_to_file};
use crate::types::{DotGraph, NodeLabel};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

/// A Graphviz layout program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutEngine {
  /// Hierarchical layout for directed graphs.
  #[default]
  Dot,
  /// Spring model layout.
  Neato,
  /// Radial layout.
  TwoPi,
  /// Circular layout.
  Circo,
  /// Force-directed layout.
  Fdp,
  /// Multiscale force-directed layout for large graphs.
  Sfdp,
  /// Array-based layout for clustered graphs.
  Osage,
  /// Squarified treemap.
  Patchwork,
}

impl LayoutEngine {
  pub const ALL: [LayoutEngine; 8] = [
    LayoutEngine::Dot,
    LayoutEngine::Neato,
    LayoutEngine::TwoPi,
    LayoutEngine::Circo,
    LayoutEngine::Fdp,
    LayoutEngine::Sfdp,
    LayoutEngine::Osage,
    LayoutEngine::Patchwork,
  ];

  /// Executable name looked up on `PATH`.
  pub fn command(self) -> &'static str {
    match self {
      LayoutEngine::Dot => "dot",
      LayoutEngine::Neato => "neato",
      LayoutEngine::TwoPi => "twopi",
      LayoutEngine::Circo => "circo",
      LayoutEngine::Fdp => "fdp",
      LayoutEngine::Sfdp => "sfdp",
      LayoutEngine::Osage => "osage",
      LayoutEngine::Patchwork => "patchwork",
    }
  }
}

impl fmt::Display for LayoutEngine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.command())
  }
}

impl FromStr for LayoutEngine {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lower = s.trim().to_lowercase();
    LayoutEngine::ALL
      .into_iter()
      .find(|e| e.command() == lower)
      .ok_or_else(|| format!("unknown layout engine '{}'", s))
  }
}

/// Output format selected with `-T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputFormat {
  /// Pretty-printed DOT without layout information.
  Canon,
  /// DOT annotated with layout positions.
  Dot,
  XDot,
  Plain,
  Json,
  #[default]
  Svg,
  Png,
  Pdf,
  Jpeg,
  Gif,
  Ps,
}

impl OutputFormat {
  pub const ALL: [OutputFormat; 11] = [
    OutputFormat::Canon,
    OutputFormat::Dot,
    OutputFormat::XDot,
    OutputFormat::Plain,
    OutputFormat::Json,
    OutputFormat::Svg,
    OutputFormat::Png,
    OutputFormat::Pdf,
    OutputFormat::Jpeg,
    OutputFormat::Gif,
    OutputFormat::Ps,
  ];

  /// Name passed after `-T`.
  pub fn name(self) -> &'static str {
    match self {
      OutputFormat::Canon => "canon",
      OutputFormat::Dot => "dot",
      OutputFormat::XDot => "xdot",
      OutputFormat::Plain => "plain",
      OutputFormat::Json => "json",
      OutputFormat::Svg => "svg",
      OutputFormat::Png => "png",
      OutputFormat::Pdf => "pdf",
      OutputFormat::Jpeg => "jpeg",
      OutputFormat::Gif => "gif",
      OutputFormat::Ps => "ps",
    }
  }

  pub fn flag(self) -> String {
    format!("-T{}", self.name())
  }

  /// Usual file extension for output in this format.
  pub fn extension(self) -> &'static str {
    match self {
      OutputFormat::Canon | OutputFormat::Dot => "dot",
      OutputFormat::XDot => "xdot",
      OutputFormat::Plain => "txt",
      OutputFormat::Jpeg => "jpg",
      other => other.name(),
    }
  }
}

impl fmt::Display for OutputFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for OutputFormat {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lower = s.trim().to_lowercase();
    if lower == "jpg" {
      return Ok(OutputFormat::Jpeg);
    }
    OutputFormat::ALL
      .into_iter()
      .find(|f| f.name() == lower)
      .ok_or_else(|| {
        let names: Vec<&str> = OutputFormat::ALL.iter().map(|f| f.name()).collect();
        format!("unsupported format '{}'; supported: {:?}", s, names)
      })
  }
}

/// Renders `graph` with `engine` and returns the raw output.
#[instrument(level = "trace", skip(graph, options))]
pub async fn render<N: NodeLabel>(
  engine: LayoutEngine,
  format: OutputFormat,
  graph: &DotGraph<N>,
  options: &InvokeOptions,
) -> Result<Bytes, DotError> {
  invoke(engine.command(), &[format.flag()], graph, CollectBytes, options).await
}

/// Renders `graph` into `path`, returning the number of bytes written. `path` is only
/// replaced once the engine succeeds.
#[instrument(level = "trace", skip(graph, options))]
pub async fn render_to_file<N: NodeLabel>(
  engine: LayoutEngine,
  format: OutputFormat,
  graph: &DotGraph<N>,
  path: &Path,
  options: &InvokeOptions,
) -> Result<u64, DotError> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent).await?;
  }
  let written = invoke_to_file(engine.command(), &[format.flag()], graph, path, options).await?;
  tracing::info!(%engine, %format, path = %path.display(), bytes = written, "rendered graph");
  Ok(written)
}

/// Runs `engine -Tcanon` and parses the result, yielding the graph as the engine
/// understands it (defaults made explicit, statements normalised).
pub async fn canonicalize<N: NodeLabel>(
  engine: LayoutEngine,
  graph: &DotGraph<N>,
  options: &InvokeOptions,
) -> Result<DotGraph<String>, DotError> {
  let text = invoke_text(engine.command(), &[OutputFormat::Canon.flag()], graph, options).await?;
  parse_dot(&text)
}

/// Returns true if `engine -V` can be spawned and exits successfully.
pub async fn is_engine_installed(engine: LayoutEngine) -> bool {
  match tokio::process::Command::new(engine.command())
    .arg("-V")
    .output()
    .await
  {
    Ok(out) => out.status.success(),
    Err(e) => {
      tracing::debug!(%engine, error = %e, "engine not available");
      false
    }
  }
}
