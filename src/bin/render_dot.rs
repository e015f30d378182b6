//! CLI: render a .dot file with a Graphviz engine, or re-emit it in canonical form.
//!
//! Usage: `render_dot [OPTIONS] <path-to-dot-file>`
//! Example: render_dot --format png --output out/graph.png graph.dot
//!
//! Set RUST_LOG=dotweave=trace for TRACE-level span enter/exit and events. Logs go to
//! stderr so rendered output on stdout stays clean.

use clap::{Parser, ValueEnum};
use dotweave::engine::{self, LayoutEngine, OutputFormat};
use dotweave::{DotGraph, InvokeOptions, ToDot, dot_io};
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// What to print instead of rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
  /// Readable canonical DOT.
  Dot,
  /// Whitespace-free canonical DOT.
  Compact,
  /// The parsed graph as JSON.
  Json,
}

/// Render a .dot file with a Graphviz layout engine.
#[derive(Parser, Debug)]
#[command(name = "render_dot")]
#[command(
  after_help = r#"Environment variables (override --engine and --timeout-secs when set):
  DOTWEAVE_ENGINE        Layout engine (dot, neato, twopi, circo, fdp, sfdp, osage, patchwork).
  DOTWEAVE_TIMEOUT_SECS  Kill the engine if it runs longer than this many seconds.

Examples:
  render_dot graph.dot > graph.svg
  render_dot --engine neato --format png --output graph.png graph.dot
  render_dot --emit compact graph.dot"#
)]
struct Args {
  /// Layout engine. Overridden by DOTWEAVE_ENGINE if set.
  #[arg(long, value_name = "ENGINE", default_value = "dot")]
  engine: LayoutEngine,

  /// Output format passed to the engine as -T<FORMAT>.
  #[arg(long, value_name = "FORMAT", default_value = "svg")]
  format: OutputFormat,

  /// Write rendered output here instead of stdout.
  #[arg(long, short, value_name = "PATH")]
  output: Option<PathBuf>,

  /// Print the parsed graph in this form instead of running an engine.
  #[arg(long, value_enum)]
  emit: Option<Emit>,

  /// Kill the engine after this many seconds. Overridden by DOTWEAVE_TIMEOUT_SECS if set.
  #[arg(long, value_name = "SECS")]
  timeout_secs: Option<u64>,

  /// Only report whether the engine is installed.
  #[arg(long)]
  check: bool,

  /// Path to the .dot file
  #[arg(value_name = "path-to-dot-file", required_unless_present = "check")]
  dot_path: Option<PathBuf>,
}

fn fail(message: impl std::fmt::Display) -> ! {
  eprintln!("Error: {}", message);
  process::exit(1);
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .init();

  let args = Args::parse();

  // Env vars override flags.
  let engine = match env::var("DOTWEAVE_ENGINE") {
    Ok(v) => v
      .parse::<LayoutEngine>()
      .unwrap_or_else(|e| fail(format!("DOTWEAVE_ENGINE: {}", e))),
    Err(_) => args.engine,
  };
  let timeout_secs = match env::var("DOTWEAVE_TIMEOUT_SECS") {
    Ok(v) => Some(
      v.trim()
        .parse::<u64>()
        .unwrap_or_else(|e| fail(format!("DOTWEAVE_TIMEOUT_SECS: {}", e))),
    ),
    Err(_) => args.timeout_secs,
  };
  let mut options = InvokeOptions::new();
  if let Some(secs) = timeout_secs {
    options = options.with_timeout(Duration::from_secs(secs));
  }
  info!(%engine, format = %args.format, timeout = ?options.timeout, "options (env or flags)");

  if args.check {
    let installed = engine::is_engine_installed(engine).await;
    println!(
      "{}: {}",
      engine,
      if installed { "installed" } else { "not found" }
    );
    process::exit(if installed { 0 } else { 1 });
  }

  let Some(path) = args.dot_path.as_deref() else {
    fail("missing path-to-dot-file");
  };
  let graph: DotGraph<String> = dot_io::read_dot_file(path)
    .unwrap_or_else(|e| fail(format!("reading {}: {}", path.display(), e)));
  info!(
    nodes = graph.node_count(),
    edges = graph.edge_count(),
    "parsed graph"
  );

  match args.emit {
    Some(Emit::Dot) => print!("{}", graph.to_dot()),
    Some(Emit::Compact) => println!("{}", graph.to_compact_dot()),
    Some(Emit::Json) => {
      let json = serde_json::to_string_pretty(&graph).unwrap_or_else(|e| fail(e));
      println!("{}", json);
    }
    None => match &args.output {
      Some(out) => {
        engine::render_to_file(engine, args.format, &graph, out, &options)
          .await
          .unwrap_or_else(|e| fail(e));
      }
      None => {
        let bytes = engine::render(engine, args.format, &graph, &options)
          .await
          .unwrap_or_else(|e| fail(e));
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(&bytes).and_then(|_| stdout.flush()) {
          fail(e);
        }
      }
    },
  }
}
