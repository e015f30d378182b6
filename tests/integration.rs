//! Integration tests for the public API: build, write, parse, and pipe through a renderer.

use dotweave::engine::{self, LayoutEngine, OutputFormat};
use dotweave::invoke::{CollectBytes, invoke_bytes};
use dotweave::{
  BuilderRun, DotError, DotGraph, InvokeOptions, Statement, ToDot, arrow, attr, cluster, digraph,
  dot_io, edge_attrs, graph, invoke, invoke_text, line, node, node_plain, parse_dot,
};
use std::time::Duration;

fn layered(layers: usize, width: usize) -> DotGraph<String> {
  let run: BuilderRun<String> = (0..layers)
    .map(|l| {
      let nodes: BuilderRun<String> = (0..width)
        .map(|w| node_plain(format!("n{}_{}", l, w)))
        .collect();
      let edges: BuilderRun<String> = if l + 1 < layers {
        (0..width)
          .map(|w| arrow(format!("n{}_{}", l, w), format!("n{}_{}", l + 1, w)))
          .collect()
      } else {
        BuilderRun::empty()
      };
      cluster(l, nodes.then(edges))
    })
    .collect();
  digraph("layers", edge_attrs(vec![attr("color", "gray")]).then(run))
}

#[test]
fn layered_graph_counts_and_round_trip() {
  let g = layered(4, 3);
  assert_eq!(g.node_count(), 12);
  assert_eq!(g.edge_count(), 9);
  assert_eq!(g.subgroups().len(), 4);
  assert_eq!(g.subgroups()[2].0.as_str(), "2");
  assert_eq!(parse_dot::<String>(&g.to_dot()).unwrap(), g);
  assert_eq!(parse_dot::<String>(&g.to_compact_dot()).unwrap(), g);
}

#[test]
fn file_round_trip_through_dot_io() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("layers.dot");
  let g = layered(2, 2);
  dot_io::write_dot_file(&path, &g).unwrap();
  let back: DotGraph<String> = dot_io::read_dot_file(&path).unwrap();
  assert_eq!(back, g);
}

#[test]
fn undirected_graph_uses_line_operator() {
  let g: DotGraph<String> = graph("U", line("a", "b").then(node("c", vec![attr("label", "C")])));
  assert_eq!(g.to_compact_dot(), "graph U{a--b;c[label=C];}");
  assert!(matches!(&g.statements[0], Statement::EdgeDecl { .. }));
}

#[test]
fn json_dump_round_trips() {
  let g = layered(2, 1);
  let json = serde_json::to_string(&g).unwrap();
  let back: DotGraph<String> = serde_json::from_str(&json).unwrap();
  assert_eq!(back, g);
}

#[tokio::test]
async fn cat_renderer_returns_the_same_graph() {
  let g = layered(3, 2);
  let text = invoke_text("cat", &[] as &[&str], &g, &InvokeOptions::new())
    .await
    .unwrap();
  assert_eq!(text, g.to_compact_dot());
  assert_eq!(parse_dot::<String>(&text).unwrap(), g);
}

#[tokio::test]
async fn renderer_sees_arguments() {
  let g = layered(1, 1);
  let out = invoke(
    "sh",
    &["-c", "cat >/dev/null; printf '%s' \"$0\"", "-Tsvg"],
    &g,
    CollectBytes,
    &InvokeOptions::new(),
  )
  .await
  .unwrap();
  assert_eq!(&out[..], b"-Tsvg");
}

#[tokio::test]
async fn huge_stderr_before_reading_stdin_completes() {
  let options = InvokeOptions::new().with_timeout(Duration::from_secs(60));
  let out = invoke_bytes(
    "sh",
    &["-c", "head -c 3000000 /dev/zero >&2; cat"],
    vec![b'a'; 3_000_000],
    CollectBytes,
    &options,
  )
  .await
  .unwrap();
  assert_eq!(out.len(), 3_000_000);
}

#[tokio::test]
async fn nonexistent_command_is_unavailable() {
  let r = invoke_text(
    "/nonexistent/renderer",
    &[] as &[&str],
    &layered(1, 1),
    &InvokeOptions::new(),
  )
  .await;
  assert!(matches!(r, Err(DotError::ExternalToolUnavailable { .. })));
}

#[tokio::test]
async fn render_with_graphviz_when_installed() {
  let g = layered(2, 2);
  let options = InvokeOptions::new().with_timeout(Duration::from_secs(30));
  if !engine::is_engine_installed(LayoutEngine::Dot).await {
    let r = engine::render(LayoutEngine::Dot, OutputFormat::Svg, &g, &options).await;
    assert!(matches!(r, Err(DotError::ExternalToolUnavailable { .. })));
    return;
  }
  let svg = engine::render(LayoutEngine::Dot, OutputFormat::Svg, &g, &options)
    .await
    .unwrap();
  assert!(String::from_utf8_lossy(&svg).contains("<svg"));

  let canon = engine::canonicalize(LayoutEngine::Dot, &g, &options)
    .await
    .unwrap();
  assert!(canon.directed);
  assert_eq!(canon.subgroups().len(), 2);

  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("out").join("g.png");
  let written = engine::render_to_file(LayoutEngine::Dot, OutputFormat::Png, &g, &path, &options)
    .await
    .unwrap();
  assert!(written > 0);
  assert_eq!(std::fs::metadata(&path).unwrap().len(), written);
}
