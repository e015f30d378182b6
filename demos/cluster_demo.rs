//! Build a clustered graph, print its DOT, and render it with Graphviz if available.

use dotweave::engine::{self, LayoutEngine, OutputFormat};
use dotweave::{
  BuilderRun, DotGraph, InvokeOptions, ToDot, arrow, attr, cluster, digraph, edge, graph_attrs,
  node, node_attrs, node_plain,
};
use std::time::Duration;

fn stage(name: &str, steps: &[&str]) -> BuilderRun<String> {
  let nodes: BuilderRun<String> = steps.iter().map(|s| node_plain(*s)).collect();
  let chain: BuilderRun<String> = steps.windows(2).map(|w| arrow(w[0], w[1])).collect();
  cluster(
    name,
    graph_attrs(vec![attr("label", name)]).then(nodes).then(chain),
  )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  let g: DotGraph<String> = digraph(
    "Pipeline",
    graph_attrs(vec![attr("rankdir", "LR")])
      .then(node_attrs(vec![attr("shape", "box")]))
      .then(node("start", vec![attr("shape", "Mdiamond")]))
      .then(stage("build", &["fetch", "compile", "link"]))
      .then(stage("test", &["unit", "integration"]))
      .then(node("exit", vec![attr("shape", "Msquare")]))
      .then(arrow("start", "fetch"))
      .then(edge("link", "unit", vec![attr("label", "artifacts")]))
      .then(arrow("integration", "exit")),
  );

  println!("{}", g.to_dot());

  if !engine::is_engine_installed(LayoutEngine::Dot).await {
    println!("Graphviz `dot` not found; skipping render.");
    return Ok(());
  }
  let options = InvokeOptions::new().with_timeout(Duration::from_secs(30));
  let svg = engine::render(LayoutEngine::Dot, OutputFormat::Svg, &g, &options).await?;
  println!("Rendered {} bytes of SVG.", svg.len());
  Ok(())
}
