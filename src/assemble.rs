//! Finalizes a builder run into a [`DotGraph`].

use crate::builder::BuilderRun;
use crate::types::{DotGraph, GraphId};

/// Builds the graph value. Never strict, so parallel edges are kept as written.
pub fn assemble<N, A>(directed: bool, id: Option<GraphId>, run: BuilderRun<N, A>) -> DotGraph<N> {
  DotGraph {
    strict: false,
    directed,
    id,
    statements: run.into_statements(),
  }
}

pub fn digraph<N, A>(id: impl Into<GraphId>, run: BuilderRun<N, A>) -> DotGraph<N> {
  assemble(true, Some(id.into()), run)
}

pub fn graph<N, A>(id: impl Into<GraphId>, run: BuilderRun<N, A>) -> DotGraph<N> {
  assemble(false, Some(id.into()), run)
}

pub fn digraph_unnamed<N, A>(run: BuilderRun<N, A>) -> DotGraph<N> {
  assemble(true, None, run)
}

pub fn graph_unnamed<N, A>(run: BuilderRun<N, A>) -> DotGraph<N> {
  assemble(false, None, run)
}
