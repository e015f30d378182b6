//! An assembled graph value.

use serde::{Deserialize, Serialize};

use super::{GraphId, Statement};

/// Graph description: kind, optional name, and ordered statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotGraph<N> {
  /// Only set by the parser when the text says `strict`.
  pub strict: bool,
  pub directed: bool,
  pub id: Option<GraphId>,
  pub statements: Vec<Statement<N>>,
}

impl<N> DotGraph<N> {
  /// Number of node declarations, including those inside subgroups.
  pub fn node_count(&self) -> usize {
    count(&self.statements, &|s| matches!(s, Statement::NodeDecl { .. }))
  }

  /// Number of edge declarations, including those inside subgroups.
  pub fn edge_count(&self) -> usize {
    count(&self.statements, &|s| matches!(s, Statement::EdgeDecl { .. }))
  }

  /// Top-level subgroups in declaration order.
  pub fn subgroups(&self) -> Vec<(&GraphId, &[Statement<N>])> {
    self
      .statements
      .iter()
      .filter_map(|s| match s {
        Statement::Subgroup { id, statements } => Some((id, statements.as_slice())),
        _ => None,
      })
      .collect()
  }
}

fn count<N>(statements: &[Statement<N>], pred: &dyn Fn(&Statement<N>) -> bool) -> usize {
  statements
    .iter()
    .map(|s| match s {
      Statement::Subgroup { statements, .. } => count(statements, pred),
      other if pred(other) => 1,
      _ => 0,
    })
    .sum()
}
