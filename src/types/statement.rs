//! One unit of graph description content.

use serde::{Deserialize, Serialize};

use super::{Attribute, GraphId};

/// Which kind of entity a default attribute statement applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeScope {
  Graph,
  Node,
  Edge,
}

impl AttributeScope {
  /// DOT keyword introducing the default statement.
  pub fn keyword(self) -> &'static str {
    match self {
      AttributeScope::Graph => "graph",
      AttributeScope::Node => "node",
      AttributeScope::Edge => "edge",
    }
  }
}

/// A statement inside a graph or subgroup body. Order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement<N> {
  /// `graph [..]`, `node [..]` or `edge [..]`: defaults for later entities in the same scope.
  GlobalAttributeDefault {
    scope: AttributeScope,
    attributes: Vec<Attribute>,
  },
  /// A named cluster with its own ordered statements.
  Subgroup {
    id: GraphId,
    statements: Vec<Statement<N>>,
  },
  NodeDecl {
    label: N,
    attributes: Vec<Attribute>,
  },
  /// Edge between two nodes; the owning graph decides whether it is directed.
  EdgeDecl {
    from: N,
    to: N,
    attributes: Vec<Attribute>,
  },
}

impl<N> Statement<N> {
  pub fn is_subgroup(&self) -> bool {
    matches!(self, Statement::Subgroup { .. })
  }
}
