//! Order-preserving statement accumulator.
//!
//! A [`BuilderRun`] pairs a result value with the statements produced while computing
//! it. Runs compose by concatenating statement sequences, so graph construction code is
//! a plain expression:
//!
//! ```
//! use dotweave::{attr, cluster, digraph, edge, node, node_plain};
//!
//! let g = digraph::<String, _>(
//!   "G",
//!   node("A", vec![attr("color", "red")])
//!     .then(node_plain("B"))
//!     .then(edge("A", "B", vec![]))
//!     .then(cluster("C0", node_plain("X"))),
//! );
//! assert_eq!(g.statements.len(), 4);
//! ```

use crate::types::{Attribute, AttributeScope, Statement};

/// Result value plus the ordered statements accumulated while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderRun<N, A = ()> {
  value: A,
  statements: Vec<Statement<N>>,
}

impl<N> BuilderRun<N, ()> {
  /// The run with no statements; identity for [`BuilderRun::then`].
  pub fn empty() -> Self {
    Self::pure(())
  }

  /// A run holding exactly one statement.
  pub fn statement(statement: Statement<N>) -> Self {
    Self {
      value: (),
      statements: vec![statement],
    }
  }
}

impl<N> Default for BuilderRun<N, ()> {
  fn default() -> Self {
    Self::empty()
  }
}

impl<N, A> BuilderRun<N, A> {
  /// A run carrying `value` and no statements.
  pub fn pure(value: A) -> Self {
    Self {
      value,
      statements: Vec::new(),
    }
  }

  /// Sequential composition: statements of `self` then `next`; keeps `next`'s value.
  pub fn then<B>(self, next: BuilderRun<N, B>) -> BuilderRun<N, B> {
    let mut statements = self.statements;
    statements.extend(next.statements);
    BuilderRun {
      value: next.value,
      statements,
    }
  }

  /// Feeds this run's value to `f` and appends the statements of the run it returns.
  pub fn and_then<B, F>(self, f: F) -> BuilderRun<N, B>
  where
    F: FnOnce(A) -> BuilderRun<N, B>,
  {
    let next = f(self.value);
    let mut statements = self.statements;
    statements.extend(next.statements);
    BuilderRun {
      value: next.value,
      statements,
    }
  }

  pub fn map<B, F>(self, f: F) -> BuilderRun<N, B>
  where
    F: FnOnce(A) -> B,
  {
    BuilderRun {
      value: f(self.value),
      statements: self.statements,
    }
  }

  pub fn value(&self) -> &A {
    &self.value
  }

  pub fn statements(&self) -> &[Statement<N>] {
    &self.statements
  }

  pub fn into_parts(self) -> (A, Vec<Statement<N>>) {
    (self.value, self.statements)
  }

  pub fn into_statements(self) -> Vec<Statement<N>> {
    self.statements
  }
}

/// Concatenates unit runs in iteration order.
impl<N> FromIterator<BuilderRun<N, ()>> for BuilderRun<N, ()> {
  fn from_iter<I: IntoIterator<Item = BuilderRun<N, ()>>>(iter: I) -> Self {
    let statements = iter.into_iter().flat_map(|run| run.statements).collect();
    BuilderRun {
      value: (),
      statements,
    }
  }
}

fn defaults<N>(scope: AttributeScope, attributes: Vec<Attribute>) -> BuilderRun<N, ()> {
  BuilderRun::statement(Statement::GlobalAttributeDefault { scope, attributes })
}

/// Default attributes for the enclosing graph or subgroup.
pub fn graph_attrs<N>(attributes: Vec<Attribute>) -> BuilderRun<N, ()> {
  defaults(AttributeScope::Graph, attributes)
}

/// Default attributes for nodes declared later in the same scope.
pub fn node_attrs<N>(attributes: Vec<Attribute>) -> BuilderRun<N, ()> {
  defaults(AttributeScope::Node, attributes)
}

/// Default attributes for edges declared later in the same scope.
pub fn edge_attrs<N>(attributes: Vec<Attribute>) -> BuilderRun<N, ()> {
  defaults(AttributeScope::Edge, attributes)
}

pub fn node<N>(label: impl Into<N>, attributes: Vec<Attribute>) -> BuilderRun<N, ()> {
  BuilderRun::statement(Statement::NodeDecl {
    label: label.into(),
    attributes,
  })
}

pub fn node_plain<N>(label: impl Into<N>) -> BuilderRun<N, ()> {
  node(label, Vec::new())
}

/// Edge from `from` to `to`. Whether it is drawn directed depends on the graph.
pub fn edge<N>(from: impl Into<N>, to: impl Into<N>, attributes: Vec<Attribute>) -> BuilderRun<N, ()> {
  BuilderRun::statement(Statement::EdgeDecl {
    from: from.into(),
    to: to.into(),
    attributes,
  })
}

/// Attribute-less edge, spelled for directed graphs. Same statement as [`line`].
pub fn arrow<N>(from: impl Into<N>, to: impl Into<N>) -> BuilderRun<N, ()> {
  edge(from, to, Vec::new())
}

/// Attribute-less edge, spelled for undirected graphs. Same statement as [`arrow`].
pub fn line<N>(from: impl Into<N>, to: impl Into<N>) -> BuilderRun<N, ()> {
  arrow(from, to)
}
