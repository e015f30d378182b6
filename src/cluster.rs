//! Nested named subgroups.

use crate::builder::BuilderRun;
use crate::types::{GraphId, Statement};

/// Wraps the statements of `run` into one `Subgroup` statement named `id`.
///
/// The nested run's own value is dropped. Subgroups nested inside `run` stay nested,
/// so the structure mirrors the construction code. Identifiers are not checked for
/// uniqueness.
pub fn subgroup<N, A>(id: impl Into<GraphId>, run: BuilderRun<N, A>) -> Statement<N> {
  Statement::Subgroup {
    id: id.into(),
    statements: run.into_statements(),
  }
}

/// A run containing a single subgroup built from `run`.
pub fn cluster<N, A>(id: impl Into<GraphId>, run: BuilderRun<N, A>) -> BuilderRun<N, ()> {
  BuilderRun::statement(subgroup(id, run))
}
