//! Name of a graph or cluster.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a graph or subgroup. Numeric ids keep their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphId(String);

impl GraphId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_string(self) -> String {
    self.0
  }
}

impl fmt::Display for GraphId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for GraphId {
  fn from(s: &str) -> Self {
    Self(s.to_string())
  }
}

impl From<String> for GraphId {
  fn from(s: String) -> Self {
    Self(s)
  }
}

impl From<i64> for GraphId {
  fn from(n: i64) -> Self {
    Self(n.to_string())
  }
}

impl From<u64> for GraphId {
  fn from(n: u64) -> Self {
    Self(n.to_string())
  }
}

impl From<usize> for GraphId {
  fn from(n: usize) -> Self {
    Self(n.to_string())
  }
}
