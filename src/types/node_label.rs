//! Conversion between caller node identifiers and DOT ID text.

use super::GraphId;

/// A type usable as a node identifier in a [`DotGraph`](super::DotGraph).
///
/// `to_dot_id` yields the unquoted ID text; the writer adds quoting as needed.
/// `from_dot_id` is the inverse and returns `None` for text the type cannot hold,
/// which the parser reports as malformed input.
pub trait NodeLabel: Clone + PartialEq + std::fmt::Debug {
  fn to_dot_id(&self) -> String;
  fn from_dot_id(raw: &str) -> Option<Self>;
}

impl NodeLabel for String {
  fn to_dot_id(&self) -> String {
    self.clone()
  }
  fn from_dot_id(raw: &str) -> Option<Self> {
    Some(raw.to_string())
  }
}

impl NodeLabel for GraphId {
  fn to_dot_id(&self) -> String {
    self.as_str().to_string()
  }
  fn from_dot_id(raw: &str) -> Option<Self> {
    Some(GraphId::from(raw))
  }
}

macro_rules! integer_node_label {
  ($($t:ty),*) => {
    $(
      impl NodeLabel for $t {
        fn to_dot_id(&self) -> String {
          self.to_string()
        }
        fn from_dot_id(raw: &str) -> Option<Self> {
          raw.parse().ok()
        }
      }
    )*
  };
}

integer_node_label!(i32, i64, u32, u64, usize);
