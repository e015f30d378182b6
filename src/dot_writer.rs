//! Canonical DOT output for [`DotGraph`] values.
//!
//! Two layouts: a readable one (two-space indentation, one statement per line) and a
//! compact one with no optional whitespace, used when piping to a renderer. Both parse
//! back to an equal graph with [`crate::dot_parser::parse_dot`].

use crate::types::{Attribute, AttributeValue, DotGraph, NodeLabel, Statement};
use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix Graphviz uses to recognise a subgraph as a cluster.
pub const CLUSTER_PREFIX: &str = "cluster_";

const KEYWORDS: [&str; 6] = ["graph", "node", "edge", "digraph", "subgraph", "strict"];

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*$")
    .expect("identifier pattern is valid")
});

static NUMERAL: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^(\.[0-9]+|[0-9]+(\.[0-9]*)?)$").expect("numeral pattern is valid"));

/// Serializes a graph to DOT text.
pub trait ToDot {
  /// Readable DOT, one statement per line, ending with a newline.
  fn to_dot(&self) -> String;

  /// DOT without optional whitespace.
  fn to_compact_dot(&self) -> String;
}

impl<N: NodeLabel> ToDot for DotGraph<N> {
  fn to_dot(&self) -> String {
    let mut w = DotWriter::new(false);
    w.graph(self);
    w.out
  }

  fn to_compact_dot(&self) -> String {
    let mut w = DotWriter::new(true);
    w.graph(self);
    w.out
  }
}

/// Returns true if `s` can be written without quotes.
pub(crate) fn is_bare_id(s: &str) -> bool {
  if NUMERAL.is_match(s) {
    return true;
  }
  IDENTIFIER.is_match(s) && !KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(s))
}

/// Formats `s` as a DOT ID, quoting it when it is not a bare identifier or numeral.
pub fn format_id(s: &str) -> String {
  if is_bare_id(s) {
    s.to_string()
  } else {
    quote(s)
  }
}

/// Double-quotes `s`. A backslash is doubled only where the reader would otherwise
/// take it as an escape, so Graphviz escapes like `\l` survive untouched.
pub(crate) fn quote(s: &str) -> String {
  let mut out = String::with_capacity(s.len() + 2);
  out.push('"');
  let mut chars = s.chars().peekable();
  while let Some(c) = chars.next() {
    match c {
      '"' => out.push_str("\\\""),
      '\n' => out.push_str("\\n"),
      '\\' => match chars.peek() {
        None | Some('\\') | Some('"') | Some('n') | Some('\n') => out.push_str("\\\\"),
        Some(_) => out.push('\\'),
      },
      c => out.push(c),
    }
  }
  out.push('"');
  out
}

fn format_value(value: &AttributeValue) -> String {
  match value {
    AttributeValue::Text(s) => format_id(s),
    AttributeValue::Html(markup) => format!("<{}>", markup),
  }
}

struct DotWriter {
  out: String,
  compact: bool,
  depth: usize,
}

impl DotWriter {
  fn new(compact: bool) -> Self {
    Self {
      out: String::new(),
      compact,
      depth: 0,
    }
  }

  fn graph<N: NodeLabel>(&mut self, g: &DotGraph<N>) {
    if g.strict {
      self.out.push_str("strict ");
    }
    self
      .out
      .push_str(if g.directed { "digraph" } else { "graph" });
    if let Some(id) = &g.id {
      self.out.push(' ');
      self.out.push_str(&format_id(id.as_str()));
    }
    self.open_block();
    self.statements(&g.statements, g.directed);
    self.close_block();
    if !self.compact {
      self.out.push('\n');
    }
  }

  fn open_block(&mut self) {
    if self.compact {
      self.out.push('{');
    } else {
      self.out.push_str(" {\n");
    }
    self.depth += 1;
  }

  fn close_block(&mut self) {
    self.depth -= 1;
    self.indent();
    self.out.push('}');
  }

  fn indent(&mut self) {
    if !self.compact {
      for _ in 0..self.depth {
        self.out.push_str("  ");
      }
    }
  }

  fn end_statement(&mut self) {
    self.out.push(';');
    if !self.compact {
      self.out.push('\n');
    }
  }

  fn statements<N: NodeLabel>(&mut self, statements: &[Statement<N>], directed: bool) {
    for s in statements {
      self.indent();
      match s {
        Statement::GlobalAttributeDefault { scope, attributes } => {
          self.out.push_str(scope.keyword());
          if !self.compact {
            self.out.push(' ');
          }
          self.attribute_list(attributes);
          self.end_statement();
        }
        Statement::Subgroup { id, statements } => {
          self.out.push_str("subgraph ");
          self
            .out
            .push_str(&format_id(&format!("{}{}", CLUSTER_PREFIX, id.as_str())));
          self.open_block();
          self.statements(statements, directed);
          self.close_block();
          if !self.compact {
            self.out.push('\n');
          }
        }
        Statement::NodeDecl { label, attributes } => {
          self.out.push_str(&format_id(&label.to_dot_id()));
          self.trailing_attributes(attributes);
          self.end_statement();
        }
        Statement::EdgeDecl {
          from,
          to,
          attributes,
        } => {
          let op = if directed { "->" } else { "--" };
          self.out.push_str(&format_id(&from.to_dot_id()));
          if self.compact {
            self.out.push_str(op);
          } else {
            self.out.push(' ');
            self.out.push_str(op);
            self.out.push(' ');
          }
          self.out.push_str(&format_id(&to.to_dot_id()));
          self.trailing_attributes(attributes);
          self.end_statement();
        }
      }
    }
  }

  /// Attribute list after a node or edge; omitted entirely when empty.
  fn trailing_attributes(&mut self, attributes: &[Attribute]) {
    if attributes.is_empty() {
      return;
    }
    if !self.compact {
      self.out.push(' ');
    }
    self.attribute_list(attributes);
  }

  fn attribute_list(&mut self, attributes: &[Attribute]) {
    let sep = if self.compact { "," } else { ", " };
    self.out.push('[');
    for (i, a) in attributes.iter().enumerate() {
      if i > 0 {
        self.out.push_str(sep);
      }
      self.out.push_str(&format_id(&a.name));
      self.out.push('=');
      self.out.push_str(&format_value(&a.value));
    }
    self.out.push(']');
  }
}
