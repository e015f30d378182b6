//! DOT parser producing [`DotGraph`] values.
//!
//! Accepts everything [`crate::dot_writer`] emits plus the common hand-written forms:
//! comments, optional `;`, `strict`, top-level `key=value`, edge chains, repeated
//! attribute brackets, `+` concatenation of quoted strings, and HTML strings.
//! Non-cluster subgraphs, anonymous blocks and ports are rejected.

use crate::dot_writer::CLUSTER_PREFIX;
use crate::error::DotError;
use crate::types::{
  Attribute, AttributeScope, AttributeValue, DotGraph, GraphId, HtmlLabel, NodeLabel, Statement,
};
use std::str::FromStr;

/// Deepest subgraph nesting accepted; deeper input is rejected rather than recursed into.
pub const MAX_NESTING: usize = 256;

/// Parse a DOT source string into a DotGraph.
pub fn parse_dot<N: NodeLabel>(source: &str) -> Result<DotGraph<N>, DotError> {
  parse_graph(source).map_err(|e| e.into_error(source))
}

impl<N: NodeLabel> FromStr for DotGraph<N> {
  type Err = DotError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    parse_dot(s)
  }
}

/// Failure at a position; `at` is the unconsumed suffix of the source.
#[derive(Debug)]
pub(crate) struct ParseFail<'a> {
  message: String,
  at: &'a str,
}

impl ParseFail<'_> {
  fn into_error(self, source: &str) -> DotError {
    let offset = source.len().saturating_sub(self.at.len());
    let consumed = &source[..offset];
    let line = consumed.matches('\n').count() + 1;
    let column = consumed.rsplit('\n').next().unwrap_or("").chars().count() + 1;
    DotError::MalformedInput {
      message: self.message,
      line,
      column,
    }
  }
}

type Parsed<'a, T> = Result<(T, &'a str), ParseFail<'a>>;

fn fail<T>(message: impl Into<String>, at: &str) -> Result<T, ParseFail<'_>> {
  Err(ParseFail {
    message: message.into(),
    at,
  })
}

/// A DOT ID as written: bare (identifier or numeral), quoted, or HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Id {
  Bare(String),
  Quoted(String),
  Html(String),
}

impl Id {
  pub(crate) fn text(&self) -> &str {
    match self {
      Id::Bare(s) | Id::Quoted(s) | Id::Html(s) => s,
    }
  }

  fn into_text(self) -> String {
    match self {
      Id::Bare(s) | Id::Quoted(s) | Id::Html(s) => s,
    }
  }

  fn into_value(self) -> AttributeValue {
    match self {
      Id::Html(s) => AttributeValue::Html(HtmlLabel::new(s)),
      Id::Bare(s) | Id::Quoted(s) => AttributeValue::Text(s),
    }
  }

  /// Keywords are case-insensitive and only count when unquoted.
  pub(crate) fn is_keyword(&self, keyword: &str) -> bool {
    matches!(self, Id::Bare(s) if s.eq_ignore_ascii_case(keyword))
  }
}

/// Skips ASCII whitespace, `//` and `/* */` comments, and `#` preprocessor lines.
///
/// Non-ASCII characters are identifier characters in DOT, so Unicode spaces are not
/// trivia.
pub(crate) fn skip_trivia(mut s: &str) -> &str {
  loop {
    s = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let line_comment = s.strip_prefix("//").or(s.strip_prefix('#'));
    if let Some(rest) = line_comment {
      s = rest.find('\n').map(|i| &rest[i..]).unwrap_or("");
    } else if let Some(rest) = s.strip_prefix("/*") {
      s = rest.find("*/").map(|i| &rest[i + 2..]).unwrap_or("");
    } else {
      return s;
    }
  }
}

fn is_id_start(c: char) -> bool {
  c == '_' || c.is_ascii_alphabetic() || !c.is_ascii()
}

fn is_id_continue(c: char) -> bool {
  is_id_start(c) || c.is_ascii_digit()
}

/// Parses a bare identifier and returns it plus the remaining string.
pub(crate) fn parse_identifier(s: &str) -> Option<(&str, &str)> {
  let first = s.chars().next()?;
  if !is_id_start(first) {
    return None;
  }
  let end = s.find(|c: char| !is_id_continue(c)).unwrap_or(s.len());
  Some((&s[..end], &s[end..]))
}

/// Parses a numeral `-?(.[0-9]+|[0-9]+(.[0-9]*)?)` and returns it plus the remainder.
pub(crate) fn parse_number(s: &str) -> Option<(&str, &str)> {
  let bytes = s.as_bytes();
  let mut end = 0;
  if bytes.first() == Some(&b'-') {
    end += 1;
  }
  let int_start = end;
  while end < bytes.len() && bytes[end].is_ascii_digit() {
    end += 1;
  }
  let int_digits = end - int_start;
  if end < bytes.len() && bytes[end] == b'.' {
    let frac_start = end + 1;
    let mut frac_end = frac_start;
    while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
      frac_end += 1;
    }
    if int_digits > 0 || frac_end > frac_start {
      end = frac_end;
    }
  }
  if int_digits == 0 && !s[int_start..end].starts_with('.') {
    return None;
  }
  Some((&s[..end], &s[end..]))
}

/// Parses a double-quoted string (with `+` concatenation) and returns the unescaped text.
///
/// `\"`, `\\` and `\n` are unescaped, backslash-newline is a line continuation, and any
/// other backslash is kept as written.
pub(crate) fn parse_quoted(s: &str) -> Parsed<'_, String> {
  let (mut text, mut rest) = parse_quoted_segment(s)?;
  loop {
    let after = skip_trivia(rest);
    let Some(next) = after.strip_prefix('+') else {
      return Ok((text, rest));
    };
    let next = skip_trivia(next);
    if !next.starts_with('"') {
      return fail("expected quoted string after '+'", next);
    }
    let (more, r) = parse_quoted_segment(next)?;
    text.push_str(&more);
    rest = r;
  }
}

fn parse_quoted_segment(s: &str) -> Parsed<'_, String> {
  let Some(body) = s.strip_prefix('"') else {
    return fail("expected '\"'", s);
  };
  let mut out = String::new();
  let mut chars = body.char_indices();
  while let Some((i, c)) = chars.next() {
    match c {
      '"' => return Ok((out, &body[i + 1..])),
      '\\' => match chars.next() {
        Some((_, '"')) => out.push('"'),
        Some((_, '\\')) => out.push('\\'),
        Some((_, 'n')) => out.push('\n'),
        Some((_, '\n')) => {}
        Some((_, other)) => {
          out.push('\\');
          out.push(other);
        }
        None => break,
      },
      c => out.push(c),
    }
  }
  fail("unterminated quoted string", s)
}

/// Parses an HTML string `<...>` with balanced angle brackets; returns the inner markup.
pub(crate) fn parse_html(s: &str) -> Parsed<'_, String> {
  let mut depth = 0usize;
  for (i, c) in s.char_indices() {
    match c {
      '<' => depth += 1,
      '>' => {
        depth = depth.saturating_sub(1);
        if depth == 0 {
          return Ok((s[1..i].to_string(), &s[i + 1..]));
        }
      }
      _ => {}
    }
  }
  fail("unterminated HTML string", s)
}

/// Parses any ID form and returns it plus the remaining string.
pub(crate) fn parse_id(s: &str) -> Parsed<'_, Id> {
  let s = skip_trivia(s);
  match s.chars().next() {
    Some('"') => parse_quoted(s).map(|(t, rest)| (Id::Quoted(t), rest)),
    Some('<') => parse_html(s).map(|(t, rest)| (Id::Html(t), rest)),
    Some(_) => {
      if let Some((num, rest)) = parse_number(s) {
        return Ok((Id::Bare(num.to_string()), rest));
      }
      match parse_identifier(s) {
        Some((id, rest)) => Ok((Id::Bare(id.to_string()), rest)),
        None => fail("expected identifier", s),
      }
    }
    None => fail("expected identifier, found end of input", s),
  }
}

fn expect(s: &str, c: char) -> Result<&str, ParseFail<'_>> {
  let s = skip_trivia(s);
  match s.strip_prefix(c) {
    Some(rest) => Ok(rest),
    None => fail(format!("expected '{}'", c), s),
  }
}

fn node_label<'a, N: NodeLabel>(id: &Id, at: &'a str) -> Result<N, ParseFail<'a>> {
  match N::from_dot_id(id.text()) {
    Some(label) => Ok(label),
    None => fail(format!("invalid node label '{}'", id.text()), at),
  }
}

fn parse_graph<N: NodeLabel>(source: &str) -> Result<DotGraph<N>, ParseFail<'_>> {
  let start = skip_trivia(source);
  let (mut kind, mut rest) = parse_id(start)?;
  let mut strict = false;
  if kind.is_keyword("strict") {
    strict = true;
    let (k, r) = parse_id(rest)?;
    kind = k;
    rest = r;
  }
  let directed = if kind.is_keyword("digraph") {
    true
  } else if kind.is_keyword("graph") {
    false
  } else {
    return fail("expected 'graph' or 'digraph'", start);
  };

  let rest = skip_trivia(rest);
  let (id, rest) = if rest.starts_with('{') {
    (None, rest)
  } else {
    let (id, rest) = parse_id(rest)?;
    (Some(GraphId::from(id.into_text())), rest)
  };

  let rest = expect(rest, '{')?;
  let (statements, rest) = parse_statement_list(rest, directed, 0)?;
  let rest = expect(rest, '}')?;
  let rest = skip_trivia(rest);
  if !rest.is_empty() {
    return fail("unexpected content after closing '}'", rest);
  }

  Ok(DotGraph {
    strict,
    directed,
    id,
    statements,
  })
}

/// Parses statements up to (not including) the closing `}`. `depth` counts the
/// enclosing subgraphs.
fn parse_statement_list<N: NodeLabel>(
  s: &str,
  directed: bool,
  depth: usize,
) -> Parsed<'_, Vec<Statement<N>>> {
  let mut statements = Vec::new();
  let mut remaining = skip_trivia(s);
  loop {
    if remaining.starts_with('}') {
      return Ok((statements, remaining));
    }
    if remaining.is_empty() {
      return fail("expected '}'", remaining);
    }
    remaining = parse_statement(remaining, directed, depth, &mut statements)?;
    remaining = skip_trivia(remaining);
    if let Some(rest) = remaining.strip_prefix(';') {
      remaining = skip_trivia(rest);
    }
  }
}

/// Parses a single statement and appends it (or, for edge chains, several) to `out`.
/// Returns the unconsumed remainder.
fn parse_statement<'a, N: NodeLabel>(
  s: &'a str,
  directed: bool,
  depth: usize,
  out: &mut Vec<Statement<N>>,
) -> Result<&'a str, ParseFail<'a>> {
  if s.starts_with('{') {
    return fail("anonymous subgraphs are not supported", s);
  }
  let (id, rest) = parse_id(s)?;

  for scope in [AttributeScope::Graph, AttributeScope::Node, AttributeScope::Edge] {
    if id.is_keyword(scope.keyword()) {
      let rest = skip_trivia(rest);
      if !rest.starts_with('[') {
        return fail(format!("expected '[' after '{}'", scope.keyword()), rest);
      }
      let (attributes, rest) = parse_attr_lists(rest)?;
      out.push(Statement::GlobalAttributeDefault { scope, attributes });
      return Ok(rest);
    }
  }
  if id.is_keyword("subgraph") {
    return parse_subgraph(s, rest, directed, depth, out);
  }
  if id.is_keyword("digraph") || id.is_keyword("strict") {
    return fail(format!("unexpected keyword '{}'", id.text()), s);
  }

  let rest = skip_trivia(rest);
  if let Some(value) = rest.strip_prefix('=') {
    let (value, rest) = parse_id(value)?;
    out.push(Statement::GlobalAttributeDefault {
      scope: AttributeScope::Graph,
      attributes: vec![Attribute {
        name: id.into_text(),
        value: value.into_value(),
      }],
    });
    return Ok(rest);
  }
  if rest.starts_with(':') {
    return fail("node ports are not supported", rest);
  }
  if rest.starts_with("->") || rest.starts_with("--") {
    return parse_edge_stmt(&id, s, rest, directed, out);
  }

  let label = node_label(&id, s)?;
  let (attributes, rest) = if rest.starts_with('[') {
    parse_attr_lists(rest)?
  } else {
    (Vec::new(), rest)
  };
  out.push(Statement::NodeDecl { label, attributes });
  Ok(rest)
}

/// Parses `subgraph cluster_<id> { ... }` (after the keyword, which starts at `keyword_at`).
fn parse_subgraph<'a, N: NodeLabel>(
  keyword_at: &'a str,
  s: &'a str,
  directed: bool,
  depth: usize,
  out: &mut Vec<Statement<N>>,
) -> Result<&'a str, ParseFail<'a>> {
  if depth >= MAX_NESTING {
    return fail(
      format!("subgraphs nested deeper than {} levels", MAX_NESTING),
      keyword_at,
    );
  }
  let s = skip_trivia(s);
  if s.starts_with('{') {
    return fail("anonymous subgraphs are not supported", s);
  }
  let (name, rest) = parse_id(s)?;
  let Some(id) = name.text().strip_prefix(CLUSTER_PREFIX) else {
    return fail(
      format!(
        "subgraph '{}' is not a cluster (name must start with '{}')",
        name.text(),
        CLUSTER_PREFIX
      ),
      s,
    );
  };
  let id = GraphId::from(id);
  let rest = expect(rest, '{')?;
  let (statements, rest) = parse_statement_list(rest, directed, depth + 1)?;
  let rest = expect(rest, '}')?;
  out.push(Statement::Subgroup { id, statements });
  Ok(rest)
}

/// Parses an edge statement `from -> to [-> ...] [attrs]` and adds one edge per hop.
fn parse_edge_stmt<'a, N: NodeLabel>(
  from: &Id,
  from_at: &'a str,
  mut s: &'a str,
  directed: bool,
  out: &mut Vec<Statement<N>>,
) -> Result<&'a str, ParseFail<'a>> {
  let expected = if directed { "->" } else { "--" };
  let mut labels: Vec<N> = vec![node_label(from, from_at)?];
  loop {
    s = skip_trivia(s);
    let op = if s.starts_with("->") {
      "->"
    } else if s.starts_with("--") {
      "--"
    } else {
      break;
    };
    if op != expected {
      let kind = if directed { "directed" } else { "undirected" };
      return fail(format!("edge operator '{}' in {} graph", op, kind), s);
    }
    let target_at = skip_trivia(&s[op.len()..]);
    if target_at.starts_with('{') {
      return fail("subgraph edge operands are not supported", target_at);
    }
    let (to, rest) = parse_id(target_at)?;
    if to.is_keyword("subgraph") {
      return fail("subgraph edge operands are not supported", target_at);
    }
    labels.push(node_label(&to, target_at)?);
    s = skip_trivia(rest);
    if s.starts_with(':') {
      return fail("node ports are not supported", s);
    }
  }

  let (attributes, s) = if s.starts_with('[') {
    parse_attr_lists(s)?
  } else {
    (Vec::new(), s)
  };
  for pair in labels.windows(2) {
    out.push(Statement::EdgeDecl {
      from: pair[0].clone(),
      to: pair[1].clone(),
      attributes: attributes.clone(),
    });
  }
  Ok(s)
}

/// Parses one or more consecutive `[...]` blocks into a single attribute list.
fn parse_attr_lists(s: &str) -> Parsed<'_, Vec<Attribute>> {
  let mut attributes = Vec::new();
  let mut remaining = skip_trivia(s);
  while remaining.starts_with('[') {
    let (mut attrs, rest) = parse_attr_block(remaining)?;
    attributes.append(&mut attrs);
    remaining = skip_trivia(rest);
  }
  Ok((attributes, remaining))
}

/// Parses `[key=value, ...]` and returns the attributes plus the remainder.
fn parse_attr_block(s: &str) -> Parsed<'_, Vec<Attribute>> {
  let Some(body) = s.strip_prefix('[') else {
    return fail("expected '['", s);
  };
  let mut attrs = Vec::new();
  let mut remaining = skip_trivia(body);
  while !remaining.starts_with(']') {
    if remaining.is_empty() {
      return fail("unclosed attribute list", s);
    }
    let (key, rest) = parse_id(remaining)?;
    let rest = skip_trivia(rest);
    let Some(rest) = rest.strip_prefix('=') else {
      return fail(format!("expected '=' after attribute '{}'", key.text()), rest);
    };
    let (value, rest) = parse_id(rest)?;
    attrs.push(Attribute {
      name: key.into_text(),
      value: value.into_value(),
    });
    remaining = skip_trivia(rest);
    let separator = remaining.strip_prefix(',').or(remaining.strip_prefix(';'));
    if let Some(rest) = separator {
      remaining = skip_trivia(rest);
    }
  }
  Ok((attrs, &remaining[1..]))
}
