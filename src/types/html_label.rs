//! Markup carried by an HTML-like attribute value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTML-like label text, written between `<` and `>`.
///
/// The angle brackets in the markup are always balanced: a `>` with no open `<`, or a
/// `<` that is never closed, is stored as `&gt;` / `&lt;`. Balanced markup is kept
/// as given, so the value reads back unchanged from DOT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct HtmlLabel(String);

impl HtmlLabel {
  pub fn new(markup: impl Into<String>) -> Self {
    Self(balance(markup.into()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_string(self) -> String {
    self.0
  }
}

/// Escapes the brackets that do not pair up, leaving tag structure alone.
fn balance(markup: String) -> String {
  let mut open = Vec::new();
  let mut stray = Vec::new();
  for (i, c) in markup.char_indices() {
    match c {
      '<' => open.push(i),
      '>' if open.pop().is_none() => stray.push(i),
      _ => {}
    }
  }
  stray.extend(open);
  if stray.is_empty() {
    return markup;
  }
  stray.sort_unstable();

  let mut out = String::with_capacity(markup.len() + 3 * stray.len());
  let mut last = 0;
  for i in stray {
    out.push_str(&markup[last..i]);
    out.push_str(if markup.as_bytes()[i] == b'<' { "&lt;" } else { "&gt;" });
    last = i + 1;
  }
  out.push_str(&markup[last..]);
  out
}

impl fmt::Display for HtmlLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for HtmlLabel {
  fn from(s: &str) -> Self {
    Self::new(s)
  }
}

impl From<String> for HtmlLabel {
  fn from(s: String) -> Self {
    Self::new(s)
  }
}

impl From<HtmlLabel> for String {
  fn from(label: HtmlLabel) -> Self {
    label.0
  }
}
