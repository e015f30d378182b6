//! A single `name=value` attribute attached to a node, edge, or default statement.

use serde::{Deserialize, Serialize};

use super::HtmlLabel;

/// Payload of an attribute. The crate does not interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeValue {
  /// Plain text, written bare or quoted as the content requires.
  Text(String),
  /// HTML-like label, written between `<` and `>`.
  Html(HtmlLabel),
}

impl AttributeValue {
  pub fn as_str(&self) -> &str {
    match self {
      AttributeValue::Text(s) => s,
      AttributeValue::Html(markup) => markup.as_str(),
    }
  }

  pub fn is_html(&self) -> bool {
    matches!(self, AttributeValue::Html(_))
  }
}

impl From<&str> for AttributeValue {
  fn from(s: &str) -> Self {
    AttributeValue::Text(s.to_string())
  }
}

impl From<String> for AttributeValue {
  fn from(s: String) -> Self {
    AttributeValue::Text(s)
  }
}

/// A `name=value` pair. Attribute lists keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
  pub name: String,
  pub value: AttributeValue,
}

impl Attribute {
  pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
    Self {
      name: name.into(),
      value: value.into(),
    }
  }

  /// Attribute whose value is an HTML-like label (`label=<<b>x</b>>`).
  pub fn html(name: impl Into<String>, markup: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      value: AttributeValue::Html(HtmlLabel::new(markup)),
    }
  }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Attribute {
  fn from((name, value): (K, V)) -> Self {
    Attribute::new(name.into(), AttributeValue::Text(value.into()))
  }
}

/// Shorthand for [`Attribute::new`] with a text value.
pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Attribute {
  Attribute::new(name.into(), AttributeValue::Text(value.into()))
}
