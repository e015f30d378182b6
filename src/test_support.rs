//! proptest strategies shared by the unit tests.

use crate::types::{
  Attribute, AttributeScope, AttributeValue, DotGraph, GraphId, HtmlLabel, Statement,
};
use proptest::prelude::*;

/// ID text covering bare identifiers, numerals, keywords, escapes and arbitrary unicode.
pub(crate) fn arb_text() -> impl Strategy<Value = String> {
  prop_oneof![
    4 => "[A-Za-z_][A-Za-z0-9_]{0,6}",
    2 => "[0-9]{1,3}(\\.[0-9]{0,2})?",
    3 => any::<String>(),
    1 => prop::sample::select(vec![
      String::new(),
      "node".to_string(),
      "Subgraph".to_string(),
      "-1".to_string(),
      ".5".to_string(),
      "a\\lb".to_string(),
      "\\".to_string(),
      "\\n".to_string(),
      "say \"hi\"\n".to_string(),
      "// not a comment".to_string(),
      "\u{a0}x".to_string(),
    ]),
  ]
}

fn arb_value() -> impl Strategy<Value = AttributeValue> {
  prop_oneof![
    4 => arb_text().prop_map(AttributeValue::Text),
    1 => prop_oneof![
      "[a-z ]{0,6}|<b>[a-z]{0,4}</b>",
      "[a-z<> ]{0,8}",
      any::<String>(),
    ]
    .prop_map(|markup| AttributeValue::Html(HtmlLabel::new(markup))),
  ]
}

pub(crate) fn arb_attrs() -> impl Strategy<Value = Vec<Attribute>> {
  prop::collection::vec(
    (arb_text(), arb_value()).prop_map(|(name, value)| Attribute { name, value }),
    0..3,
  )
}

fn arb_scope() -> impl Strategy<Value = AttributeScope> {
  prop::sample::select(vec![
    AttributeScope::Graph,
    AttributeScope::Node,
    AttributeScope::Edge,
  ])
}

/// Statements nested up to three subgroups deep.
pub(crate) fn arb_statement() -> impl Strategy<Value = Statement<String>> {
  let leaf = prop_oneof![
    (arb_scope(), arb_attrs())
      .prop_map(|(scope, attributes)| Statement::GlobalAttributeDefault { scope, attributes }),
    (arb_text(), arb_attrs()).prop_map(|(label, attributes)| Statement::NodeDecl { label, attributes }),
    (arb_text(), arb_text(), arb_attrs()).prop_map(|(from, to, attributes)| Statement::EdgeDecl {
      from,
      to,
      attributes
    }),
  ];
  leaf.prop_recursive(3, 24, 4, |inner| {
    (arb_text(), prop::collection::vec(inner, 0..4)).prop_map(|(id, statements)| {
      Statement::Subgroup {
        id: GraphId::from(id),
        statements,
      }
    })
  })
}

pub(crate) fn arb_statements() -> impl Strategy<Value = Vec<Statement<String>>> {
  prop::collection::vec(arb_statement(), 0..6)
}

/// Graphs as the assembler produces them (never strict).
pub(crate) fn arb_graph() -> impl Strategy<Value = DotGraph<String>> {
  (any::<bool>(), prop::option::of(arb_text()), arb_statements()).prop_map(
    |(directed, id, statements)| DotGraph {
      strict: false,
      directed,
      id: id.map(GraphId::from),
      statements,
    },
  )
}
