//! Tests for `dot_parser`.

use crate::dot_parser::{
  Id, MAX_NESTING, parse_dot, parse_html, parse_id, parse_identifier, parse_number, parse_quoted, skip_trivia,
};
use crate::error::DotError;
use crate::types::{
  Attribute, AttributeScope, AttributeValue, DotGraph, GraphId, HtmlLabel, Statement, attr,
};

fn parse(dot: &str) -> DotGraph<String> {
  parse_dot(dot).unwrap()
}

fn node_decl(label: &str, attributes: Vec<Attribute>) -> Statement<String> {
  Statement::NodeDecl {
    label: label.to_string(),
    attributes,
  }
}

fn edge_decl(from: &str, to: &str, attributes: Vec<Attribute>) -> Statement<String> {
  Statement::EdgeDecl {
    from: from.to_string(),
    to: to.to_string(),
    attributes,
  }
}

fn malformed_at(dot: &str) -> (String, usize, usize) {
  match parse_dot::<String>(dot) {
    Err(DotError::MalformedInput {
      message,
      line,
      column,
    }) => (message, line, column),
    other => panic!("expected MalformedInput, got {:?}", other),
  }
}

#[test]
fn parse_minimal_digraph() {
  let g = parse("digraph G { a -> b }");
  assert!(g.directed);
  assert!(!g.strict);
  assert_eq!(g.id, Some(GraphId::from("G")));
  assert_eq!(g.statements, vec![edge_decl("a", "b", vec![])]);
}

#[test]
fn parse_unnamed_strict_graph() {
  let g = parse("strict graph { a -- b; b -- c }");
  assert!(g.strict);
  assert!(!g.directed);
  assert_eq!(g.id, None);
  assert_eq!(g.edge_count(), 2);
}

#[test]
fn keywords_are_case_insensitive() {
  let g = parse("DiGraph G { Node [shape=box] a }");
  assert!(g.directed);
  assert!(matches!(
    &g.statements[0],
    Statement::GlobalAttributeDefault {
      scope: AttributeScope::Node,
      ..
    }
  ));
}

#[test]
fn parse_comments_and_preprocessor_lines() {
  let dot = r#"
    # generated
    digraph G {
      // line comment
      a /* inline */ -> b; /* block
      spanning lines */
      c
    }
  "#;
  let g = parse(dot);
  assert_eq!(
    g.statements,
    vec![edge_decl("a", "b", vec![]), node_decl("c", vec![])]
  );
}

#[test]
fn parse_defaults_and_top_level_assignment() {
  let dot = r#"
    digraph G {
      rankdir=LR;
      graph [label="top"]
      edge [color=gray]
    }
  "#;
  let g = parse(dot);
  assert_eq!(
    g.statements,
    vec![
      Statement::GlobalAttributeDefault {
        scope: AttributeScope::Graph,
        attributes: vec![attr("rankdir", "LR")],
      },
      Statement::GlobalAttributeDefault {
        scope: AttributeScope::Graph,
        attributes: vec![attr("label", "top")],
      },
      Statement::GlobalAttributeDefault {
        scope: AttributeScope::Edge,
        attributes: vec![attr("color", "gray")],
      },
    ]
  );
}

#[test]
fn edge_chain_expands_and_shares_attributes() {
  let g = parse("digraph { a -> b -> c [label=x] }");
  assert_eq!(
    g.statements,
    vec![
      edge_decl("a", "b", vec![attr("label", "x")]),
      edge_decl("b", "c", vec![attr("label", "x")]),
    ]
  );
}

#[test]
fn repeated_brackets_and_separators_merge() {
  let g = parse("digraph { n [a=1; b=2] [c=3 d=4,] }");
  assert_eq!(
    g.statements,
    vec![node_decl(
      "n",
      vec![attr("a", "1"), attr("b", "2"), attr("c", "3"), attr("d", "4")]
    )]
  );
}

#[test]
fn quoted_strings_unescape_and_concatenate() {
  let g = parse(r#"digraph { "a b" [label="say \"hi\"\nnow" + " and" + "\
 then", xlabel="left\l"] }"#);
  assert_eq!(
    g.statements,
    vec![node_decl(
      "a b",
      vec![
        attr("label", "say \"hi\"\nnow and then"),
        attr("xlabel", r"left\l"),
      ]
    )]
  );
}

#[test]
fn html_values_keep_inner_markup() {
  let g = parse("digraph { n [label=<<table><tr><td>x</td></tr></table>>] }");
  let Statement::NodeDecl { attributes, .. } = &g.statements[0] else {
    panic!("expected node");
  };
  assert_eq!(
    attributes[0].value,
    AttributeValue::Html(HtmlLabel::new("<table><tr><td>x</td></tr></table>"))
  );
}

#[test]
fn cluster_prefix_is_stripped_recursively() {
  let g = parse(
    r#"digraph G {
      subgraph cluster_outer {
        label="Outer";
        subgraph "cluster_in ner" { x }
      }
    }"#,
  );
  let expected = vec![Statement::Subgroup {
    id: GraphId::from("outer"),
    statements: vec![
      Statement::GlobalAttributeDefault {
        scope: AttributeScope::Graph,
        attributes: vec![attr("label", "Outer")],
      },
      Statement::Subgroup {
        id: GraphId::from("in ner"),
        statements: vec![node_decl("x", vec![])],
      },
    ],
  }];
  assert_eq!(g.statements, expected);
}

#[test]
fn numeric_labels_parse_into_integer_types() {
  let g: DotGraph<i64> = parse_dot(r#"graph { 1 -- 2; "-3" -- -4 }"#).unwrap();
  assert_eq!(
    g.statements,
    vec![
      Statement::EdgeDecl {
        from: 1,
        to: 2,
        attributes: vec![]
      },
      Statement::EdgeDecl {
        from: -3,
        to: -4,
        attributes: vec![]
      },
    ]
  );
  let message = match parse_dot::<u32>("digraph { x }") {
    Err(DotError::MalformedInput { message, .. }) => message,
    other => panic!("expected MalformedInput, got {:?}", other),
  };
  assert!(message.contains("invalid node label 'x'"), "{message}");
}

#[test]
fn from_str_parses() {
  let g: DotGraph<String> = "digraph { a }".parse().unwrap();
  assert_eq!(g.node_count(), 1);
}

#[test]
fn error_reports_line_and_column() {
  let (message, line, column) = malformed_at("digraph G {\n  a -> ;\n}");
  assert!(message.contains("expected identifier"), "{message}");
  assert_eq!((line, column), (2, 8));
}

#[test]
fn rejects_wrong_edge_operator() {
  let (message, line, column) = malformed_at("graph { a -> b }");
  assert!(message.contains("'->' in undirected graph"), "{message}");
  assert_eq!((line, column), (1, 11));
  let (message, _, _) = malformed_at("digraph { a -- b }");
  assert!(message.contains("'--' in directed graph"), "{message}");
}

#[test]
fn rejects_non_cluster_and_anonymous_subgraphs() {
  let (message, _, _) = malformed_at("digraph { subgraph sub { a } }");
  assert!(message.contains("not a cluster"), "{message}");
  let (message, _, _) = malformed_at("digraph { subgraph { a } }");
  assert!(message.contains("anonymous"), "{message}");
  let (message, _, _) = malformed_at("digraph { { a } }");
  assert!(message.contains("anonymous"), "{message}");
  let (message, _, _) = malformed_at("digraph { a -> subgraph cluster_x { b } }");
  assert!(message.contains("subgraph edge operands"), "{message}");
}

#[test]
fn rejects_ports_and_trailing_content() {
  let (message, _, _) = malformed_at("digraph { a:n -> b }");
  assert!(message.contains("ports"), "{message}");
  let (message, _, _) = malformed_at("digraph { a } extra");
  assert!(message.contains("after closing"), "{message}");
}

#[test]
fn rejects_truncated_input() {
  assert!(matches!(
    parse_dot::<String>("digraph G { a [label=\"x"),
    Err(DotError::MalformedInput { .. })
  ));
  assert!(matches!(
    parse_dot::<String>("digraph G { a [color=red"),
    Err(DotError::MalformedInput { .. })
  ));
  assert!(matches!(
    parse_dot::<String>("digraph G { a"),
    Err(DotError::MalformedInput { .. })
  ));
  let (message, line, column) = malformed_at("");
  assert!(message.contains("end of input"), "{message}");
  assert_eq!((line, column), (1, 1));
  let (message, _, _) = malformed_at("node { }");
  assert!(message.contains("'graph' or 'digraph'"), "{message}");
}

#[test]
fn lexer_pieces() {
  assert_eq!(skip_trivia("  // c\n /* d */ x"), "x");
  assert_eq!(skip_trivia("\u{a0}x"), "\u{a0}x");
  assert_eq!(parse_identifier("abc_1 rest"), Some(("abc_1", " rest")));
  assert_eq!(parse_identifier("1abc"), None);
  assert_eq!(parse_number("-1.5;"), Some(("-1.5", ";")));
  assert_eq!(parse_number(".5]"), Some((".5", "]")));
  assert_eq!(parse_number("7."), Some(("7.", "")));
  assert_eq!(parse_number("."), None);
  assert_eq!(parse_number("-x"), None);
  let (text, rest) = parse_quoted(r#""a\\b" + "c" ;"#).unwrap();
  assert_eq!(text, r"a\bc");
  assert_eq!(rest, " ;");
  let (html, rest) = parse_html("<<i>x</i>>,").unwrap();
  assert_eq!(html, "<i>x</i>");
  assert_eq!(rest, ",");
  let (id, _) = parse_id("\"node\"").unwrap();
  assert_eq!(id, Id::Quoted("node".to_string()));
  assert!(!id.is_keyword("node"));
  let (id, _) = parse_id("NODE").unwrap();
  assert!(id.is_keyword("node"));
}

fn nested_clusters(levels: usize) -> String {
  let mut dot = String::from("digraph G{");
  for _ in 0..levels {
    dot.push_str("subgraph cluster_a{");
  }
  dot.push('x');
  dot.push_str(&"}".repeat(levels + 1));
  dot
}

fn subgroup_depth(statements: &[Statement<String>]) -> usize {
  let mut depth = 0;
  let mut level = statements;
  while let Some(Statement::Subgroup { statements, .. }) = level.first() {
    depth += 1;
    level = statements;
  }
  depth
}

#[test]
fn nesting_up_to_the_limit_parses() {
  let g = parse(&nested_clusters(MAX_NESTING));
  assert_eq!(subgroup_depth(&g.statements), MAX_NESTING);
  assert_eq!(g.node_count(), 1);
}

#[test]
fn nesting_past_the_limit_is_malformed() {
  let (message, line, column) = malformed_at(&nested_clusters(MAX_NESTING + 1));
  assert!(message.contains("nested deeper than 256"), "{message}");
  let column_of_last = "digraph G{".len() + MAX_NESTING * "subgraph cluster_a{".len() + 1;
  assert_eq!((line, column), (1, column_of_last));
}

#[test]
fn hostile_nesting_fails_without_exhausting_the_stack() {
  let dot = "digraph G{".to_string() + &"subgraph cluster_a{".repeat(200_000);
  let (message, _, _) = malformed_at(&dot);
  assert!(message.contains("nested deeper"), "{message}");
}
