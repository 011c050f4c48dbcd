//! End-to-end parser tests over the reference arithmetic fixture.
//!
//! Grammar: `Sum = Number { "+" Number }`, with the plus sign discarded.
//! The same sources are driven through every buffer strategy, since the
//! choice of buffer must never change the parse result.

use rstest::rstest;

use parlex::testing::{arithmetic_lexer, sum_grammar};
use parlex::{
    BufferKind, Node, ParseError, ParseItem, Parser, ParserOptions, RuleOutput, Token,
};

fn sum_parser(buffer: BufferKind) -> Parser {
    Parser::new(sum_grammar(), arithmetic_lexer()).with_options(
        ParserOptions::default()
            .initial_rule("sum")
            .buffer(buffer),
    )
}

fn token_values(items: &[ParseItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            ParseItem::Token(t) => t.value.clone(),
            ParseItem::Node(n) => n.name.clone(),
        })
        .collect()
}

#[rstest]
#[case::eager(BufferKind::Eager)]
#[case::lazy(BufferKind::LazyUnbounded)]
#[case::windowed(BufferKind::LazyWindowed(4))]
fn test_sum_parses_to_flat_number_list(#[case] buffer: BufferKind) {
    let items = sum_parser(buffer).parse("1 + 2 + 3").expect("valid sum");

    // The plus tokens are discarded; the numbers form one flat child list.
    assert_eq!(token_values(&items), vec!["1", "2", "3"]);
    assert!(items
        .iter()
        .all(|item| matches!(item, ParseItem::Token(t) if t.name == "T_NUMBER")));
}

#[rstest]
#[case::eager(BufferKind::Eager)]
#[case::lazy(BufferKind::LazyUnbounded)]
#[case::windowed(BufferKind::LazyWindowed(4))]
fn test_incomplete_sum_reports_eoi_and_expected_number(#[case] buffer: BufferKind) {
    let error = sum_parser(buffer).parse("1 +").unwrap_err();

    match error {
        ParseError::UnexpectedToken { token, expected } => {
            assert_eq!(token.name, "T_EOI");
            assert!(expected.contains(&"T_NUMBER".to_string()));
            assert!(expected.len() <= 3);
        }
        other => panic!("expected UnexpectedToken, got {:?}", other),
    }
}

#[test]
fn test_single_number_is_a_valid_sum() {
    let items = sum_parser(BufferKind::Eager).parse("42").unwrap();
    assert_eq!(token_values(&items), vec!["42"]);
}

#[test]
fn test_trailing_tokens_rejected_by_default() {
    // "1 + 2 3": the sum matches "1 + 2" and leaves "3" unconsumed.
    let error = sum_parser(BufferKind::Eager).parse("1 + 2 3").unwrap_err();
    assert!(matches!(error, ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_trailing_tokens_accepted_when_allowed() {
    let parser = Parser::new(sum_grammar(), arithmetic_lexer()).with_options(
        ParserOptions::default()
            .initial_rule("sum")
            .allow_trailing(true),
    );
    let items = parser.parse("1 + 2 3").unwrap();
    assert_eq!(token_values(&items), vec!["1", "2"]);
}

#[test]
fn test_lexer_fault_aborts_the_parse() {
    let error = sum_parser(BufferKind::Eager).parse("1 + ?").unwrap_err();
    assert!(matches!(error, ParseError::Lex(_)), "got {:?}", error);
}

#[test]
fn test_builder_assembles_named_nodes() {
    let builder = |context: &parlex::Context, result: &RuleOutput| -> Option<Node> {
        // Only the top rule gets a node; everything below stays raw.
        if context.state.to_string() != "sum" {
            return None;
        }
        Some(Node::new(
            "sum",
            result.offset().unwrap_or(0),
            result.clone().into_items(),
        ))
    };

    let parser = Parser::new(sum_grammar(), arithmetic_lexer())
        .with_options(ParserOptions::default().initial_rule("sum"))
        .with_builder(builder);

    let items = parser.parse("1 + 2").unwrap();
    assert_eq!(items.len(), 1);
    match &items[0] {
        ParseItem::Node(node) => {
            assert_eq!(node.name, "sum");
            assert_eq!(node.offset, 0);
            assert_eq!(node.children.len(), 2);
        }
        other => panic!("expected a built node, got {:?}", other),
    }
}

#[test]
fn test_arithmetic_token_stream_snapshot() {
    let lexer = arithmetic_lexer();
    let tokens: Vec<Token> = lexer
        .lex("1 + 2", 0)
        .map(|r| r.expect("lexes cleanly"))
        .collect();

    insta::assert_debug_snapshot!("arithmetic_token_stream", tokens);
}

#[test]
fn test_result_items_serialize_to_json() {
    let items = sum_parser(BufferKind::Eager).parse("1 + 2").unwrap();
    let json = serde_json::to_value(&items).expect("items serialize");

    assert_eq!(json[0]["Token"]["value"], "1");
    assert_eq!(json[1]["Token"]["value"], "2");
}
