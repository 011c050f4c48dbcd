//! Testing utilities
//!
//!     Factories shared by unit and integration tests. Tests should build
//!     tokens, lexers, and grammars through these helpers instead of
//!     hand-rolling slight variations per test file: a small set of vetted
//!     fixtures keeps assertions comparable across suites and gives spec
//!     changes a single place to land.
//!
//!     The arithmetic fixture implements the reference grammar
//!
//!         Sum = Number { "+" Number }
//!
//!     over numbers, plus signs, and skipped whitespace.

use std::collections::HashMap;

use crate::grammar::{Grammar, Rule, RuleId};
use crate::lexing::{LexerMode, MultistateLexer};
use crate::token::Token;

/// Build a token without going through a lexer.
pub fn mk_token(name: &str, value: &str, offset: usize) -> Token {
    Token::new(name, value, offset)
}

/// Single-mode lexer for arithmetic sources: `T_NUMBER`, `T_PLUS`, and
/// skipped `T_WHITESPACE`.
pub fn arithmetic_lexer() -> MultistateLexer {
    let mode = LexerMode::new(
        "default",
        [
            ("T_NUMBER", r"\d+"),
            ("T_PLUS", r"\+"),
            ("T_WHITESPACE", r"\s+"),
        ],
        ["T_WHITESPACE"],
    )
    .expect("arithmetic mode is well-formed");

    MultistateLexer::new([mode], "default").expect("default mode exists")
}

/// The reference grammar `Sum = Number { "+" Number }`, with the plus sign
/// discarded (`keep = false`). Rule ids: `sum`, `number`, `tail`, `operand`,
/// `plus`.
pub fn sum_grammar() -> Grammar {
    let mut rules = HashMap::new();
    rules.insert(
        RuleId::from("sum"),
        Rule::Concatenation {
            sequence: vec!["number".into(), "tail".into()],
        },
    );
    rules.insert(RuleId::from("number"), Rule::lexeme("T_NUMBER"));
    rules.insert(
        RuleId::from("tail"),
        Rule::Repetition {
            rule: "operand".into(),
            min: 0,
            max: None,
        },
    );
    rules.insert(
        RuleId::from("operand"),
        Rule::Concatenation {
            sequence: vec!["plus".into(), "number".into()],
        },
    );
    rules.insert(RuleId::from("plus"), Rule::skipped_lexeme("T_PLUS"));

    Grammar::new(rules).expect("sum grammar is non-empty")
}
