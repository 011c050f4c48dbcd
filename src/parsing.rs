//! Parsing
//!
//!     This module evaluates a grammar (a rule-id → rule graph) against a
//!     token buffer, producing a tree of opaque result values or a single
//!     definitive error.
//!
//!     The pipeline is: source → mode-switching lexer → lazy token sequence
//!     → token buffer → rule interpreter → result items (optionally
//!     assembled into AST nodes by the caller's builder hook).
//!
//! Failure Versus Error
//!
//!     Rule-level failure is not an error: it is a normal, expected sentinel
//!     used pervasively for backtracking, handled by the enclosing
//!     alternation/optional/repetition via buffer rollback. The error type
//!     below is reserved for faults that abort the whole parse call: the
//!     lexer failing to tokenize, buffer bounds violations, structurally
//!     invalid grammars, and the top-level failure to match or fully consume
//!     the input. The last one is the only error an end user normally sees;
//!     it references the furthest-advanced token of the whole attempt plus
//!     up to three expected terminal names.

pub mod builder;
pub mod context;
pub mod engine;
pub mod ir;
pub mod options;

use std::fmt;

pub use builder::{Builder, NoopBuilder};
pub use context::Context;
pub use engine::{Parser, StepResult};
pub use ir::{merge, Node, ParseItem, RuleOutput};
pub use options::{ParserOptions, StepInfo, StepInterceptor};

use crate::buffer::BufferError;
use crate::grammar::GrammarError;
use crate::lexing::LexError;
use crate::token::Token;

/// Errors that abort a parse call.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The lexer could not tokenize the source.
    Lex(LexError),

    /// A buffer bounds violation (backtracked too far, or ran off the end).
    Buffer(BufferError),

    /// The grammar itself is structurally invalid.
    Grammar(GrammarError),

    /// The input did not match, or matching stopped before the end of
    /// input. References the furthest-advanced token of the attempt.
    UnexpectedToken { token: Token, expected: Vec<String> },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(e) => write!(f, "Parse error: {}", e),
            ParseError::Buffer(e) => write!(f, "Parse error: {}", e),
            ParseError::Grammar(e) => write!(f, "Parse error: {}", e),
            ParseError::UnexpectedToken { token, expected } => {
                write!(
                    f,
                    "Syntax error, unexpected {} at offset {}",
                    token, token.offset
                )?;
                if !expected.is_empty() {
                    write!(f, "; expected {}", expected.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Lex(err)
    }
}

impl From<BufferError> for ParseError {
    fn from(err: BufferError) -> Self {
        // Keep one error family: a lexer fault surfacing through a lazy pull
        // is still a lexer fault.
        match err {
            BufferError::Lex(e) => ParseError::Lex(e),
            other => ParseError::Buffer(other),
        }
    }
}

impl From<GrammarError> for ParseError {
    fn from(err: GrammarError) -> Self {
        ParseError::Grammar(err)
    }
}
