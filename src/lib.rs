//! # parlex
//!
//! A parsing toolkit: a mode-switching tokenizer, resumable/backtrackable
//! token cursors, and a recursive-descent interpreter that evaluates a
//! grammar expressed as a graph of rule values, producing an abstract
//! syntax tree via a caller-supplied builder hook.
//!
//! Pipeline
//!
//!     Source text flows through the stages in order:
//!
//!         source → mode-switching lexer → lazy token sequence
//!                → token buffer (eager / lazy / windowed)
//!                → rule interpreter (+ builder hook) → result items
//!
//!     Every stage is pull-based and strictly sequential: no token is
//!     produced until the engine, via the buffer, asks for it. Grammars and
//!     lexers are read-only after construction and may be shared across
//!     threads; each parse call owns its buffer and context.
//!
//! Example
//!
//!     Matching `Sum = Number { "+" Number }`:
//!
//!     ```rust,ignore
//!     use parlex::{LexerMode, MultistateLexer, Parser, ParserOptions};
//!
//!     let mode = LexerMode::new(
//!         "default",
//!         [("T_NUMBER", r"\d+"), ("T_PLUS", r"\+"), ("T_WHITESPACE", r"\s+")],
//!         ["T_WHITESPACE"],
//!     )?;
//!     let lexer = MultistateLexer::new([mode], "default")?;
//!
//!     let parser = Parser::new(grammar, lexer)
//!         .with_options(ParserOptions::default().initial_rule("sum"));
//!     let items = parser.parse("1 + 2 + 3")?;
//!     ```

pub mod buffer;
pub mod grammar;
pub mod lexing;
pub mod parsing;
pub mod testing;
pub mod token;

pub use buffer::{BufferError, BufferKind, EagerBuffer, LazyBuffer, TokenBuffer, WindowedBuffer};
pub use grammar::{Grammar, GrammarError, Rule, RuleId};
pub use lexing::{LexError, LexerMode, MultistateLexer};
pub use parsing::{
    Builder, Context, Node, NoopBuilder, ParseError, ParseItem, Parser, ParserOptions,
    RuleOutput, StepInfo, StepInterceptor, StepResult,
};
pub use token::{Token, END_OF_INPUT, UNKNOWN};
