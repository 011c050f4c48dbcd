//! Core token type shared across the lexer, buffers, and parser engine.
//!
//!     A token is an immutable, named slice of source text. It carries the
//!     token name (the grammar-facing identity), the matched text, and the
//!     byte offset at which the match started. The byte length is derived
//!     from the text, so the two can never disagree.
//!
//!     Two names are reserved:
//!
//!         - END_OF_INPUT ("T_EOI"): terminates every token stream. It is
//!           either produced by an explicit mode pattern or synthesized by
//!           the lexer at the end of the source.
//!         - UNKNOWN ("T_UNKNOWN"): covers a run of bytes no pattern of the
//!           active mode could match. Consecutive unrecognized bytes are
//!           merged into one token spanning the whole run.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Reserved name of the end-of-input token.
pub const END_OF_INPUT: &str = "T_EOI";

/// Reserved name of the token covering unrecognized input.
pub const UNKNOWN: &str = "T_UNKNOWN";

/// A named, positioned slice of source text produced by lexing.
///
/// Tokens are immutable once produced: they are created by a lexer mode and
/// owned by the token buffer once yielded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The token name (grammar-facing identity, e.g. "T_NUMBER").
    pub name: String,

    /// The matched source text.
    pub value: String,

    /// Byte offset of the match in the source.
    pub offset: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(name: impl Into<String>, value: impl Into<String>, offset: usize) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            offset,
        }
    }

    /// Create the end-of-input token at the given offset.
    pub fn end_of_input(name: impl Into<String>, offset: usize) -> Self {
        Self::new(name, "", offset)
    }

    /// Byte length of the matched text.
    pub fn length(&self) -> usize {
        self.value.len()
    }

    /// Byte range covered by this token.
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.value.len()
    }
}

impl fmt::Display for Token {
    /// Renders as `NAME ("value")`, with the value escaped and truncated so
    /// error messages stay single-line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_VALUE: usize = 32;

        let mut shown: String = self.value.chars().take(MAX_VALUE).collect();
        if self.value.chars().count() > MAX_VALUE {
            shown.push('…');
        }
        write!(f, "{} ({:?})", self.name, shown)
    }
}
