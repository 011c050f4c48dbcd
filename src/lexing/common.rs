//! Common lexer module
//!
//! This module contains the shared error type for lexer implementations.

use std::fmt;

/// Errors that can occur while configuring or running a lexer.
///
/// Construction errors (`InvalidPattern`, `UnknownMode`) are reported before
/// any scanning begins. Runtime errors (`UnrecognizedInput`, `Cycle`) carry
/// the offending offset so callers can render a source position.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    /// A pattern-table entry is invalid: bad regex, bad token name, or a
    /// duplicate token name within one mode.
    InvalidPattern { token: String, message: String },

    /// A mode name referenced by the configuration does not exist.
    UnknownMode { mode: String },

    /// No pattern of the active mode matched, and the lexer is not tolerant.
    UnrecognizedInput { offset: usize, found: String },

    /// A mode was re-entered at an offset it was already entered at, or a
    /// zero-length match repeated without progress. Evidence of an infinite
    /// loop in the mode/transition configuration.
    Cycle {
        mode: String,
        token: String,
        offset: usize,
    },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::InvalidPattern { token, message } => {
                write!(f, "Invalid pattern for token {}: {}", token, message)
            }
            LexError::UnknownMode { mode } => write!(f, "Unknown lexer mode: {}", mode),
            LexError::UnrecognizedInput { offset, found } => {
                write!(f, "Unrecognized input {:?} at offset {}", found, offset)
            }
            LexError::Cycle {
                mode,
                token,
                offset,
            } => write!(
                f,
                "Lexer cycle detected: mode {} re-entered at offset {} on token {}",
                mode, offset, token
            ),
        }
    }
}

impl std::error::Error for LexError {}
