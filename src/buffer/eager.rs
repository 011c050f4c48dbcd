//! Eager token buffer: the whole sequence is materialized at construction.

use super::{BufferError, TokenBuffer, TokenResult};
use crate::token::Token;

/// Buffer that materializes the entire token sequence up front.
///
/// The cursor is an index into a fixed array, so every position from the
/// initial one to the end stays seekable for the lifetime of the buffer.
#[derive(Debug, Clone)]
pub struct EagerBuffer {
    tokens: Vec<Token>,
    initial: usize,
    position: usize,
}

impl EagerBuffer {
    /// Drain the stream into the buffer. The first lexer fault aborts
    /// construction; an empty stream is reported as running off the end at
    /// position 0.
    pub fn new(stream: impl Iterator<Item = TokenResult>) -> Result<Self, BufferError> {
        let tokens = stream.collect::<Result<Vec<_>, _>>()?;
        Self::from_tokens(tokens)
    }

    /// Build directly from already-materialized tokens.
    pub fn from_tokens(tokens: Vec<Token>) -> Result<Self, BufferError> {
        if tokens.is_empty() {
            return Err(BufferError::PositionExceedsStream { position: 0 });
        }
        Ok(Self {
            tokens,
            initial: 0,
            position: 0,
        })
    }

    /// Number of materialized tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// An eager buffer is never empty; construction rejects empty streams.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl TokenBuffer for EagerBuffer {
    fn current(&self) -> &Token {
        // Construction guarantees at least one token.
        self.tokens
            .get(self.position)
            .unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn key(&self) -> usize {
        self.position
    }

    fn initial(&self) -> usize {
        self.initial
    }

    fn seek(&mut self, position: usize) -> Result<(), BufferError> {
        if position < self.initial {
            return Err(BufferError::PositionTooLow {
                position,
                initial: self.initial,
            });
        }
        if position >= self.tokens.len() {
            return Err(BufferError::PositionExceedsStream { position });
        }
        self.position = position;
        Ok(())
    }

    fn next(&mut self) -> Result<(), BufferError> {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        Ok(())
    }

    fn valid(&self) -> bool {
        self.position < self.tokens.len()
    }
}
