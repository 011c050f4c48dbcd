//! Lazy unbounded token buffer: pulls on demand, retains everything.

use super::{BufferError, TokenBuffer, TokenResult};
use crate::token::Token;

/// Buffer that pulls tokens on demand and retains every token ever produced.
///
/// Any previously visited position remains seekable, at the cost of growth
/// proportional to how far the cursor has advanced.
pub struct LazyBuffer<I> {
    stream: I,
    tokens: Vec<Token>,
    initial: usize,
    position: usize,
    exhausted: bool,
}

impl<I: Iterator<Item = TokenResult>> LazyBuffer<I> {
    /// Wrap the stream, pulling the first token so the cursor starts on a
    /// populated position. An empty stream is reported as running off the
    /// end at position 0.
    pub fn new(stream: I) -> Result<Self, BufferError> {
        let mut buffer = Self {
            stream,
            tokens: Vec::new(),
            initial: 0,
            position: 0,
            exhausted: false,
        };
        if !buffer.pull()? {
            return Err(BufferError::PositionExceedsStream { position: 0 });
        }
        Ok(buffer)
    }

    /// Pull one token from the stream. Returns false once exhausted.
    fn pull(&mut self) -> Result<bool, BufferError> {
        if self.exhausted {
            return Ok(false);
        }
        match self.stream.next() {
            Some(result) => {
                self.tokens.push(result?);
                Ok(true)
            }
            None => {
                self.exhausted = true;
                Ok(false)
            }
        }
    }
}

impl<I: Iterator<Item = TokenResult>> TokenBuffer for LazyBuffer<I> {
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
        while self.tokens.len() <= position {
            if !self.pull()? {
                return Err(BufferError::PositionExceedsStream { position });
            }
        }
        self.position = position;
        Ok(())
    }

    fn next(&mut self) -> Result<(), BufferError> {
        if self.position < self.tokens.len() {
            self.position += 1;
            // Keep one token of lookahead so valid() stays a cheap check.
            if self.position == self.tokens.len() {
                self.pull()?;
            }
        }
        Ok(())
    }

    fn valid(&self) -> bool {
        self.position < self.tokens.len()
    }
}
