//! Sliding-window token buffer: lazy pulls with FIFO eviction.

use std::collections::VecDeque;

use super::{BufferError, TokenBuffer, TokenResult};
use crate::token::Token;

/// Buffer that retains a bounded sliding window of tokens.
///
/// Tokens are pulled on demand like [`LazyBuffer`](super::LazyBuffer), but
/// once the retained window exceeds the configured size, the oldest retained
/// token is dropped as a new one is appended. Eviction is a strict FIFO
/// keyed by buffer position, independent of where the cursor itself sits.
/// Seeking below the oldest retained position fails with
/// [`BufferError::MemoryAlreadyFreed`].
pub struct WindowedBuffer<I> {
    stream: I,
    window: VecDeque<Token>,
    /// Buffer position of the front of the window.
    oldest: usize,
    size: usize,
    initial: usize,
    position: usize,
    exhausted: bool,
}

impl<I: Iterator<Item = TokenResult>> WindowedBuffer<I> {
    /// Default retained-window size.
    pub const DEFAULT_SIZE: usize = 100;

    /// Wrap the stream with the given window size (at least 1), pulling the
    /// first token so the cursor starts on a populated position.
    pub fn new(stream: I, size: usize) -> Result<Self, BufferError> {
        let mut buffer = Self {
            stream,
            window: VecDeque::new(),
            oldest: 0,
            size: size.max(1),
            initial: 0,
            position: 0,
            exhausted: false,
        };
        if !buffer.pull()? {
            return Err(BufferError::PositionExceedsStream { position: 0 });
        }
        Ok(buffer)
    }

    /// Buffer position just past the newest retained token.
    fn frontier(&self) -> usize {
        self.oldest + self.window.len()
    }

    /// Pull one token, evicting the oldest retained one if the window would
    /// exceed its size. Returns false once exhausted.
    fn pull(&mut self) -> Result<bool, BufferError> {
        if self.exhausted {
            return Ok(false);
        }
        match self.stream.next() {
            Some(result) => {
                self.window.push_back(result?);
                if self.window.len() > self.size {
                    self.window.pop_front();
                    self.oldest += 1;
                }
                Ok(true)
            }
            None => {
                self.exhausted = true;
                Ok(false)
            }
        }
    }
}

impl<I: Iterator<Item = TokenResult>> TokenBuffer for WindowedBuffer<I> {
    fn current(&self) -> &Token {
        // Construction guarantees a non-empty window; the cursor can only
        // run past the retained range, never below it.
        self.position
            .checked_sub(self.oldest)
            .and_then(|index| self.window.get(index))
            .unwrap_or_else(|| self.window.back().unwrap())
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
        if position < self.oldest {
            return Err(BufferError::MemoryAlreadyFreed {
                position,
                oldest: self.oldest,
            });
        }
        while self.frontier() <= position {
            if !self.pull()? {
                return Err(BufferError::PositionExceedsStream { position });
            }
        }
        self.position = position;
        Ok(())
    }

    fn next(&mut self) -> Result<(), BufferError> {
        if self.position < self.frontier() {
            self.position += 1;
            // Keep one token of lookahead so valid() stays a cheap check.
            if self.position == self.frontier() {
                self.pull()?;
            }
        }
        Ok(())
    }

    fn valid(&self) -> bool {
        self.position < self.frontier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mk_token;

    fn stream(count: usize) -> impl Iterator<Item = TokenResult> {
        (0..count).map(|i| Ok(mk_token("T_A", "x", i)))
    }

    #[test]
    fn test_eviction_frees_oldest_positions() {
        let mut buf = WindowedBuffer::new(stream(10), 3).unwrap();
        buf.seek(6).unwrap();

        // Window of 3 around the frontier: positions 0..=3 are gone.
        assert!(matches!(
            buf.seek(0),
            Err(BufferError::MemoryAlreadyFreed { position: 0, .. })
        ));
        // Everything still retained is seekable.
        let oldest = buf.key() + 1 - 3;
        for position in oldest..=buf.key() {
            assert!(buf.seek(position).is_ok(), "position {} lost", position);
        }
    }

    #[test]
    fn test_eviction_is_keyed_by_position_not_cursor() {
        let mut buf = WindowedBuffer::new(stream(10), 2).unwrap();
        // Drive the frontier forward without moving the cursor backwards in
        // between: after enough next() calls, position 0 must be freed even
        // though the cursor visited it first.
        for _ in 0..5 {
            buf.next().unwrap();
        }
        assert!(matches!(
            buf.seek(0),
            Err(BufferError::MemoryAlreadyFreed { .. })
        ));
    }

    #[test]
    fn test_within_window_behaves_like_lazy() {
        let mut buf = WindowedBuffer::new(stream(10), 100).unwrap();
        buf.seek(7).unwrap();
        buf.seek(2).unwrap();
        assert_eq!(buf.current().offset, 2);
    }

    #[test]
    fn test_seek_past_exhausted_stream_fails() {
        let mut buf = WindowedBuffer::new(stream(3), 2).unwrap();
        assert_eq!(
            buf.seek(9),
            Err(BufferError::PositionExceedsStream { position: 9 })
        );
    }

    #[test]
    fn test_current_falls_back_to_newest_past_the_end() {
        let mut buf = WindowedBuffer::new(stream(2), 2).unwrap();
        buf.next().unwrap();
        buf.next().unwrap();
        assert!(!buf.valid());
        assert_eq!(buf.current().offset, 1);
    }
}
