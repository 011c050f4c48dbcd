//! Token buffers
//!
//!     A buffer is a seekable cursor over a token sequence. It is the only
//!     rollback mechanism the parser engine has: backtracking is a `seek`
//!     back to a previously recorded `key`, which must never replay the
//!     lexer. Three implementations trade memory for backtracking range:
//!
//!         - [`EagerBuffer`]: materializes the entire sequence up front; the
//!           cursor is an index into a fixed array, every position stays
//!           seekable.
//!         - [`LazyBuffer`]: pulls tokens on demand and retains every token
//!           ever produced, so any previously visited position remains
//!           seekable at the cost of unbounded growth.
//!         - [`WindowedBuffer`]: pulls on demand but retains only a sliding
//!           window; once the window exceeds its configured size the oldest
//!           retained token is dropped as a new one is appended. Seeking
//!           below the oldest retained position is a hard error (the memory
//!           is already freed). This is what lets the engine process
//!           unbounded streams with bounded memory, as long as no rule needs
//!           to backtrack past the window.
//!
//!     All three share one contract: `initial() <= key()` at all times, the
//!     cursor only ever moves to positions that are (or once were) populated,
//!     and seeking past the last known position pulls from the underlying
//!     sequence until reached or exhausted.

pub mod eager;
pub mod lazy;
pub mod windowed;

use std::fmt;

pub use eager::EagerBuffer;
pub use lazy::LazyBuffer;
pub use windowed::WindowedBuffer;

use crate::lexing::LexError;
use crate::token::Token;

/// Items of the underlying lazy token sequence a buffer pulls from.
pub type TokenResult = Result<Token, LexError>;

/// Errors raised by buffer cursor movement.
///
/// Callers use these to tell "backtracked too far" (a grammar bug) apart
/// from "ran off the end" (a genuine parse failure).
#[derive(Debug, Clone, PartialEq)]
pub enum BufferError {
    /// Seek target below the buffer's initial position.
    PositionTooLow { position: usize, initial: usize },

    /// Seek target past the end of the (exhausted) token sequence.
    PositionExceedsStream { position: usize },

    /// Seek target below the oldest retained position of a windowed buffer.
    MemoryAlreadyFreed { position: usize, oldest: usize },

    /// A lazy pull surfaced a lexer fault.
    Lex(LexError),
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::PositionTooLow { position, initial } => write!(
                f,
                "Buffer position {} is below the initial position {}",
                position, initial
            ),
            BufferError::PositionExceedsStream { position } => write!(
                f,
                "Buffer position {} exceeds the token stream",
                position
            ),
            BufferError::MemoryAlreadyFreed { position, oldest } => write!(
                f,
                "Buffer position {} was evicted (oldest retained is {})",
                position, oldest
            ),
            BufferError::Lex(e) => write!(f, "Lexing failed during buffering: {}", e),
        }
    }
}

impl std::error::Error for BufferError {}

impl From<LexError> for BufferError {
    fn from(err: LexError) -> Self {
        BufferError::Lex(err)
    }
}

/// Seekable cursor over a token sequence.
///
/// The trait is object safe; the engine works against `&mut dyn TokenBuffer`
/// so the variant is a construction-time choice (see [`BufferKind`]).
pub trait TokenBuffer {
    /// The token at the cursor, falling back to the last known token if the
    /// cursor has run past the populated range. Never panics on a populated
    /// buffer.
    fn current(&self) -> &Token;

    /// Current cursor position.
    fn key(&self) -> usize;

    /// The buffer's initial position.
    fn initial(&self) -> usize;

    /// Move the cursor. Lazy variants pull from the source until the target
    /// is reached or the stream is exhausted.
    fn seek(&mut self, position: usize) -> Result<(), BufferError>;

    /// Advance the cursor by one if not already past the end.
    fn next(&mut self) -> Result<(), BufferError>;

    /// True while the cursor references a populated position.
    fn valid(&self) -> bool;

    /// Seek back to the initial position.
    fn rewind(&mut self) -> Result<(), BufferError> {
        self.seek(self.initial())
    }
}

/// Buffer strategy selector, chosen via
/// [`ParserOptions`](crate::parsing::ParserOptions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Materialize the whole token sequence up front.
    Eager,
    /// Pull on demand, retain everything.
    LazyUnbounded,
    /// Pull on demand, retain a sliding window of the given size.
    LazyWindowed(usize),
}

impl Default for BufferKind {
    fn default() -> Self {
        BufferKind::Eager
    }
}

impl BufferKind {
    /// Build a buffer of this kind over the given token stream.
    pub fn build<'s, I>(&self, stream: I) -> Result<Box<dyn TokenBuffer + 's>, BufferError>
    where
        I: Iterator<Item = TokenResult> + 's,
    {
        Ok(match self {
            BufferKind::Eager => Box::new(EagerBuffer::new(stream)?),
            BufferKind::LazyUnbounded => Box::new(LazyBuffer::new(stream)?),
            BufferKind::LazyWindowed(size) => Box::new(WindowedBuffer::new(stream, *size)?),
        })
    }
}
