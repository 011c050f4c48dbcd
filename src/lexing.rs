//! Lexing
//!
//!     This module turns source text into a lazy, ordered sequence of tokens.
//!     Lexing is organized around modes: each [`LexerMode`] owns an ordered
//!     pattern table (declaration order is priority order) and a skip set.
//!     The [`MultistateLexer`] composes modes, switching the active one on
//!     configured token transitions and resuming scanning immediately after
//!     the transition token's byte range.
//!
//!     Everything here is pull-based: no token is produced until a consumer
//!     asks for it. The buffers in [`buffer`](crate::buffer) are the intended
//!     consumers; they retain tokens so the parser can backtrack without ever
//!     re-lexing.
//!
//! Errors
//!
//!     Configuration problems (bad pattern table, unknown starting mode) are
//!     reported at construction, before any scanning begins. Runtime faults
//!     (unrecognized input in strict streams, transition cycles) surface as
//!     `Err` items of the lazy sequence and terminate it.

pub mod common;
pub mod driver;
pub mod mode;
pub mod multistate;

pub use common::LexError;
pub use driver::ModeTokens;
pub use mode::LexerMode;
pub use multistate::{MultistateLexer, TokenStream};
