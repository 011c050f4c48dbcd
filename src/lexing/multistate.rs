//! Mode-switching lexer.
//!
//!     Composes several lexer modes into one token stream. A transition
//!     table declares that emitting a given token name while in a given mode
//!     switches subsequent scanning to another mode, resuming immediately
//!     after the token's byte range. The transition token itself is yielded
//!     unchanged; only what follows it is lexed by the target mode.
//!
//!     Two invariants hold for every stream:
//!
//!         1. The sequence terminates at the configured end-of-input name,
//!            either produced by a mode pattern or synthesized at the end of
//!            the source.
//!         2. No (mode, offset) pair may recur. The stream tracks the most
//!            recent offset at which each mode was entered and compares it on
//!            every transition; recurrence is infinite-loop evidence and
//!            raises [`LexError::Cycle`] identifying the offending mode and
//!            token.
//!
//!     The stream is tolerant or strict about unrecognized input: tolerant
//!     streams yield the reserved unknown token for downstream handling,
//!     strict streams (the default) raise
//!     [`LexError::UnrecognizedInput`] immediately.

use std::collections::HashMap;

use super::common::LexError;
use super::mode::LexerMode;
use crate::token::{Token, END_OF_INPUT, UNKNOWN};

/// A lexer that switches the active mode on configured token transitions.
#[derive(Debug, Clone)]
pub struct MultistateLexer {
    modes: HashMap<String, LexerMode>,
    /// mode name -> (token name -> target mode name)
    transitions: HashMap<String, HashMap<String, String>>,
    initial: String,
    eoi: String,
    tolerant: bool,
}

impl MultistateLexer {
    /// Build a lexer from its modes and the name of the starting mode.
    ///
    /// Fails with [`LexError::UnknownMode`] if the starting mode is not among
    /// the given modes.
    pub fn new(
        modes: impl IntoIterator<Item = LexerMode>,
        initial: impl Into<String>,
    ) -> Result<Self, LexError> {
        let modes: HashMap<String, LexerMode> = modes
            .into_iter()
            .map(|m| (m.name().to_string(), m))
            .collect();
        let initial = initial.into();

        if !modes.contains_key(&initial) {
            return Err(LexError::UnknownMode { mode: initial });
        }

        Ok(Self {
            modes,
            transitions: HashMap::new(),
            initial,
            eoi: END_OF_INPUT.to_string(),
            tolerant: false,
        })
    }

    /// Register a transition: emitting `token` while in `mode` switches
    /// scanning to `target`. Both mode names must exist.
    pub fn when(
        mut self,
        mode: impl Into<String>,
        token: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<Self, LexError> {
        let mode = mode.into();
        let target = target.into();

        for name in [&mode, &target] {
            if !self.modes.contains_key(name) {
                return Err(LexError::UnknownMode { mode: name.clone() });
            }
        }

        self.transitions
            .entry(mode)
            .or_default()
            .insert(token.into(), target);
        Ok(self)
    }

    /// Override the end-of-input token name (default `T_EOI`).
    pub fn eoi_name(mut self, name: impl Into<String>) -> Self {
        self.eoi = name.into();
        self
    }

    /// Yield unrecognized-input tokens instead of raising on them.
    pub fn tolerant(mut self, tolerant: bool) -> Self {
        self.tolerant = tolerant;
        self
    }

    /// The configured end-of-input token name.
    pub fn end_of_input(&self) -> &str {
        &self.eoi
    }

    /// Lex the source from the given offset, starting in the initial mode.
    pub fn lex<'l, 's>(&'l self, source: &'s str, offset: usize) -> TokenStream<'l, 's> {
        let mut entries = HashMap::new();
        entries.insert(self.initial.clone(), offset);

        TokenStream {
            lexer: self,
            source,
            mode: self.initial.clone(),
            offset,
            entries,
            last_empty: None,
            done: false,
        }
    }
}

/// Lazy token stream produced by [`MultistateLexer::lex`].
pub struct TokenStream<'l, 's> {
    lexer: &'l MultistateLexer,
    source: &'s str,
    mode: String,
    offset: usize,
    /// Most recent offset at which each mode was entered.
    entries: HashMap<String, usize>,
    /// (mode, offset) of the last zero-length non-transition token.
    last_empty: Option<(String, usize)>,
    done: bool,
}

impl<'l, 's> TokenStream<'l, 's> {
    fn fail(&mut self, error: LexError) -> Option<Result<Token, LexError>> {
        self.done = true;
        Some(Err(error))
    }
}

impl<'l, 's> Iterator for TokenStream<'l, 's> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Mode names are validated at construction and on every transition.
        let mode = &self.lexer.modes[&self.mode];

        let scanned = match mode.next_token(self.source, self.offset) {
            Err(e) => return self.fail(e),
            Ok(None) => {
                self.done = true;
                return Some(Ok(Token::end_of_input(
                    self.lexer.eoi.clone(),
                    self.source.len(),
                )));
            }
            Ok(Some(scanned)) => scanned,
        };

        let token = scanned.token;

        if token.name == UNKNOWN && !self.lexer.tolerant {
            return self.fail(LexError::UnrecognizedInput {
                offset: token.offset,
                found: token.value,
            });
        }

        if token.name == self.lexer.eoi {
            self.done = true;
            return Some(Ok(token));
        }

        let transition = self
            .lexer
            .transitions
            .get(&self.mode)
            .and_then(|table| table.get(&token.name));

        if let Some(target) = transition {
            if !self.lexer.modes.contains_key(target) {
                return self.fail(LexError::UnknownMode {
                    mode: target.clone(),
                });
            }

            let resume = token.offset + token.length();
            if self.entries.get(target) == Some(&resume) {
                return self.fail(LexError::Cycle {
                    mode: target.clone(),
                    token: token.name,
                    offset: resume,
                });
            }

            self.entries.insert(target.clone(), resume);
            self.mode = target.clone();
            self.offset = resume;
            self.last_empty = None;
            return Some(Ok(token));
        }

        if token.length() == 0 {
            let position = (self.mode.clone(), token.offset);
            if self.last_empty.as_ref() == Some(&position) {
                return self.fail(LexError::Cycle {
                    mode: self.mode.clone(),
                    token: token.name,
                    offset: token.offset,
                });
            }
            self.last_empty = Some(position);
        }

        self.offset = scanned.resume;
        Some(Ok(token))
    }
}
