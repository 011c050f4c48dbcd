//! Lexer mode: an ordered pattern table plus skip rules.
//!
//!     A mode is the unit of lexical state. It owns an ordered table of
//!     (token name, regex pattern) entries and a set of token names to skip.
//!     Pattern order is significant: earlier entries take priority on ties,
//!     exactly like the declaration-order grammar tables used elsewhere in
//!     this codebase.
//!
//! Pattern Compilation
//!
//!     All named patterns of a mode are compiled once, at construction, into
//!     a single anchored alternation:
//!
//!         ^(?:(?P<g0>pattern0)|(?P<g1>pattern1)|...)
//!
//!     Each branch is tagged with a generated group name (`g0`, `g1`, ...)
//!     mapped back to the token name, so one regex pass per offset resolves
//!     which token matched. Generated names sidestep the group-name character
//!     restrictions and allow arbitrary token names. The regex crate prefers
//!     earlier alternation branches, which is what gives declaration order
//!     its priority. Probing each pattern independently per offset is
//!     deliberately not supported.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::common::LexError;
use super::driver::ModeTokens;
use crate::token::{Token, UNKNOWN};

/// Token and mode names must be identifier-like so they can appear verbatim
/// in transition tables and error messages.
static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// A scanned token plus the offset at which scanning should resume.
pub(crate) struct Scanned {
    pub token: Token,
    pub resume: usize,
}

/// A named set of token patterns plus skip rules, active at a given moment
/// of lexing.
#[derive(Debug, Clone)]
pub struct LexerMode {
    name: String,
    /// Token names, in declaration order; index i corresponds to group `gi`.
    tokens: Vec<String>,
    skips: HashSet<String>,
    regex: Regex,
}

impl LexerMode {
    /// Build a mode from an ordered pattern table and a skip set.
    ///
    /// Fails with [`LexError::InvalidPattern`] if a token name is not
    /// identifier-like, appears twice, or its pattern does not compile.
    pub fn new<N, P, S>(
        name: impl Into<String>,
        patterns: impl IntoIterator<Item = (N, P)>,
        skips: impl IntoIterator<Item = S>,
    ) -> Result<Self, LexError>
    where
        N: Into<String>,
        P: AsRef<str>,
        S: Into<String>,
    {
        let name = name.into();
        if !NAME_REGEX.is_match(&name) {
            return Err(LexError::InvalidPattern {
                token: name.clone(),
                message: "mode name must be identifier-like".to_string(),
            });
        }

        let mut tokens = Vec::new();
        let mut branches = Vec::new();
        for (index, (token, pattern)) in patterns.into_iter().enumerate() {
            let token = token.into();
            let pattern = pattern.as_ref();

            if !NAME_REGEX.is_match(&token) {
                return Err(LexError::InvalidPattern {
                    token,
                    message: "token name must be identifier-like".to_string(),
                });
            }
            if tokens.contains(&token) {
                return Err(LexError::InvalidPattern {
                    token,
                    message: "duplicate token name in pattern table".to_string(),
                });
            }

            // Validate the branch in isolation so errors name the right token.
            if let Err(e) = Regex::new(pattern) {
                return Err(LexError::InvalidPattern {
                    token,
                    message: e.to_string(),
                });
            }

            branches.push(format!("(?P<g{}>{})", index, pattern));
            tokens.push(token);
        }

        if tokens.is_empty() {
            return Err(LexError::InvalidPattern {
                token: name,
                message: "pattern table is empty".to_string(),
            });
        }

        let combined = format!("^(?:{})", branches.join("|"));
        let regex = Regex::new(&combined).map_err(|e| LexError::InvalidPattern {
            token: name.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            name,
            tokens,
            skips: skips.into_iter().map(Into::into).collect(),
            regex,
        })
    }

    /// The mode name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lex the source from the given offset as a lazy token sequence.
    ///
    /// Every text byte is covered by exactly one token: either a named match
    /// or the reserved unknown token. Skip-set tokens are filtered before
    /// tokens reach the caller. The sequence ends with a synthesized
    /// end-of-input token.
    pub fn lex<'s>(&self, source: &'s str, offset: usize) -> ModeTokens<'s> {
        ModeTokens::new(self.clone(), source, offset)
    }

    /// Resolve the declaration-order-priority match at `offset`.
    ///
    /// Returns the matching token-table index and the match length, or None
    /// when no branch participates.
    fn resolve(&self, source: &str, offset: usize) -> Option<(usize, usize)> {
        let captures = self.regex.captures(&source[offset..])?;
        for index in 0..self.tokens.len() {
            if let Some(m) = captures.name(&format!("g{}", index)) {
                return Some((index, m.len()));
            }
        }
        None
    }

    /// Produce the next surfaced token at or after `offset`.
    ///
    /// Applies skip filtering and merges unrecognized runs into a single
    /// unknown token spanning the run. Returns `Ok(None)` at end of source;
    /// the caller decides how end-of-input is represented. Zero-length
    /// matches are surfaced unconditionally (never skipped) so the caller
    /// can guard against them repeating without progress.
    pub(crate) fn next_token(
        &self,
        source: &str,
        mut offset: usize,
    ) -> Result<Option<Scanned>, LexError> {
        loop {
            if offset >= source.len() {
                return Ok(None);
            }

            match self.resolve(source, offset) {
                Some((index, length)) => {
                    let name = &self.tokens[index];
                    if length > 0 && self.skips.contains(name) {
                        offset += length;
                        continue;
                    }
                    let token = Token::new(name.clone(), &source[offset..offset + length], offset);
                    return Ok(Some(Scanned {
                        token,
                        resume: offset + length,
                    }));
                }
                None => return Ok(Some(self.unknown_run(source, offset))),
            }
        }
    }

    /// Collect the unrecognized run starting at `offset` into one unknown
    /// token, ending where a pattern matches again or the source ends.
    fn unknown_run(&self, source: &str, offset: usize) -> Scanned {
        let mut end = offset;
        loop {
            // Advance one character at a time; offsets stay on char boundaries.
            match source[end..].chars().next() {
                Some(c) => end += c.len_utf8(),
                None => break,
            }
            if end >= source.len() || self.resolve(source, end).is_some() {
                break;
            }
        }

        Scanned {
            token: Token::new(UNKNOWN, &source[offset..end], offset),
            resume: end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits_mode() -> LexerMode {
        LexerMode::new(
            "default",
            [("T_NUMBER", r"\d+"), ("T_PLUS", r"\+")],
            ["T_WHITESPACE"],
        )
        .unwrap()
    }

    #[test]
    fn test_declaration_order_wins_on_ties() {
        // Both patterns match "a"; the first declared must win.
        let mode = LexerMode::new(
            "default",
            [("T_FIRST", r"[a-z]"), ("T_SECOND", r"a")],
            Vec::<String>::new(),
        )
        .unwrap();

        let scanned = mode.next_token("a", 0).unwrap().unwrap();
        assert_eq!(scanned.token.name, "T_FIRST");
    }

    #[test]
    fn test_skip_tokens_are_filtered() {
        let mode = LexerMode::new(
            "default",
            [("T_NUMBER", r"\d+"), ("T_WHITESPACE", r"\s+")],
            ["T_WHITESPACE"],
        )
        .unwrap();

        let scanned = mode.next_token("   42", 0).unwrap().unwrap();
        assert_eq!(scanned.token.name, "T_NUMBER");
        assert_eq!(scanned.token.offset, 3);
    }

    #[test]
    fn test_unknown_run_is_merged() {
        let mode = digits_mode();
        let scanned = mode.next_token("@#$12", 0).unwrap().unwrap();
        assert_eq!(scanned.token.name, UNKNOWN);
        assert_eq!(scanned.token.value, "@#$");
        assert_eq!(scanned.resume, 3);

        let next = mode.next_token("@#$12", scanned.resume).unwrap().unwrap();
        assert_eq!(next.token.name, "T_NUMBER");
    }

    #[test]
    fn test_unknown_run_to_end_of_source() {
        let mode = digits_mode();
        let scanned = mode.next_token("12@@@", 2).unwrap().unwrap();
        assert_eq!(scanned.token.name, UNKNOWN);
        assert_eq!(scanned.token.value, "@@@");
    }

    #[test]
    fn test_invalid_pattern_is_a_construction_error() {
        let result = LexerMode::new("default", [("T_BAD", r"(")], Vec::<String>::new());
        assert!(matches!(
            result,
            Err(LexError::InvalidPattern { ref token, .. }) if token == "T_BAD"
        ));
    }

    #[test]
    fn test_duplicate_token_name_rejected() {
        let result = LexerMode::new(
            "default",
            [("T_A", r"a"), ("T_A", r"b")],
            Vec::<String>::new(),
        );
        assert!(matches!(result, Err(LexError::InvalidPattern { .. })));
    }

    #[test]
    fn test_empty_pattern_table_rejected() {
        let result = LexerMode::new(
            "default",
            Vec::<(String, String)>::new(),
            Vec::<String>::new(),
        );
        assert!(matches!(result, Err(LexError::InvalidPattern { .. })));
    }
}
