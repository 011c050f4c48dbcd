//! Per-mode lexer driver.
//!
//!     Wraps a single [`LexerMode`](super::mode::LexerMode) into a lazy,
//!     ordered token sequence. Tokens are produced on demand, one at a time,
//!     without materializing the stream; this is what lets the buffers pull
//!     lazily and what keeps lexing strictly sequential.
//!
//!     The sequence always terminates with a synthesized end-of-input token
//!     at the end of the source. Unrecognized runs surface as the reserved
//!     unknown token; tolerant handling versus raising is decided by the
//!     consumer (see the multistate lexer).

use super::common::LexError;
use super::mode::LexerMode;
use crate::token::{Token, END_OF_INPUT};

/// Lazy token sequence for one lexer mode.
pub struct ModeTokens<'s> {
    mode: LexerMode,
    source: &'s str,
    offset: usize,
    /// Offset of the last zero-length token, used to refuse a second
    /// zero-length match at the same position (no progress).
    last_empty: Option<usize>,
    done: bool,
}

impl<'s> ModeTokens<'s> {
    pub(crate) fn new(mode: LexerMode, source: &'s str, offset: usize) -> Self {
        Self {
            mode,
            source,
            offset,
            last_empty: None,
            done: false,
        }
    }
}

impl<'s> Iterator for ModeTokens<'s> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.mode.next_token(self.source, self.offset) {
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
            Ok(None) => {
                self.done = true;
                Some(Ok(Token::end_of_input(END_OF_INPUT, self.source.len())))
            }
            Ok(Some(scanned)) => {
                if scanned.token.length() == 0 {
                    if self.last_empty == Some(scanned.token.offset) {
                        self.done = true;
                        return Some(Err(LexError::Cycle {
                            mode: self.mode.name().to_string(),
                            token: scanned.token.name,
                            offset: scanned.token.offset,
                        }));
                    }
                    self.last_empty = Some(scanned.token.offset);
                }
                self.offset = scanned.resume;
                Some(Ok(scanned.token))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::UNKNOWN;

    fn arithmetic() -> LexerMode {
        LexerMode::new(
            "default",
            [
                ("T_NUMBER", r"\d+"),
                ("T_PLUS", r"\+"),
                ("T_WHITESPACE", r"\s+"),
            ],
            ["T_WHITESPACE"],
        )
        .unwrap()
    }

    fn names(source: &str) -> Vec<String> {
        arithmetic()
            .lex(source, 0)
            .map(|r| r.unwrap().name)
            .collect()
    }

    #[test]
    fn test_sequence_ends_with_eoi() {
        assert_eq!(
            names("1 + 2"),
            vec!["T_NUMBER", "T_PLUS", "T_NUMBER", END_OF_INPUT]
        );
    }

    #[test]
    fn test_empty_source_yields_only_eoi() {
        assert_eq!(names(""), vec![END_OF_INPUT]);
    }

    #[test]
    fn test_offsets_cover_every_byte() {
        let tokens: Vec<Token> = arithmetic().lex("12+345", 0).map(|r| r.unwrap()).collect();
        let mut expected = 0;
        for token in &tokens {
            assert_eq!(token.offset, expected);
            expected += token.length();
        }
        assert_eq!(expected, "12+345".len());
    }

    #[test]
    fn test_unknown_tokens_are_yielded() {
        assert_eq!(
            names("1 @@ 2"),
            vec!["T_NUMBER", UNKNOWN, "T_NUMBER", END_OF_INPUT]
        );
    }

    #[test]
    fn test_repeated_zero_length_match_is_a_cycle() {
        // `a*` matches empty at offset 0 in front of "b", forever.
        let mode = LexerMode::new("default", [("T_AS", r"a*")], Vec::<String>::new()).unwrap();
        let results: Vec<_> = mode.lex("b", 0).collect();

        assert!(matches!(results.last(), Some(Err(LexError::Cycle { .. }))));
    }

    #[test]
    fn test_start_offset_is_honored() {
        let tokens: Vec<Token> = arithmetic().lex("1+2+3", 2).map(|r| r.unwrap()).collect();
        assert_eq!(tokens[0].value, "2");
        assert_eq!(tokens[0].offset, 2);
    }
}
