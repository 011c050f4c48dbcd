//! Grammar rule interpreter.
//!
//!     The engine evaluates the rule graph recursively against a token
//!     buffer. Every rule evaluation returns `Ok(None)` for a plain match
//!     failure (the backtracking sentinel) and reserves `Err` for faults
//!     that abort the whole parse: lexer errors surfacing through lazy
//!     pulls, buffer bounds violations, and structurally invalid grammars.
//!
//!     Backtracking is a `key()`/`seek()` pair on the buffer: composite
//!     rules record a checkpoint before trying sub-rules and roll the cursor
//!     back on failure, so a failed alternative's partial consumption is
//!     invisible to whatever matches next. The buffer retains tokens
//!     precisely so this rollback never replays the lexer.
//!
//!     Sub-rule calls go through `evaluate_in_substate`, which swaps the
//!     context's rule id and last-processed token and restores them
//!     afterwards. That save/restore is what lets the context reflect
//!     "where the parser currently is" for error messages without keeping a
//!     call stack of context clones.
//!
//!     Evaluation is single-threaded and strictly sequential. Left-recursive
//!     grammars recurse until stack exhaustion; avoiding them is the grammar
//!     author's responsibility.

use crate::buffer::TokenBuffer;
use crate::grammar::{Grammar, Rule, RuleId};
use crate::lexing::MultistateLexer;
use crate::parsing::builder::{Builder, NoopBuilder};
use crate::parsing::context::Context;
use crate::parsing::ir::{merge, ParseItem, RuleOutput};
use crate::parsing::options::{ParserOptions, StepInfo, StepInterceptor};
use crate::parsing::ParseError;

/// Result of one rule evaluation: `Ok(None)` is the match-failure sentinel.
pub type StepResult = Result<Option<RuleOutput>, ParseError>;

/// Parser engine: a grammar, a lexer, and the configuration tying them
/// together. The grammar and lexer are read-only after construction; each
/// `parse` call owns its buffer and context, so independent parses may run
/// on separate threads sharing one `Parser`.
pub struct Parser {
    grammar: Grammar,
    lexer: MultistateLexer,
    options: ParserOptions,
    builder: Box<dyn Builder>,
    interceptor: Option<Box<dyn StepInterceptor>>,
}

impl Parser {
    /// Build a parser with default options and the no-op passthrough
    /// builder (raw parse trees).
    pub fn new(grammar: Grammar, lexer: MultistateLexer) -> Self {
        Self {
            grammar,
            lexer,
            options: ParserOptions::default(),
            builder: Box::new(NoopBuilder),
            interceptor: None,
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_builder(mut self, builder: impl Builder + 'static) -> Self {
        self.builder = Box::new(builder);
        self
    }

    pub fn with_interceptor(mut self, interceptor: impl StepInterceptor + 'static) -> Self {
        self.interceptor = Some(Box::new(interceptor));
        self
    }

    /// Parse the source into a flat list of result items.
    ///
    /// Succeeds only if the initial rule matched and the cursor sits on the
    /// end-of-input token (unless trailing tokens are allowed). On failure
    /// the error references the furthest-advanced token across the whole
    /// attempt and up to three expected terminal names.
    pub fn parse(&self, source: &str) -> Result<Vec<ParseItem>, ParseError> {
        let stream = self.lexer.lex(source, 0);
        let mut buffer = self.options.buffer.build(stream).map_err(ParseError::from)?;

        let context = Context::new(
            self.options.initial_rule.clone(),
            buffer.current().clone(),
            self.options.options.clone(),
        );

        let mut evaluator = Evaluator {
            grammar: &self.grammar,
            builder: self.builder.as_ref(),
            interceptor: self.interceptor.as_deref(),
            buffer: buffer.as_mut(),
            context,
        };

        let result = evaluator.evaluate(&self.options.initial_rule)?;
        let consumed = self.options.allow_trailing
            || evaluator.buffer.current().name == self.options.eoi;

        match result {
            Some(output) if consumed => Ok(output.into_items()),
            _ => Err(ParseError::UnexpectedToken {
                token: evaluator.context.last_ordinal_token.clone(),
                expected: self
                    .grammar
                    .expected_terminals(&evaluator.context.state, 3),
            }),
        }
    }
}

/// Per-parse evaluation state: the context plus borrows of everything that
/// outlives the call.
struct Evaluator<'a, 'b> {
    grammar: &'a Grammar,
    builder: &'a dyn Builder,
    interceptor: Option<&'a dyn StepInterceptor>,
    buffer: &'a mut (dyn TokenBuffer + 'b),
    context: Context,
}

impl<'a, 'b> Evaluator<'a, 'b> {
    /// Evaluate one rule, routing through the step interceptor when one is
    /// configured.
    fn evaluate(&mut self, id: &RuleId) -> StepResult {
        match self.interceptor {
            Some(interceptor) => {
                let info = StepInfo {
                    state: id.clone(),
                    token: self.buffer.current().clone(),
                };
                interceptor.step(&info, &mut || self.evaluate_rule(id))
            }
            None => self.evaluate_rule(id),
        }
    }

    fn evaluate_rule(&mut self, id: &RuleId) -> StepResult {
        let rule = self.grammar.rule(id)?;
        self.context.current_rule = Some(rule.clone());

        let result = match rule {
            Rule::Lexeme { token, keep } => {
                let current = self.buffer.current().clone();
                if current.name == *token {
                    self.buffer.next()?;
                    let after = self.buffer.current();
                    if after.offset > self.context.last_ordinal_token.offset {
                        self.context.last_ordinal_token = after.clone();
                    }
                    if *keep {
                        Some(RuleOutput::Leaf(ParseItem::Token(current)))
                    } else {
                        Some(RuleOutput::empty())
                    }
                } else {
                    None
                }
            }

            Rule::Concatenation { sequence } => {
                let checkpoint = self.buffer.key();
                let mut children = Vec::new();
                let mut matched = true;
                for sub in sequence {
                    match self.evaluate_in_substate(sub)? {
                        Some(output) => merge(&mut children, output),
                        None => {
                            self.buffer.seek(checkpoint)?;
                            matched = false;
                            break;
                        }
                    }
                }
                matched.then(|| RuleOutput::List(children))
            }

            Rule::Alternation { sequence } => {
                let checkpoint = self.buffer.key();
                let mut winner = None;
                for sub in sequence {
                    if let Some(output) = self.evaluate_in_substate(sub)? {
                        winner = Some(output);
                        break;
                    }
                    self.buffer.seek(checkpoint)?;
                }
                winner
            }

            Rule::Optional { rule } => {
                let checkpoint = self.buffer.key();
                match self.evaluate_in_substate(rule)? {
                    Some(output) => Some(output),
                    None => {
                        self.buffer.seek(checkpoint)?;
                        Some(RuleOutput::empty())
                    }
                }
            }

            Rule::Repetition { rule, min, max } => {
                let checkpoint = self.buffer.key();
                let mut children = Vec::new();
                let mut count = 0usize;
                loop {
                    if max.map_or(false, |limit| count == limit) {
                        break Some(RuleOutput::List(children));
                    }
                    let attempt = self.buffer.key();
                    match self.evaluate_in_substate(rule)? {
                        Some(output) => {
                            merge(&mut children, output);
                            count += 1;
                        }
                        None => {
                            if count < *min {
                                self.buffer.seek(checkpoint)?;
                                break None;
                            }
                            self.buffer.seek(attempt)?;
                            break Some(RuleOutput::List(children));
                        }
                    }
                }
            }
        };

        match result {
            Some(output) => {
                let output = match self.builder.build(&self.context, &output) {
                    Some(node) => {
                        self.context.current_node = Some(node.clone());
                        RuleOutput::Leaf(ParseItem::Node(node))
                    }
                    None => output,
                };
                Ok(Some(output))
            }
            None => Ok(None),
        }
    }

    /// Evaluate a sub-rule with the context temporarily pointing at it,
    /// restoring the positional fields afterwards.
    fn evaluate_in_substate(&mut self, id: &RuleId) -> StepResult {
        let saved_state = std::mem::replace(&mut self.context.state, id.clone());
        let saved_rule = self.context.current_rule.take();
        let saved_token = std::mem::replace(
            &mut self.context.last_processed_token,
            self.buffer.current().clone(),
        );

        let result = self.evaluate(id);

        self.context.state = saved_state;
        self.context.current_rule = saved_rule;
        self.context.last_processed_token = saved_token;
        result
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::testing::{arithmetic_lexer, sum_grammar};

    fn token_values(items: &[ParseItem]) -> Vec<String> {
        items
            .iter()
            .map(|item| match item {
                ParseItem::Token(t) => t.value.clone(),
                ParseItem::Node(n) => n.name.clone(),
            })
            .collect()
    }

    #[test]
    fn test_alternation_first_match_wins_with_full_rollback() {
        // first = NUM NUM PLUS (fails on "1 2 3" after consuming two tokens)
        // second = NUM (must see the buffer exactly as it was)
        let mut rules = HashMap::new();
        rules.insert(
            RuleId::from("top"),
            Rule::Concatenation {
                sequence: vec!["alt".into(), "num".into(), "num".into()],
            },
        );
        rules.insert(
            RuleId::from("alt"),
            Rule::Alternation {
                sequence: vec!["first".into(), "num".into()],
            },
        );
        rules.insert(
            RuleId::from("first"),
            Rule::Concatenation {
                sequence: vec!["num".into(), "num".into(), "plus".into()],
            },
        );
        rules.insert(RuleId::from("num"), Rule::lexeme("T_NUMBER"));
        rules.insert(RuleId::from("plus"), Rule::lexeme("T_PLUS"));
        let grammar = Grammar::new(rules).unwrap();

        let parser = Parser::new(grammar, arithmetic_lexer())
            .with_options(ParserOptions::default().initial_rule("top"));

        // If the failed alternative's consumption leaked, the two trailing
        // nums would run off the end instead of matching "2" and "3".
        let items = parser.parse("1 2 3").expect("rollback must be invisible");
        assert_eq!(token_values(&items), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_repetition_below_min_fails() {
        let mut rules = HashMap::new();
        rules.insert(
            RuleId::from(0usize),
            Rule::Repetition {
                rule: 1usize.into(),
                min: 2,
                max: Some(3),
            },
        );
        rules.insert(RuleId::from(1usize), Rule::lexeme("T_NUMBER"));
        let grammar = Grammar::new(rules).unwrap();

        let parser = Parser::new(grammar, arithmetic_lexer());
        assert!(matches!(
            parser.parse("1"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_repetition_stops_at_max() {
        let mut rules = HashMap::new();
        rules.insert(
            RuleId::from(0usize),
            Rule::Repetition {
                rule: 1usize.into(),
                min: 2,
                max: Some(3),
            },
        );
        rules.insert(RuleId::from(1usize), Rule::lexeme("T_NUMBER"));
        let grammar = Grammar::new(rules).unwrap();

        // Four matches available: exactly three consumed, the fourth left.
        let strict = Parser::new(grammar.clone(), arithmetic_lexer());
        assert!(strict.parse("1 2 3 4").is_err(), "fourth token unconsumed");

        let lenient = Parser::new(grammar, arithmetic_lexer())
            .with_options(ParserOptions::default().allow_trailing(true));
        let items = lenient.parse("1 2 3 4").unwrap();
        assert_eq!(token_values(&items), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_optional_succeeds_empty_without_moving() {
        let mut rules = HashMap::new();
        rules.insert(
            RuleId::from("top"),
            Rule::Concatenation {
                sequence: vec!["maybe_plus".into(), "num".into()],
            },
        );
        rules.insert(
            RuleId::from("maybe_plus"),
            Rule::Optional {
                rule: "plus".into(),
            },
        );
        rules.insert(RuleId::from("plus"), Rule::lexeme("T_PLUS"));
        rules.insert(RuleId::from("num"), Rule::lexeme("T_NUMBER"));
        let grammar = Grammar::new(rules).unwrap();

        let parser = Parser::new(grammar, arithmetic_lexer())
            .with_options(ParserOptions::default().initial_rule("top"));

        assert_eq!(token_values(&parser.parse("+ 1").unwrap()), vec!["+", "1"]);
        assert_eq!(token_values(&parser.parse("1").unwrap()), vec!["1"]);
    }

    #[test]
    fn test_failure_reports_furthest_token_and_expected_names() {
        let parser = Parser::new(sum_grammar(), arithmetic_lexer())
            .with_options(ParserOptions::default().initial_rule("sum"));

        // "1 +" fails: after the plus, a number is required but EOI is next.
        let error = parser.parse("1 +").unwrap_err();
        match error {
            ParseError::UnexpectedToken { token, expected } => {
                assert_eq!(token.name, "T_EOI");
                assert!(expected.contains(&"T_NUMBER".to_string()));
            }
            other => panic!("expected UnexpectedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_interceptor_wraps_every_step() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Recorder(Rc<RefCell<Vec<String>>>);
        impl StepInterceptor for Recorder {
            fn step(
                &self,
                info: &StepInfo,
                next: &mut dyn FnMut() -> StepResult,
            ) -> StepResult {
                self.0.borrow_mut().push(info.state.to_string());
                next()
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let parser = Parser::new(sum_grammar(), arithmetic_lexer())
            .with_options(ParserOptions::default().initial_rule("sum"))
            .with_interceptor(Recorder(seen.clone()));

        parser.parse("1 + 2").unwrap();
        let seen = seen.borrow();
        assert!(seen.contains(&"sum".to_string()));
        assert!(seen.contains(&"number".to_string()));
        assert!(seen.len() > 3, "every sub-rule evaluation is wrapped");
    }

    #[test]
    fn test_unknown_rule_reference_is_fatal() {
        let mut rules = HashMap::new();
        rules.insert(
            RuleId::from(0usize),
            Rule::Optional {
                rule: 99usize.into(),
            },
        );
        let grammar = Grammar::new(rules).unwrap();

        let parser = Parser::new(grammar, arithmetic_lexer());
        assert!(matches!(
            parser.parse("1"),
            Err(ParseError::Grammar(_))
        ));
    }
}
