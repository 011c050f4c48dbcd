//! Grammar rules
//!
//!     A grammar is a map from rule ids to rule nodes. Rules reference each
//!     other by id, never by pointer, so the map forms a graph that may
//!     contain cycles (recursive rules are the normal case). The rule set is
//!     a closed algebra: one terminal variant and four production variants,
//!     matched exhaustively by the engine.
//!
//!     Rule ids are either dense integers or name strings; grammars may mix
//!     the two. The map is read-only after construction and may be shared
//!     across concurrent parses.
//!
//!     Left-recursive rules are a documented grammar-author responsibility:
//!     the engine recurses per rule reference, so a rule whose first
//!     reachable step is itself recurses until the stack is exhausted. No
//!     detector is provided.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one rule inside a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleId {
    /// Dense integer id.
    Index(usize),
    /// Name id.
    Name(String),
}

impl From<usize> for RuleId {
    fn from(index: usize) -> Self {
        RuleId::Index(index)
    }
}

impl From<&str> for RuleId {
    fn from(name: &str) -> Self {
        RuleId::Name(name.to_string())
    }
}

impl From<String> for RuleId {
    fn from(name: String) -> Self {
        RuleId::Name(name)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleId::Index(index) => write!(f, "#{}", index),
            RuleId::Name(name) => write!(f, "{}", name),
        }
    }
}

/// One node of the grammar: a terminal match or a composition of sub-rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    /// Matches exactly one buffer token by name. `keep = false` discards the
    /// matched token from the result (used for punctuation).
    Lexeme { token: String, keep: bool },

    /// All sub-rules must match in order; children merge into one flat list.
    Concatenation { sequence: Vec<RuleId> },

    /// First sub-rule to match wins; the buffer is rolled back between
    /// attempts.
    Alternation { sequence: Vec<RuleId> },

    /// Matches the sub-rule if possible, else succeeds with an empty result
    /// and no cursor movement.
    Optional { rule: RuleId },

    /// Matches the sub-rule repeatedly; succeeds iff the number of matches
    /// falls in `[min, max]` (`max = None` means unbounded). On success the
    /// cursor sits just past the last successful match.
    Repetition {
        rule: RuleId,
        min: usize,
        max: Option<usize>,
    },
}

impl Rule {
    /// Terminal that keeps the matched token in the result.
    pub fn lexeme(token: impl Into<String>) -> Self {
        Rule::Lexeme {
            token: token.into(),
            keep: true,
        }
    }

    /// Terminal whose matched token is discarded from the result.
    pub fn skipped_lexeme(token: impl Into<String>) -> Self {
        Rule::Lexeme {
            token: token.into(),
            keep: false,
        }
    }

    /// Ids of the sub-rules this rule references directly.
    fn references(&self) -> Vec<&RuleId> {
        match self {
            Rule::Lexeme { .. } => Vec::new(),
            Rule::Concatenation { sequence } | Rule::Alternation { sequence } => {
                sequence.iter().collect()
            }
            Rule::Optional { rule } => vec![rule],
            Rule::Repetition { rule, .. } => vec![rule],
        }
    }
}

/// Errors raised while constructing or consulting a grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum GrammarError {
    /// The rule map is empty; a grammar needs at least one entry.
    EmptyGrammar,
    /// A referenced rule id has no entry in the map.
    UnknownRule(RuleId),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::EmptyGrammar => write!(f, "Grammar contains no rules"),
            GrammarError::UnknownRule(id) => write!(f, "Grammar has no rule {}", id),
        }
    }
}

impl std::error::Error for GrammarError {}

/// Read-only rule graph, keyed by rule id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grammar {
    rules: HashMap<RuleId, Rule>,
}

impl Grammar {
    /// Wrap a rule map. Empty grammars are a construction-time error.
    pub fn new(rules: HashMap<RuleId, Rule>) -> Result<Self, GrammarError> {
        if rules.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }
        Ok(Self { rules })
    }

    /// Look up a rule by id.
    pub fn rule(&self, id: &RuleId) -> Result<&Rule, GrammarError> {
        self.rules
            .get(id)
            .ok_or_else(|| GrammarError::UnknownRule(id.clone()))
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// A grammar is never empty; construction rejects empty rule maps.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Collect up to `limit` distinct terminal token names reachable from
    /// `id`, in preorder. Cycle-safe; used for "expected ..." error messages.
    pub fn expected_terminals(&self, id: &RuleId, limit: usize) -> Vec<String> {
        let mut expected = Vec::new();
        let mut visited = HashSet::new();
        let mut pending = vec![id.clone()];

        while let Some(current) = pending.pop() {
            if expected.len() >= limit || !visited.insert(current.clone()) {
                continue;
            }
            let Some(rule) = self.rules.get(&current) else {
                continue;
            };
            match rule {
                Rule::Lexeme { token, .. } => {
                    if !expected.contains(token) {
                        expected.push(token.clone());
                    }
                }
                _ => {
                    // Push in reverse so the leftmost reference is walked first.
                    for reference in rule.references().into_iter().rev() {
                        pending.push(reference.clone());
                    }
                }
            }
        }

        expected.truncate(limit);
        expected
    }
}
