//! Per-parse mutable state.
//!
//!     A context lives for exactly one top-level parse call. It records
//!     where the parser currently is (rule id, last token handed to a
//!     sub-rule), the furthest token the cursor has ever advanced past
//!     (`last_ordinal_token`, the error-reporting anchor), the most recently
//!     built node, and the caller-supplied option map. It is mutated
//!     destructively throughout evaluation; the engine saves and restores
//!     the positional fields around every sub-rule call.

use std::collections::HashMap;

use crate::grammar::{Rule, RuleId};
use crate::parsing::ir::Node;
use crate::token::Token;

/// Mutable per-parse state handed to the builder hook.
#[derive(Debug, Clone)]
pub struct Context {
    /// Id of the rule currently being evaluated.
    pub state: RuleId,

    /// The rule currently being evaluated.
    pub current_rule: Option<Rule>,

    /// The furthest-advanced token across the whole attempt, independent of
    /// which alternative ultimately won. This is what makes error messages
    /// point at the true failure site rather than wherever the last
    /// successful backtrack landed.
    pub last_ordinal_token: Token,

    /// The buffer token current when the enclosing sub-rule was entered.
    pub last_processed_token: Token,

    /// The most recently built node, if any.
    pub current_node: Option<Node>,

    /// Caller-supplied options, forwarded verbatim from the parser
    /// configuration.
    pub options: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create the context for one parse call, positioned on the first token.
    pub fn new(
        state: RuleId,
        first_token: Token,
        options: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            state,
            current_rule: None,
            last_ordinal_token: first_token.clone(),
            last_processed_token: first_token,
            current_node: None,
            options,
        }
    }

    /// Look up a caller-supplied option by name.
    pub fn option(&self, name: &str) -> Option<&serde_json::Value> {
        self.options.get(name)
    }
}
