//! Parser configuration.

use std::collections::HashMap;

use crate::buffer::BufferKind;
use crate::grammar::RuleId;
use crate::parsing::engine::StepResult;
use crate::token::{Token, END_OF_INPUT};

/// Recognized parser options.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Rule to start evaluation at.
    pub initial_rule: RuleId,

    /// Token-buffer strategy.
    pub buffer: BufferKind,

    /// Name of the end-of-input token the lexer terminates with.
    pub eoi: String,

    /// Accept a successful match that leaves tokens unconsumed. This changes
    /// the completion criterion, not the failure criterion.
    pub allow_trailing: bool,

    /// Caller-supplied options forwarded into the parse context.
    pub options: HashMap<String, serde_json::Value>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            initial_rule: RuleId::Index(0),
            buffer: BufferKind::default(),
            eoi: END_OF_INPUT.to_string(),
            allow_trailing: false,
            options: HashMap::new(),
        }
    }
}

impl ParserOptions {
    pub fn initial_rule(mut self, id: impl Into<RuleId>) -> Self {
        self.initial_rule = id.into();
        self
    }

    pub fn buffer(mut self, kind: BufferKind) -> Self {
        self.buffer = kind;
        self
    }

    pub fn eoi(mut self, name: impl Into<String>) -> Self {
        self.eoi = name.into();
        self
    }

    pub fn allow_trailing(mut self, allow: bool) -> Self {
        self.allow_trailing = allow;
        self
    }

    pub fn option(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(name.into(), value);
        self
    }
}

/// Snapshot of where the parser is when an interceptor fires.
#[derive(Debug, Clone)]
pub struct StepInfo {
    /// Id of the rule about to be evaluated.
    pub state: RuleId,

    /// The buffer token at the cursor.
    pub token: Token,
}

/// Wraps every rule evaluation, for debugging and tracing.
///
/// Implementations must call `next()` to continue normal evaluation; not
/// calling it makes the wrapped rule evaluate to whatever the interceptor
/// returns instead.
pub trait StepInterceptor {
    fn step(&self, info: &StepInfo, next: &mut dyn FnMut() -> StepResult) -> StepResult;
}
