//! Builder hook: turning raw rule output into application AST nodes.
//!
//!     The builder is invoked once per successful rule evaluation with the
//!     parse context and the raw result (kept tokens and previously built
//!     nodes). Returning a node replaces the raw result; returning `None`
//!     leaves the raw children as they are, which is itself a valid,
//!     buildable tree for callers that want raw parse trees.

use crate::parsing::context::Context;
use crate::parsing::ir::{Node, RuleOutput};

/// Caller-supplied hook assembling AST nodes from matched rule output.
pub trait Builder {
    /// Build a node for the rule identified by `context.state`, or return
    /// `None` to keep the raw result.
    fn build(&self, context: &Context, result: &RuleOutput) -> Option<Node>;
}

/// Explicit passthrough default: never replaces anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBuilder;

impl Builder for NoopBuilder {
    fn build(&self, _context: &Context, _result: &RuleOutput) -> Option<Node> {
        None
    }
}

impl<F> Builder for F
where
    F: Fn(&Context, &RuleOutput) -> Option<Node>,
{
    fn build(&self, context: &Context, result: &RuleOutput) -> Option<Node> {
        self(context, result)
    }
}
