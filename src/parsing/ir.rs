//! Intermediate parse results.
//!
//!     Rule evaluation produces opaque result values: tokens kept by
//!     terminals, and nodes produced by the builder hook. Composite rules
//!     merge sub-results into one flat child list — a sub-result that is a
//!     list splices into the parent's children, a single token/node appends
//!     as one child. This flattening is what presents a uniform child list
//!     to the builder regardless of how deeply nested the grammar's
//!     sub-rules are.

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// An application AST node assembled by the builder hook.
///
/// The engine treats nodes as opaque; `name` and `children` are whatever the
/// builder chose to record. A raw parse (no builder) contains only tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Application-assigned node kind.
    pub name: String,

    /// Byte offset of the node's first token.
    pub offset: usize,

    /// Flat list of child results, in match order.
    pub children: Vec<ParseItem>,
}

impl Node {
    pub fn new(name: impl Into<String>, offset: usize, children: Vec<ParseItem>) -> Self {
        Self {
            name: name.into(),
            offset,
            children,
        }
    }
}

/// One child in a parse result: a kept token or a built node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParseItem {
    Token(Token),
    Node(Node),
}

impl ParseItem {
    /// Byte offset either kind carries.
    pub fn offset(&self) -> usize {
        match self {
            ParseItem::Token(token) => token.offset,
            ParseItem::Node(node) => node.offset,
        }
    }
}

/// The raw result of one successful rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutput {
    /// A single token or node.
    Leaf(ParseItem),
    /// A (possibly empty) list of children.
    List(Vec<ParseItem>),
}

impl RuleOutput {
    /// The empty result used by discarded terminals and empty optionals.
    pub fn empty() -> Self {
        RuleOutput::List(Vec::new())
    }

    /// Flatten into a plain child list.
    pub fn into_items(self) -> Vec<ParseItem> {
        match self {
            RuleOutput::Leaf(item) => vec![item],
            RuleOutput::List(items) => items,
        }
    }

    /// Byte offset of the first item, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            RuleOutput::Leaf(item) => Some(item.offset()),
            RuleOutput::List(items) => items.first().map(ParseItem::offset),
        }
    }
}

/// Splice a sub-result into a parent's child list: lists splice, leaves
/// append as one child.
pub fn merge(children: &mut Vec<ParseItem>, output: RuleOutput) {
    match output {
        RuleOutput::Leaf(item) => children.push(item),
        RuleOutput::List(items) => children.extend(items),
    }
}
