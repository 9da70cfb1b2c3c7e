//! Syntactic AST for message templates.
//!
//! This is the raw parse result: filter names are still plain strings and
//! argument heads are unclassified tokens. The compiler in `render` binds
//! filters against the registry and classifies heads into positional or
//! named arguments.

/// A parsed template: a sequence of literal and expression segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

/// A single template segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text with escapes already unescaped.
    Literal(String),
    /// An `{...}` or `${...}` expression.
    Expr(ExprNode),
}

/// An expression: a head token piped through zero or more filters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    /// Raw head token: an argument index, argument name, or reference path.
    pub head: String,
    pub filters: Vec<FilterNode>,
}

/// Whether the expression reads a message argument or another message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    /// `{head | ...}` reads from the argument list.
    Argument,
    /// `${head | ...}` resolves another message by path.
    Reference,
}

/// A single filter application in a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    pub name: String,
    pub args: Vec<ArgNode>,
}

/// A filter argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgNode {
    /// A bare whitespace-delimited token.
    Word(String),
    /// A `(...)` group: nested template text, possibly with expressions.
    Group(Template),
    /// A nested `{...}` or `${...}` expression.
    Expr(Box<ExprNode>),
}
