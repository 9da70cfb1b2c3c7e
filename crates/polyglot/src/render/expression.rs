//! Compiled expression trees.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::filter::Filter;
use crate::types::Path;

/// A compiled template expression.
///
/// This is a closed sum type; evaluation matches exhaustively over it, so a
/// new expression form is a compile error at every consumer until handled.
#[derive(Debug, Clone)]
pub enum Expression {
    /// Literal text, returned as-is.
    Static(String),
    /// Concatenation of sub-expressions.
    Composite(Vec<Expression>),
    /// A message argument piped through filters.
    Arg {
        arg: ArgRef,
        filters: Vec<ExpressionFilter>,
    },
    /// A render-time reference to another message, piped through filters.
    Reference {
        path: Path,
        filters: Vec<ExpressionFilter>,
    },
}

/// How an argument expression addresses the argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgRef {
    Index(usize),
    Name(String),
}

/// One bound filter application: the registry entry plus its compiled
/// argument expressions. Arguments stay unevaluated until the filter asks
/// for them, so branch filters only resolve the branch they pick.
#[derive(Clone)]
pub struct ExpressionFilter {
    pub name: String,
    pub filter: Arc<dyn Filter>,
    pub args: Vec<Expression>,
}

impl std::fmt::Debug for ExpressionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionFilter")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// The argument indexes and names a compiled template reads.
///
/// The argument resolver consults this to skip transforming arguments the
/// template never touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedArgs {
    pub indexes: BTreeSet<usize>,
    pub names: BTreeSet<String>,
}

impl UsedArgs {
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty() && self.names.is_empty()
    }
}

/// A parsed and bound template, ready to evaluate.
///
/// Equality and hashing use the raw source text; distinct keys holding the
/// same raw template share one compiled instance behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    raw: String,
    root: Expression,
    used: UsedArgs,
}

impl CompiledTemplate {
    pub(crate) fn new(raw: String, root: Expression, used: UsedArgs) -> Self {
        Self { raw, root, used }
    }

    /// The original template source.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub(crate) fn root(&self) -> &Expression {
        &self.root
    }

    pub fn used_args(&self) -> &UsedArgs {
        &self.used
    }
}

impl PartialEq for CompiledTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for CompiledTemplate {}

impl std::hash::Hash for CompiledTemplate {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}
