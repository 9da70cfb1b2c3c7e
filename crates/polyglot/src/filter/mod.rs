//! Filters: named value transformations inside expressions.

pub mod builtin;

use std::collections::HashMap;
use std::sync::Arc;

use crate::render::{Expression, FilterContext, RenderError};
use crate::types::Value;

/// A named transformation applicable inside a filter pipeline.
///
/// Filters see their arguments as unevaluated expressions and resolve only
/// what they need through the context, so `{0 | zero (no items) ({0} items)}`
/// evaluates a single branch.
pub trait Filter: Send + Sync {
    /// Check the argument shape when the template compiles.
    ///
    /// The returned reason becomes
    /// [`ParseError::InvalidFilterArguments`](crate::parser::ParseError).
    fn validate(&self, args: &[Expression]) -> Result<(), String> {
        let _ = args;
        Ok(())
    }

    /// Transform the piped value.
    fn apply(&self, ctx: FilterContext<'_, '_>) -> Result<Value, RenderError>;
}

/// Name-keyed filter lookup used while compiling templates.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    entries: HashMap<String, Arc<dyn Filter>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter, replacing any previous entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, filter: Arc<dyn Filter>) {
        self.entries.insert(name.into(), filter);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Filter>> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}
