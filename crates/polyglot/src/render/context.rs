//! Evaluation contexts handed to the evaluator and to filters.

use std::collections::HashMap;

use crate::pack::PackCore;
use crate::render::error::RenderError;
use crate::render::evaluator;
use crate::render::expression::Expression;
use crate::types::{Locale, Path, Value};

/// Everything one render call needs: the pack, the requested locale, the
/// argument lists and the active path prefixes.
///
/// Contexts are cheap borrow bundles; rendering a render-time reference
/// derives a child context with an incremented depth, which is how reference
/// cycles are cut off.
pub struct RenderContext<'a> {
    pub(crate) pack: &'a PackCore,
    pub(crate) locale: &'a Locale,
    pub(crate) positional: &'a [Value],
    pub(crate) named: Option<&'a HashMap<String, Value>>,
    pub(crate) prefixes: &'a [Path],
    pub(crate) depth: usize,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(
        pack: &'a PackCore,
        locale: &'a Locale,
        positional: &'a [Value],
        named: Option<&'a HashMap<String, Value>>,
        prefixes: &'a [Path],
    ) -> Self {
        Self {
            pack,
            locale,
            positional,
            named,
            prefixes,
            depth: 0,
        }
    }

    /// The locale this message is being rendered for.
    pub fn locale(&self) -> &Locale {
        self.locale
    }

    pub(crate) fn positional_arg(&self, index: usize) -> Result<Value, RenderError> {
        self.positional
            .get(index)
            .cloned()
            .ok_or(RenderError::MissingArgument { index })
    }

    pub(crate) fn named_arg(&self, name: &str) -> Result<Value, RenderError> {
        self.named
            .and_then(|named| named.get(name))
            .cloned()
            .ok_or_else(|| RenderError::MissingNamedArgument {
                name: name.to_string(),
            })
    }

    /// A context one reference level deeper, sharing this one's arguments.
    pub(crate) fn descend(&self) -> RenderContext<'a> {
        RenderContext {
            pack: self.pack,
            locale: self.locale,
            positional: self.positional,
            named: self.named,
            prefixes: self.prefixes,
            depth: self.depth + 1,
        }
    }
}

/// The surface a [`Filter`](crate::filter::Filter) sees when applied.
///
/// Filter arguments arrive as unevaluated expressions; the resolve helpers
/// evaluate them on demand against the enclosing render context.
pub struct FilterContext<'a, 'r> {
    value: Value,
    args: &'a [Expression],
    ctx: &'a RenderContext<'r>,
}

impl<'a, 'r> FilterContext<'a, 'r> {
    pub(crate) fn new(value: Value, args: &'a [Expression], ctx: &'a RenderContext<'r>) -> Self {
        Self { value, args, ctx }
    }

    /// The value flowing through the filter pipeline.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn locale(&self) -> &Locale {
        self.ctx.locale
    }

    pub(crate) fn render(&self) -> &RenderContext<'r> {
        self.ctx
    }

    pub fn args(&self) -> &[Expression] {
        self.args
    }

    /// The filtered value as an integer.
    pub fn value_as_int(&self) -> Result<i64, RenderError> {
        self.value
            .as_int()
            .ok_or_else(|| RenderError::NumberExpected {
                value: self.value.to_string(),
            })
    }

    /// Evaluate one of the filter's own arguments.
    pub fn resolve(&self, arg: &Expression) -> Result<Value, RenderError> {
        evaluator::resolve(arg, self.ctx)
    }

    pub fn resolve_to_string(&self, arg: &Expression) -> Result<String, RenderError> {
        Ok(self.resolve(arg)?.to_string())
    }

    pub fn resolve_to_int(&self, arg: &Expression) -> Result<i64, RenderError> {
        let value = self.resolve(arg)?;
        value.as_int().ok_or_else(|| RenderError::NumberExpected {
            value: value.to_string(),
        })
    }
}
