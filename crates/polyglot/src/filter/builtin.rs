//! Built-in branch-selection filters.

use std::sync::Arc;

use crate::filter::{Filter, FilterRegistry};
use crate::render::{Expression, FilterContext, RenderError};
use crate::types::Value;

/// The registry of built-in filters: `interval`, `zero`, `nzp`, `plural`.
pub fn default_filters() -> FilterRegistry {
    let mut registry = FilterRegistry::new();
    registry.insert("interval", Arc::new(IntervalFilter));
    registry.insert("zero", Arc::new(ZeroFilter));
    registry.insert("nzp", Arc::new(NzpFilter));
    registry.insert("plural", Arc::new(PluralFilter));
    registry
}

/// The literal integer behind a static expression, if any.
fn static_int(expr: &Expression) -> Option<Option<i64>> {
    match expr {
        Expression::Static(text) => Some(text.parse().ok()),
        _ => None,
    }
}

/// `{0 | interval 0 low 5 mid 10 high}`
///
/// Arguments are `boundary label` pairs with strictly increasing boundaries.
/// The value picks the label of the last boundary at or below it; values
/// below the first boundary get the first label. Boundaries may themselves
/// be expressions; literal ones are checked at compile time, the rest when
/// the filter runs.
struct IntervalFilter;

impl Filter for IntervalFilter {
    fn validate(&self, args: &[Expression]) -> Result<(), String> {
        if args.len() < 2 || args.len() % 2 != 0 {
            return Err("expected boundary/label pairs".to_string());
        }
        let mut previous: Option<i64> = None;
        for boundary in args.iter().step_by(2) {
            let Some(literal) = static_int(boundary) else {
                // Dynamic boundary: checked at render time.
                previous = None;
                continue;
            };
            let Some(value) = literal else {
                return Err("boundaries must be integers".to_string());
            };
            if previous.is_some_and(|p| p >= value) {
                return Err("boundaries must be strictly increasing".to_string());
            }
            previous = Some(value);
        }
        Ok(())
    }

    fn apply(&self, ctx: FilterContext<'_, '_>) -> Result<Value, RenderError> {
        let value = ctx.value_as_int()?;
        let args = ctx.args();
        let mut selected = &args[1];
        let mut previous: Option<i64> = None;
        for pair in args.chunks_exact(2) {
            let boundary = ctx.resolve_to_int(&pair[0])?;
            if previous.is_some_and(|p| p >= boundary) {
                return Err(RenderError::InvalidFilterArguments {
                    name: "interval".to_string(),
                    reason: "boundaries must be strictly increasing".to_string(),
                });
            }
            previous = Some(boundary);
            if boundary <= value {
                selected = &pair[1];
            }
        }
        Ok(Value::Str(ctx.resolve_to_string(selected)?))
    }
}

/// `{0 | zero (no messages) ({0} messages)}`
///
/// Two arguments: the zero branch and the non-zero branch.
struct ZeroFilter;

impl Filter for ZeroFilter {
    fn validate(&self, args: &[Expression]) -> Result<(), String> {
        if args.len() != 2 {
            return Err(format!("expected 2 arguments, got {}", args.len()));
        }
        Ok(())
    }

    fn apply(&self, ctx: FilterContext<'_, '_>) -> Result<Value, RenderError> {
        let value = numeric(&ctx)?;
        let branch = if value == 0.0 { 0 } else { 1 };
        Ok(Value::Str(ctx.resolve_to_string(&ctx.args()[branch])?))
    }
}

/// `{0 | nzp (in the red) (break even) (in the black)}`
///
/// Three arguments selected by sign: negative, zero, positive.
struct NzpFilter;

impl Filter for NzpFilter {
    fn validate(&self, args: &[Expression]) -> Result<(), String> {
        if args.len() != 3 {
            return Err(format!("expected 3 arguments, got {}", args.len()));
        }
        Ok(())
    }

    fn apply(&self, ctx: FilterContext<'_, '_>) -> Result<Value, RenderError> {
        let value = numeric(&ctx)?;
        let branch = if value < 0.0 {
            0
        } else if value == 0.0 {
            1
        } else {
            2
        };
        Ok(Value::Str(ctx.resolve_to_string(&ctx.args()[branch])?))
    }
}

/// `{0 | plural (no items) 1 (one item) 2 ({0} items)}`
///
/// Labels separated by literal integer boundaries: label `i` covers values
/// from the boundary on its left (inclusive, open at the low end for the
/// first label) up to the boundary on its right (exclusive).
struct PluralFilter;

impl Filter for PluralFilter {
    fn validate(&self, args: &[Expression]) -> Result<(), String> {
        if args.is_empty() || args.len() % 2 == 0 {
            return Err("expected labels separated by boundaries".to_string());
        }
        let mut previous: Option<i64> = None;
        for boundary in args.iter().skip(1).step_by(2) {
            let Some(value) = static_int(boundary).flatten() else {
                return Err("boundaries must be literal integers".to_string());
            };
            if previous.is_some_and(|p| p >= value) {
                return Err("boundaries must be strictly increasing".to_string());
            }
            previous = Some(value);
        }
        Ok(())
    }

    fn apply(&self, ctx: FilterContext<'_, '_>) -> Result<Value, RenderError> {
        let value = ctx.value_as_int()?;
        let args = ctx.args();
        let mut selected = &args[0];
        for pair in args[1..].chunks_exact(2) {
            let boundary = ctx.resolve_to_int(&pair[0])?;
            if boundary > value {
                break;
            }
            selected = &pair[1];
        }
        Ok(Value::Str(ctx.resolve_to_string(selected)?))
    }
}

fn numeric(ctx: &FilterContext<'_, '_>) -> Result<f64, RenderError> {
    ctx.value()
        .as_float()
        .ok_or_else(|| RenderError::NumberExpected {
            value: ctx.value().to_string(),
        })
}
