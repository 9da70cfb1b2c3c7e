//! Expression tree evaluation.

use crate::render::context::{FilterContext, RenderContext};
use crate::render::error::RenderError;
use crate::render::expression::{ArgRef, CompiledTemplate, Expression, ExpressionFilter};
use crate::types::Value;

/// Evaluate a compiled template to its rendered text.
pub(crate) fn eval_template(
    template: &CompiledTemplate,
    ctx: &RenderContext<'_>,
) -> Result<String, RenderError> {
    match resolve(template.root(), ctx)? {
        Value::Str(text) => Ok(text),
        other => Ok(other.to_string()),
    }
}

/// Evaluate one expression to a value.
pub(crate) fn resolve(expr: &Expression, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
    match expr {
        Expression::Static(text) => Ok(Value::Str(text.clone())),
        Expression::Composite(parts) => {
            let mut out = String::new();
            for part in parts {
                match resolve(part, ctx)? {
                    Value::Str(text) => out.push_str(&text),
                    other => out.push_str(&other.to_string()),
                }
            }
            Ok(Value::Str(out))
        }
        Expression::Arg { arg, filters } => {
            let value = match arg {
                ArgRef::Index(index) => ctx.positional_arg(*index)?,
                ArgRef::Name(name) => ctx.named_arg(name)?,
            };
            let value = apply_filters(value, filters, ctx)?;
            format_value(value, ctx)
        }
        Expression::Reference { path, filters } => {
            let text = ctx.pack.resolve_reference(path, ctx)?;
            let value = apply_filters(Value::Str(text), filters, ctx)?;
            format_value(value, ctx)
        }
    }
}

fn apply_filters(
    value: Value,
    filters: &[ExpressionFilter],
    ctx: &RenderContext<'_>,
) -> Result<Value, RenderError> {
    let mut value = value;
    for filter in filters {
        value = filter
            .filter
            .apply(FilterContext::new(value, &filter.args, ctx))?;
    }
    Ok(value)
}

/// Run the typed-formatter dispatch over the filtered value.
///
/// Strings pass through untouched unless a formatter is registered for
/// them, so filter pipelines ending in text are not reformatted.
fn format_value(value: Value, ctx: &RenderContext<'_>) -> Result<Value, RenderError> {
    match ctx.pack.format_typed(ctx.locale, &value)? {
        Some(text) => Ok(Value::Str(text)),
        None => Ok(value),
    }
}
