//! Template compilation and evaluation.

pub(crate) mod compiler;
mod context;
mod error;
pub(crate) mod evaluator;
mod expression;

pub use context::{FilterContext, RenderContext};
pub use error::RenderError;
pub use expression::{ArgRef, CompiledTemplate, Expression, ExpressionFilter, UsedArgs};
