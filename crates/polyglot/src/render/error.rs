//! Message rendering errors.

use thiserror::Error;

use crate::format::FormatError;
use crate::parser::ParseError;
use crate::types::{Key, Path, PathError, ValueKind};

/// An error raised while rendering a message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// A template read a positional argument that was not supplied.
    #[error("missing argument {{{index}}}")]
    MissingArgument { index: usize },

    /// A template read a named argument that was not supplied.
    #[error("missing argument {{{name}}}")]
    MissingNamedArgument { name: String },

    /// No template found for the key or any of its fallback candidates.
    ///
    /// Only surfaces under [`UnresolvedMessagePolicy::Fail`]; the path-echo
    /// policy swallows it.
    ///
    /// [`UnresolvedMessagePolicy::Fail`]: crate::pack::UnresolvedMessagePolicy
    #[error("unresolved message {key}{args}")]
    UnresolvedMessage { key: Key, args: String },

    /// A render-time `${...}` reference to a message that does not exist.
    #[error("missing reference '{path}'")]
    MissingReference { path: Path },

    /// Render-time references nested past the configured ceiling.
    #[error("reference '{path}' nested deeper than {limit} levels")]
    MaxReferenceDepth { path: Path, limit: usize },

    /// An argument transform chain that did not stabilize.
    #[error("argument transform chain for {kind} value did not stabilize")]
    TooManyTransformations { kind: ValueKind },

    /// A filter rejecting its resolved arguments at render time.
    #[error("invalid arguments for filter '{name}': {reason}")]
    InvalidFilterArguments { name: String, reason: String },

    /// A numeric filter applied to a non-numeric value.
    #[error("expected a numeric value, got '{value}'")]
    NumberExpected { value: String },

    /// A request naming a malformed path.
    #[error(transparent)]
    Path(#[from] PathError),

    /// An ad hoc template that failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A formatter that could not be built or applied.
    #[error(transparent)]
    Format(#[from] FormatError),
}
