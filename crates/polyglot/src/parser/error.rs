//! Template parse and compile errors.

use thiserror::Error;

/// An error raised while parsing or compiling a message template.
///
/// The first three variants are syntactic and carry source positions; the
/// rest come from the compile step that binds filters against the registry.
/// All of them surface at pack construction for stored templates, so bad
/// templates fail before any message is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An unmatched `{` or `}`.
    #[error("unbalanced brace at line {line}, column {column}")]
    UnbalancedBrace { line: usize, column: usize },

    /// A backslash escaping a character that has no escape meaning.
    #[error("invalid escape sequence '\\{escaped}' at line {line}, column {column}")]
    InvalidEscape {
        escaped: char,
        line: usize,
        column: usize,
    },

    /// Anything else the grammar rejects.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// An argument head that is neither an index nor an identifier.
    #[error("invalid argument index '{token}'")]
    InvalidArgumentIndex { token: String },

    /// A reference head that is not a valid message path.
    #[error("invalid reference path '{token}'")]
    InvalidReferencePath { token: String },

    /// A filter name with no registry entry.
    #[error("unknown filter '{name}'")]
    UnknownFilter { name: String },

    /// A registered filter rejecting its argument list.
    #[error("invalid arguments for filter '{name}': {reason}")]
    InvalidFilterArguments { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntactic_errors_display_their_position() {
        insta::assert_snapshot!(
            ParseError::UnbalancedBrace { line: 2, column: 8 }.to_string(),
            @"unbalanced brace at line 2, column 8"
        );
        insta::assert_snapshot!(
            ParseError::InvalidEscape {
                escaped: 'n',
                line: 1,
                column: 5,
            }
            .to_string(),
            @r"invalid escape sequence '\n' at line 1, column 5"
        );
    }

    #[test]
    fn compile_errors_name_the_filter() {
        insta::assert_snapshot!(
            ParseError::UnknownFilter {
                name: "ordinal".to_string(),
            }
            .to_string(),
            @"unknown filter 'ordinal'"
        );
        insta::assert_snapshot!(
            ParseError::InvalidFilterArguments {
                name: "zero".to_string(),
                reason: "expected two arguments, got 1".to_string(),
            }
            .to_string(),
            @"invalid arguments for filter 'zero': expected two arguments, got 1"
        );
    }
}
