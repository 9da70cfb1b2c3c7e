//! Template parsing: winnow grammar and syntactic AST.

pub mod ast;
mod error;
mod template;

pub use error::ParseError;
pub use template::parse_template;
