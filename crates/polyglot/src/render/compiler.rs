//! Lowering from the syntactic AST to bound expression trees.
//!
//! Compilation is where the fail-fast checks live: filter names must exist
//! in the registry, filters get to validate their argument shape, argument
//! heads must be indexes or identifiers, and reference heads must be valid
//! paths. Stored templates go through this at pack construction, so none of
//! these errors can surface during rendering.

use crate::filter::FilterRegistry;
use crate::parser::ast::{ArgNode, ExprKind, ExprNode, FilterNode, Segment, Template};
use crate::parser::{ParseError, parse_template};
use crate::render::expression::{
    ArgRef, CompiledTemplate, Expression, ExpressionFilter, UsedArgs,
};
use crate::types::Path;

pub(crate) struct Compiler<'a> {
    filters: &'a FilterRegistry,
}

impl<'a> Compiler<'a> {
    pub fn new(filters: &'a FilterRegistry) -> Self {
        Self { filters }
    }

    /// Parse and bind a raw template.
    pub fn compile(&self, raw: &str) -> Result<CompiledTemplate, ParseError> {
        let ast = parse_template(raw)?;
        let root = self.lower_template(&ast)?;
        let mut used = UsedArgs::default();
        collect_used_args(&root, &mut used);
        Ok(CompiledTemplate::new(raw.to_string(), root, used))
    }

    fn lower_template(&self, template: &Template) -> Result<Expression, ParseError> {
        let mut parts = Vec::with_capacity(template.segments.len());
        for segment in &template.segments {
            match segment {
                Segment::Literal(text) => parts.push(Expression::Static(text.clone())),
                Segment::Expr(expr) => parts.push(self.lower_expr(expr)?),
            }
        }
        Ok(flatten(parts))
    }

    fn lower_expr(&self, expr: &ExprNode) -> Result<Expression, ParseError> {
        let filters = expr
            .filters
            .iter()
            .map(|f| self.lower_filter(f))
            .collect::<Result<Vec<_>, _>>()?;
        match expr.kind {
            ExprKind::Argument => Ok(Expression::Arg {
                arg: classify_head(&expr.head)?,
                filters,
            }),
            ExprKind::Reference => {
                let path =
                    Path::parse(&expr.head).map_err(|_| ParseError::InvalidReferencePath {
                        token: expr.head.clone(),
                    })?;
                Ok(Expression::Reference { path, filters })
            }
        }
    }

    fn lower_filter(&self, node: &FilterNode) -> Result<ExpressionFilter, ParseError> {
        let filter = self
            .filters
            .get(&node.name)
            .ok_or_else(|| ParseError::UnknownFilter {
                name: node.name.clone(),
            })?;
        let args = node
            .args
            .iter()
            .map(|arg| self.lower_arg(arg))
            .collect::<Result<Vec<_>, _>>()?;
        filter
            .validate(&args)
            .map_err(|reason| ParseError::InvalidFilterArguments {
                name: node.name.clone(),
                reason,
            })?;
        Ok(ExpressionFilter {
            name: node.name.clone(),
            filter,
            args,
        })
    }

    fn lower_arg(&self, arg: &ArgNode) -> Result<Expression, ParseError> {
        match arg {
            ArgNode::Word(word) => Ok(Expression::Static(word.clone())),
            ArgNode::Group(template) => self.lower_template(template),
            ArgNode::Expr(expr) => self.lower_expr(expr),
        }
    }
}

/// Classify an argument head as a positional index or a name.
fn classify_head(head: &str) -> Result<ArgRef, ParseError> {
    let invalid = || ParseError::InvalidArgumentIndex {
        token: head.to_string(),
    };
    let mut chars = head.chars();
    let first = chars.next().ok_or_else(invalid)?;
    if first.is_ascii_digit() {
        return head.parse().map(ArgRef::Index).map_err(|_| invalid());
    }
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(invalid());
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid());
    }
    Ok(ArgRef::Name(head.to_string()))
}

/// Collapse a segment list into the smallest equivalent expression.
fn flatten(mut parts: Vec<Expression>) -> Expression {
    match parts.len() {
        0 => Expression::Static(String::new()),
        1 => parts.remove(0),
        _ => Expression::Composite(parts),
    }
}

fn collect_used_args(expr: &Expression, used: &mut UsedArgs) {
    match expr {
        Expression::Static(_) => {}
        Expression::Composite(parts) => {
            for part in parts {
                collect_used_args(part, used);
            }
        }
        Expression::Arg { arg, filters } => {
            match arg {
                ArgRef::Index(index) => {
                    used.indexes.insert(*index);
                }
                ArgRef::Name(name) => {
                    used.names.insert(name.clone());
                }
            }
            collect_filter_args(filters, used);
        }
        Expression::Reference { filters, .. } => collect_filter_args(filters, used),
    }
}

fn collect_filter_args(filters: &[ExpressionFilter], used: &mut UsedArgs) {
    for filter in filters {
        for arg in &filter.args {
            collect_used_args(arg, used);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::builtin;

    fn compiler_registry() -> FilterRegistry {
        builtin::default_filters()
    }

    #[test]
    fn compiles_positional_and_named_heads() {
        let registry = compiler_registry();
        let compiler = Compiler::new(&registry);
        let template = compiler.compile("{0} {count} {_x}").unwrap();
        let used = template.used_args();
        assert!(used.indexes.contains(&0));
        assert!(used.names.contains("count"));
        assert!(used.names.contains("_x"));
    }

    #[test]
    fn rejects_malformed_heads() {
        let registry = compiler_registry();
        let compiler = Compiler::new(&registry);
        assert!(matches!(
            compiler.compile("{0x}"),
            Err(ParseError::InvalidArgumentIndex { .. })
        ));
        assert!(matches!(
            compiler.compile("{9999999999999999999999}"),
            Err(ParseError::InvalidArgumentIndex { .. })
        ));
    }

    #[test]
    fn rejects_unknown_filters() {
        let registry = compiler_registry();
        let compiler = Compiler::new(&registry);
        let error = compiler.compile("{0 | frobnicate}").unwrap_err();
        assert_eq!(
            error,
            ParseError::UnknownFilter {
                name: "frobnicate".to_string()
            }
        );
    }

    #[test]
    fn filters_validate_arity_at_compile_time() {
        let registry = compiler_registry();
        let compiler = Compiler::new(&registry);
        assert!(matches!(
            compiler.compile("{0 | zero only_one_arg}"),
            Err(ParseError::InvalidFilterArguments { .. })
        ));
    }

    #[test]
    fn collects_args_from_filter_arguments() {
        let registry = compiler_registry();
        let compiler = Compiler::new(&registry);
        let template = compiler.compile("{0 | zero {1} {2}}").unwrap();
        let used = template.used_args();
        assert_eq!(used.indexes.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
