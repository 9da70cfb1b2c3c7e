//! Template string parser using winnow.
//!
//! Parses message templates into a syntactic AST. Handles:
//! - Literal text segments
//! - Argument expressions: `{0}`, `{name | filter arg}`
//! - Reference expressions: `${some.path | filter}`
//! - Filter pipelines with word, `(...)` group and nested expression arguments
//! - Escape sequences: `\{` `\}` `\$` (plus `\(` `\)` inside groups)

use winnow::combinator::{alt, delimited, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{none_of, one_of, take_while};

use super::ast::{ArgNode, ExprKind, ExprNode, FilterNode, Segment, Template};
use super::error::ParseError;

/// Parse a template string into an AST.
pub fn parse_template(input: &str) -> Result<Template, ParseError> {
    let mut remaining = input;
    match template(&mut remaining) {
        Ok(t) if remaining.is_empty() => Ok(t),
        _ => Err(classify_error(input, remaining)),
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed - pos,
        None => consumed + 1,
    };
    (line, column)
}

/// Turn leftover input into the most specific parse error.
///
/// The grammar backtracks to the start of whatever it could not consume, so
/// the first leftover character tells us what went wrong: a backslash means
/// a bad escape, a stray `}` or an unclosed `{` means unbalanced braces, and
/// a balanced-but-unparseable expression gets a generic syntax error unless
/// it hides an invalid escape.
fn classify_error(original: &str, remaining: &str) -> ParseError {
    let (line, column) = calculate_position(original, remaining);
    let mut chars = remaining.chars();
    match chars.next() {
        Some('\\') => match chars.next() {
            Some(escaped) => ParseError::InvalidEscape {
                escaped,
                line,
                column,
            },
            None => ParseError::Syntax {
                line,
                column,
                message: "dangling escape at end of input".to_string(),
            },
        },
        Some('}') => ParseError::UnbalancedBrace { line, column },
        Some('{' | '$') => {
            if !has_balanced_braces(remaining) {
                return ParseError::UnbalancedBrace { line, column };
            }
            if let Some(error) = find_invalid_escape(original, remaining) {
                return error;
            }
            ParseError::Syntax {
                line,
                column,
                message: "malformed expression".to_string(),
            }
        }
        Some(c) => ParseError::Syntax {
            line,
            column,
            message: format!("unexpected character: '{c}'"),
        },
        None => ParseError::Syntax {
            line,
            column,
            message: "unexpected end of input".to_string(),
        },
    }
}

/// Whether the leading `{`/`${` expression has a matching close brace.
fn has_balanced_braces(text: &str) -> bool {
    let mut depth = 0usize;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let _ = chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Scan leftover text for an escape outside the supported set.
fn find_invalid_escape(original: &str, remaining: &str) -> Option<ParseError> {
    let base = original.len() - remaining.len();
    let mut chars = remaining.char_indices();
    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            continue;
        }
        let escaped = chars.next().map(|(_, c)| c)?;
        if !matches!(escaped, '$' | '{' | '}' | '(' | ')') {
            let consumed = &original[..base + offset];
            let line = consumed.chars().filter(|&c| c == '\n').count() + 1;
            let column = match consumed.rfind('\n') {
                Some(pos) => base + offset - pos,
                None => base + offset + 1,
            };
            return Some(ParseError::InvalidEscape {
                escaped,
                line,
                column,
            });
        }
    }
    None
}

/// Parse a complete template into segments.
fn template(input: &mut &str) -> ModalResult<Template> {
    let segments: Vec<Segment> = repeat(0.., segment).parse_next(input)?;
    Ok(Template {
        segments: merge_literals(segments),
    })
}

/// Merge adjacent Literal segments into single segments.
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Segment::Literal(text));
                }
            }
            other => result.push(other),
        }
    }
    result
}

/// Parse a single segment (escape, expression, or literal).
fn segment(input: &mut &str) -> ModalResult<Segment> {
    alt((
        escape_sequence,
        expression.map(Segment::Expr),
        literal_char,
    ))
    .parse_next(input)
}

/// Parse escape sequences: `\{` -> {, `\}` -> }, `\$` -> $
fn escape_sequence(input: &mut &str) -> ModalResult<Segment> {
    preceded('\\', one_of(['$', '{', '}']))
        .map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

/// Parse a single literal character (not `{`, `}` or `\`).
///
/// A bare `$` is literal text; only `${` opens a reference.
fn literal_char(input: &mut &str) -> ModalResult<Segment> {
    none_of(['{', '}', '\\'])
        .map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

/// Parse an expression: `{head | filters}` or `${head | filters}`.
fn expression(input: &mut &str) -> ModalResult<ExprNode> {
    alt((
        delimited("${", expression_content, '}')
            .map(|(head, filters)| ExprNode {
                kind: ExprKind::Reference,
                head,
                filters,
            }),
        delimited('{', expression_content, '}').map(|(head, filters)| ExprNode {
            kind: ExprKind::Argument,
            head,
            filters,
        }),
    ))
    .parse_next(input)
}

/// Parse the content inside an expression: head token plus filter pipeline.
fn expression_content(input: &mut &str) -> ModalResult<(String, Vec<FilterNode>)> {
    let _ = ws(input)?;
    let head: &str = word.parse_next(input)?;
    let filters: Vec<FilterNode> =
        repeat(0.., preceded((ws, '|', ws), filter)).parse_next(input)?;
    let _ = ws(input)?;
    Ok((head.to_string(), filters))
}

/// Parse one filter application: name plus whitespace-separated arguments.
fn filter(input: &mut &str) -> ModalResult<FilterNode> {
    let name: &str = word.parse_next(input)?;
    let args: Vec<ArgNode> = repeat(0.., preceded(ws1, filter_arg)).parse_next(input)?;
    Ok(FilterNode {
        name: name.to_string(),
        args,
    })
}

/// Parse a filter argument: nested expression, `(...)` group, or bare word.
fn filter_arg(input: &mut &str) -> ModalResult<ArgNode> {
    alt((
        expression.map(|e| ArgNode::Expr(Box::new(e))),
        delimited('(', group_body, ')').map(ArgNode::Group),
        word.map(|w: &str| ArgNode::Word(w.to_string())),
    ))
    .parse_next(input)
}

/// Parse the text inside a `(...)` group.
///
/// Groups hold template text, so expressions still work; parens and braces
/// must be escaped to appear literally.
fn group_body(input: &mut &str) -> ModalResult<Template> {
    let segments: Vec<Segment> = repeat(0.., group_piece).parse_next(input)?;
    Ok(Template {
        segments: merge_literals(segments),
    })
}

fn group_piece(input: &mut &str) -> ModalResult<Segment> {
    alt((
        group_escape,
        expression.map(Segment::Expr),
        group_literal_char,
    ))
    .parse_next(input)
}

/// Group escapes additionally cover `\(` and `\)`.
fn group_escape(input: &mut &str) -> ModalResult<Segment> {
    preceded('\\', one_of(['$', '{', '}', '(', ')']))
        .map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

fn group_literal_char(input: &mut &str) -> ModalResult<Segment> {
    none_of(['(', ')', '{', '}', '\\'])
        .map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

/// Parse optional whitespace.
fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

/// Parse required whitespace.
fn ws1(input: &mut &str) -> ModalResult<()> {
    take_while(1.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

/// Parse a bare token: anything up to whitespace or a metacharacter.
fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_word_char).parse_next(input)
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '|' | '{' | '}' | '(' | ')' | '\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(text: &str) -> Segment {
        Segment::Literal(text.to_string())
    }

    #[test]
    fn plain_text_is_one_literal() {
        let template = parse_template("Hello world").unwrap();
        assert_eq!(template.segments, vec![literal("Hello world")]);
    }

    #[test]
    fn unescapes_braces_and_dollar() {
        let template = parse_template(r"\{not an arg\} \$x").unwrap();
        assert_eq!(template.segments, vec![literal("{not an arg} $x")]);
    }

    #[test]
    fn bare_dollar_is_literal() {
        let template = parse_template("costs $5").unwrap();
        assert_eq!(template.segments, vec![literal("costs $5")]);
    }

    #[test]
    fn parses_argument_expression() {
        let template = parse_template("Hello {0}!").unwrap();
        assert_eq!(template.segments.len(), 3);
        let Segment::Expr(expr) = &template.segments[1] else {
            panic!("expected expression");
        };
        assert_eq!(expr.kind, ExprKind::Argument);
        assert_eq!(expr.head, "0");
        assert!(expr.filters.is_empty());
    }

    #[test]
    fn parses_reference_expression_with_filter() {
        let template = parse_template("${common.count | number}").unwrap();
        let Segment::Expr(expr) = &template.segments[0] else {
            panic!("expected expression");
        };
        assert_eq!(expr.kind, ExprKind::Reference);
        assert_eq!(expr.head, "common.count");
        assert_eq!(expr.filters.len(), 1);
        assert_eq!(expr.filters[0].name, "number");
    }

    #[test]
    fn parses_filter_pipeline_with_mixed_args() {
        let template = parse_template("{0 | interval 5 (a lot) {1} | zero none some}").unwrap();
        let Segment::Expr(expr) = &template.segments[0] else {
            panic!("expected expression");
        };
        assert_eq!(expr.filters.len(), 2);
        let interval = &expr.filters[0];
        assert_eq!(interval.name, "interval");
        assert_eq!(interval.args.len(), 3);
        assert_eq!(interval.args[0], ArgNode::Word("5".to_string()));
        assert!(matches!(interval.args[1], ArgNode::Group(_)));
        assert!(matches!(interval.args[2], ArgNode::Expr(_)));
        assert_eq!(expr.filters[1].args.len(), 2);
    }

    #[test]
    fn group_args_unescape_parens() {
        let template = parse_template(r"{0 | zero (\(none\)) some}").unwrap();
        let Segment::Expr(expr) = &template.segments[0] else {
            panic!("expected expression");
        };
        let ArgNode::Group(group) = &expr.filters[0].args[0] else {
            panic!("expected group");
        };
        assert_eq!(group.segments, vec![literal("(none)")]);
    }

    #[test]
    fn reports_unbalanced_braces() {
        assert!(matches!(
            parse_template("Hello {0"),
            Err(ParseError::UnbalancedBrace { .. })
        ));
        assert!(matches!(
            parse_template("Hello 0}"),
            Err(ParseError::UnbalancedBrace { .. })
        ));
    }

    #[test]
    fn reports_invalid_escape() {
        let error = parse_template(r"bad \n escape").unwrap_err();
        assert!(matches!(error, ParseError::InvalidEscape { escaped: 'n', .. }));
    }

    #[test]
    fn merges_adjacent_literals() {
        let template = parse_template(r"a\{b").unwrap();
        assert_eq!(template.segments, vec![literal("a{b")]);
    }
}
