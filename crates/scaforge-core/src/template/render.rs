//! Block parser and renderer.
//!
//! Consumes the flat token stream from the lexer, builds a node tree
//! (text | var | if-block), and walks it against a [`BindingContext`].

use serde_json::Value;

use super::expr::Expr;
use super::lexer::{Token, tokenize};
use super::{BindingContext, TemplateError};

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Var(String),
    If {
        cond: Expr,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

/// Render a template string against a context.
///
/// Deterministic and side-effect free; re-rendering with the same context
/// yields byte-identical output.
pub fn render(template: &str, ctx: &BindingContext) -> Result<String, TemplateError> {
    let tokens = tokenize(template)?;
    let mut stream = tokens.into_iter().peekable();
    let nodes = parse_nodes(&mut stream, 0)?;

    // parse_nodes at depth 0 only stops at end of input, so the stream is
    // fully consumed here.
    let mut out = String::with_capacity(template.len());
    render_nodes(&nodes, ctx, &mut out);
    Ok(out)
}

type TokenStream = std::iter::Peekable<std::vec::IntoIter<Token>>;

/// Parse a node sequence until the end of input (depth 0) or until a
/// block-closing token that belongs to the enclosing `#if` (depth > 0).
/// The closing token is left in the stream for the caller.
fn parse_nodes(stream: &mut TokenStream, depth: usize) -> Result<Vec<Node>, TemplateError> {
    let mut nodes = Vec::new();

    while let Some(token) = stream.peek() {
        match token {
            Token::Else | Token::IfClose if depth > 0 => break,
            Token::Else => {
                return Err(TemplateError::new(
                    "'{{else}}' outside of an '{{#if}}' block",
                ));
            }
            Token::IfClose => {
                return Err(TemplateError::new(
                    "'{{/if}}' without a matching '{{#if}}'",
                ));
            }
            _ => {}
        }

        match stream.next().expect("peeked") {
            Token::Text(text) => nodes.push(Node::Text(text)),
            Token::Var(path) => nodes.push(Node::Var(path)),
            Token::IfOpen(raw) => {
                let cond = Expr::parse(&raw)?;
                let then = parse_nodes(stream, depth + 1)?;

                let otherwise = match stream.next() {
                    Some(Token::Else) => {
                        let nodes = parse_nodes(stream, depth + 1)?;
                        match stream.next() {
                            Some(Token::IfClose) => nodes,
                            Some(Token::Else) => {
                                return Err(TemplateError::new(
                                    "duplicate '{{else}}' in '{{#if}}' block",
                                ));
                            }
                            _ => {
                                return Err(TemplateError::new(
                                    "'{{#if}}' block is missing its '{{/if}}'",
                                ));
                            }
                        }
                    }
                    Some(Token::IfClose) => Vec::new(),
                    _ => {
                        return Err(TemplateError::new(
                            "'{{#if}}' block is missing its '{{/if}}'",
                        ));
                    }
                };

                nodes.push(Node::If {
                    cond,
                    then,
                    otherwise,
                });
            }
            Token::Else | Token::IfClose => unreachable!("handled above"),
        }
    }

    Ok(nodes)
}

fn render_nodes(nodes: &[Node], ctx: &BindingContext, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(path) => out.push_str(&value_to_string(&ctx.lookup(path))),
            Node::If {
                cond,
                then,
                otherwise,
            } => {
                if cond.eval_bool(ctx) {
                    render_nodes(then, ctx, out);
                } else {
                    render_nodes(otherwise, ctx, out);
                }
            }
        }
    }
}

/// Interpolation formatting: null disappears, strings stay raw, everything
/// else uses its JSON form.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
