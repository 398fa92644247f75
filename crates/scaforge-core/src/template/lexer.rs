//! Template tokenizer.
//!
//! Splits a template string into a flat token stream.  Block structure
//! (`#if`/`else`/`/if` nesting) is resolved later by the parser in
//! `render.rs`; the lexer only recognises tag boundaries.

use super::TemplateError;

/// One lexed unit of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// Literal text between tags.
    Text(String),
    /// `{{dotted.path}}` interpolation.
    Var(String),
    /// `{{#if <expr>}}` with the raw expression text.
    IfOpen(String),
    /// `{{else}}`
    Else,
    /// `{{/if}}`
    IfClose,
}

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Tokenize a template.
///
/// Fails on an unterminated `{{` tag or an interpolation tag that is not a
/// plain dotted path (calls belong inside `{{#if …}}` guards).
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find(OPEN) {
        if start > 0 {
            tokens.push(Token::Text(rest[..start].to_string()));
        }
        let after_open = &rest[start + OPEN.len()..];
        let end = after_open.find(CLOSE).ok_or_else(|| {
            TemplateError::new(format!(
                "unterminated '{{{{' tag near \"{}\"",
                snippet(after_open)
            ))
        })?;

        let inner = after_open[..end].trim();
        tokens.push(classify(inner)?);
        rest = &after_open[end + CLOSE.len()..];
    }

    if !rest.is_empty() {
        tokens.push(Token::Text(rest.to_string()));
    }
    Ok(tokens)
}

fn classify(inner: &str) -> Result<Token, TemplateError> {
    if let Some(expr) = inner.strip_prefix("#if") {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err(TemplateError::new("'#if' block is missing a condition"));
        }
        return Ok(Token::IfOpen(expr.to_string()));
    }
    match inner {
        "else" => Ok(Token::Else),
        "/if" => Ok(Token::IfClose),
        "" => Err(TemplateError::new("empty '{{}}' tag")),
        path if is_dotted_path(path) => Ok(Token::Var(path.to_string())),
        other => Err(TemplateError::new(format!(
            "invalid interpolation tag '{{{{{other}}}}}'; expected a dotted path"
        ))),
    }
}

fn is_dotted_path(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|seg| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}

fn snippet(s: &str) -> &str {
    let end = s
        .char_indices()
        .nth(20)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[..end]
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_token() {
        assert_eq!(
            tokenize("hello world").unwrap(),
            vec![Token::Text("hello world".into())]
        );
    }

    #[test]
    fn variables_and_text_interleave() {
        let tokens = tokenize("db: {{options.provider}}!").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("db: ".into()),
                Token::Var("options.provider".into()),
                Token::Text("!".into()),
            ]
        );
    }

    #[test]
    fn block_markers_are_recognised() {
        let tokens = tokenize("{{#if hasPlugin('auth')}}a{{else}}b{{/if}}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::IfOpen("hasPlugin('auth')".into()),
                Token::Text("a".into()),
                Token::Else,
                Token::Text("b".into()),
                Token::IfClose,
            ]
        );
    }

    #[test]
    fn inner_whitespace_is_trimmed() {
        let tokens = tokenize("{{  config.name  }}").unwrap();
        assert_eq!(tokens, vec![Token::Var("config.name".into())]);
    }

    #[test]
    fn unterminated_tag_fails() {
        let err = tokenize("before {{options.x").unwrap_err();
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn empty_tag_fails() {
        assert!(tokenize("{{}}").is_err());
        assert!(tokenize("{{   }}").is_err());
    }

    #[test]
    fn call_outside_if_guard_fails() {
        let err = tokenize("{{eq(a, b)}}").unwrap_err();
        assert!(err.message.contains("dotted path"));
    }

    #[test]
    fn missing_if_condition_fails() {
        let err = tokenize("{{#if }}x{{/if}}").unwrap_err();
        assert!(err.message.contains("condition"));
    }
}
