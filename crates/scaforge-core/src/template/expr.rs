//! Boolean expression grammar for `{{#if …}}` guards.
//!
//! A minimal AST (literal | path | helper call) with a recursive-descent
//! parser.  The helper set is closed on purpose — `eq`, `and`, `or`,
//! `hasPlugin` — so it can be exhaustively tested.  Arity and helper names
//! are checked at parse time, which keeps evaluation infallible.

use serde_json::Value;

use super::{BindingContext, TemplateError, truthy};

/// The closed helper set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    /// Structural equality of two values.
    Eq,
    /// All arguments truthy.
    And,
    /// Any argument truthy.
    Or,
    /// Membership in the installed-plugin set.
    HasPlugin,
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Path(String),
    Call { helper: Helper, args: Vec<Expr> },
}

impl Expr {
    /// Parse an expression from the raw text of an `#if` guard.
    pub fn parse(input: &str) -> Result<Self, TemplateError> {
        let mut cursor = Cursor::new(input);
        let expr = cursor.parse_expr()?;
        cursor.skip_ws();
        if !cursor.at_end() {
            return Err(TemplateError::new(format!(
                "unexpected trailing input in expression '{input}'"
            )));
        }
        Ok(expr)
    }

    /// Evaluate against a context.  Infallible: parse already rejected
    /// unknown helpers and bad arity, and missing paths resolve to null.
    pub fn eval(&self, ctx: &BindingContext) -> Value {
        match self {
            Self::Literal(v) => v.clone(),
            Self::Path(p) => ctx.lookup(p),
            Self::Call { helper, args } => match helper {
                Helper::Eq => Value::Bool(values_equal(&args[0].eval(ctx), &args[1].eval(ctx))),
                Helper::And => Value::Bool(args.iter().all(|a| truthy(&a.eval(ctx)))),
                Helper::Or => Value::Bool(args.iter().any(|a| truthy(&a.eval(ctx)))),
                Helper::HasPlugin => Value::Bool(ctx.has_plugin(&plugin_name(&args[0], ctx))),
            },
        }
    }

    /// Evaluate and collapse to a boolean via the truthiness rules.
    pub fn eval_bool(&self, ctx: &BindingContext) -> bool {
        truthy(&self.eval(ctx))
    }
}

/// `eq` compares structurally, but numbers compare numerically so that
/// `eq(options.count, 2)` holds whether the stored value is `2` or `2.0`.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// `hasPlugin(prisma)` and `hasPlugin('prisma')` both name the plugin
/// directly; an unquoted argument that happens to resolve in the context is
/// used as a lookup instead.
fn plugin_name(arg: &Expr, ctx: &BindingContext) -> String {
    match arg {
        Expr::Path(p) => match ctx.lookup(p) {
            Value::String(s) => s,
            Value::Null => p.clone(),
            other => other.to_string(),
        },
        other => match other.eval(ctx) {
            Value::String(s) => s,
            v => v.to_string(),
        },
    }
}

// ── Parser ────────────────────────────────────────────────────────────────────

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> Result<(), TemplateError> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(TemplateError::new(format!(
                "expected '{expected}', found '{c}'"
            ))),
            None => Err(TemplateError::new(format!(
                "expected '{expected}', found end of expression"
            ))),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, TemplateError> {
        self.skip_ws();
        match self.peek() {
            Some('\'') | Some('"') => self.parse_string(),
            Some(c) if c.is_ascii_digit() || c == '-' => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.parse_word(),
            Some(c) => Err(TemplateError::new(format!(
                "unexpected character '{c}' in expression"
            ))),
            None => Err(TemplateError::new("empty expression")),
        }
    }

    fn parse_string(&mut self) -> Result<Expr, TemplateError> {
        let quote = self.bump().expect("caller checked quote");
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(Expr::Literal(Value::String(out))),
                Some(c) => out.push(c),
                None => return Err(TemplateError::new("unterminated string literal")),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Expr, TemplateError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            self.bump();
        }
        let text = &self.input[start..self.pos];
        let number: serde_json::Number = text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .ok_or_else(|| TemplateError::new(format!("invalid number literal '{text}'")))?;
        // Integers stay integers for clean eq() comparison against stored options.
        if let Ok(int) = text.parse::<i64>() {
            return Ok(Expr::Literal(Value::Number(int.into())));
        }
        Ok(Expr::Literal(Value::Number(number)))
    }

    /// A word is a boolean literal, a helper call, or a dotted path.
    fn parse_word(&mut self) -> Result<Expr, TemplateError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            self.bump();
        }
        let word = &self.input[start..self.pos];

        self.skip_ws();
        if self.peek() == Some('(') {
            return self.parse_call(word);
        }

        match word {
            "true" => Ok(Expr::Literal(Value::Bool(true))),
            "false" => Ok(Expr::Literal(Value::Bool(false))),
            _ => Ok(Expr::Path(word.to_string())),
        }
    }

    fn parse_call(&mut self, name: &str) -> Result<Expr, TemplateError> {
        let helper = match name {
            "eq" => Helper::Eq,
            "and" => Helper::And,
            "or" => Helper::Or,
            "hasPlugin" => Helper::HasPlugin,
            other => {
                return Err(TemplateError::new(format!("unknown helper '{other}'")));
            }
        };

        self.eat('(')?;
        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() != Some(')') {
            loop {
                args.push(self.parse_expr()?);
                self.skip_ws();
                match self.peek() {
                    Some(',') => {
                        self.bump();
                    }
                    _ => break,
                }
            }
        }
        self.eat(')')?;

        let arity_ok = match helper {
            Helper::Eq => args.len() == 2,
            Helper::HasPlugin => args.len() == 1,
            Helper::And | Helper::Or => !args.is_empty(),
        };
        if !arity_ok {
            return Err(TemplateError::new(format!(
                "helper '{name}' called with {} argument(s)",
                args.len()
            )));
        }

        Ok(Expr::Call { helper, args })
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
