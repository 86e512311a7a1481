use super::Tool;
use crate::error::{Result, ToolError};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tracing::debug;

/// Parameters for the calculator tool
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CalculatorParams {
    /// Arithmetic expression, e.g. `"2 + 3 * (4 - 1)"`
    pub expression: String,
}

/// Result of evaluating an arithmetic expression
#[derive(Debug, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The input expression, echoed verbatim
    pub expression: String,
    pub result: serde_json::Number,
}

/// A calculator tool that evaluates arithmetic expressions.
///
/// Only numeric literals, `+ - * / %`, unary sign, and parentheses are
/// accepted. Anything else (identifiers, calls, assignment) is rejected
/// before evaluation, so the tool cannot be used to run arbitrary code.
/// Fully deterministic, no side effects.
#[derive(Debug)]
pub struct CalculatorTool;

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for CalculatorTool {
    fn name(&self) -> &'static str {
        "calculate"
    }

    fn description(&self) -> &'static str {
        "Evaluate a basic arithmetic expression (+, -, *, /, %, parentheses)"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Arithmetic expression using numbers, + - * / % and parentheses"
                }
            },
            "required": ["expression"]
        })
    }

    fn execute(
        &self,
        parameters: serde_json::Value,
    ) -> Pin<
        Box<
            dyn std::future::Future<Output = std::result::Result<serde_json::Value, ToolError>>
                + Send
                + '_,
        >,
    > {
        Box::pin(async move {
            let params: CalculatorParams = serde_json::from_value(parameters)
                .map_err(|err| ToolError::InvalidArgument(format!("invalid parameters: {}", err)))?;

            if params.expression.trim().is_empty() {
                return Err(ToolError::InvalidArgument(
                    "expression must be a non-empty string".to_string(),
                ));
            }

            debug!(expression = %params.expression, "evaluating expression");
            let value = eval_expression(&params.expression)?;

            let result = CalculationResult {
                expression: params.expression,
                result: value.into_json()?,
            };
            Ok(serde_json::to_value(result)?)
        })
    }
}

/// Numeric value that stays integral as long as the computation does.
///
/// Integer overflow and uneven division promote to floating point.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(value) => value as f64,
            Num::Float(value) => value,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Num::Int(value) => value == 0,
            Num::Float(value) => value == 0.0,
        }
    }

    fn add(self, rhs: Num) -> Num {
        match (self, rhs) {
            (Num::Int(a), Num::Int(b)) => a
                .checked_add(b)
                .map(Num::Int)
                .unwrap_or(Num::Float(a as f64 + b as f64)),
            _ => Num::Float(self.as_f64() + rhs.as_f64()),
        }
    }

    fn sub(self, rhs: Num) -> Num {
        match (self, rhs) {
            (Num::Int(a), Num::Int(b)) => a
                .checked_sub(b)
                .map(Num::Int)
                .unwrap_or(Num::Float(a as f64 - b as f64)),
            _ => Num::Float(self.as_f64() - rhs.as_f64()),
        }
    }

    fn mul(self, rhs: Num) -> Num {
        match (self, rhs) {
            (Num::Int(a), Num::Int(b)) => a
                .checked_mul(b)
                .map(Num::Int)
                .unwrap_or(Num::Float(a as f64 * b as f64)),
            _ => Num::Float(self.as_f64() * rhs.as_f64()),
        }
    }

    fn div(self, rhs: Num) -> Result<Num> {
        if rhs.is_zero() {
            return Err(ToolError::DivisionByZero);
        }
        if let (Num::Int(a), Num::Int(b)) = (self, rhs) {
            // Stay in integers only when the division is exact
            if let (Some(quotient), Some(0)) = (a.checked_div(b), a.checked_rem(b)) {
                return Ok(Num::Int(quotient));
            }
        }
        Ok(Num::Float(self.as_f64() / rhs.as_f64()))
    }

    fn rem(self, rhs: Num) -> Result<Num> {
        if rhs.is_zero() {
            return Err(ToolError::DivisionByZero);
        }
        match (self, rhs) {
            (Num::Int(a), Num::Int(b)) => match a.checked_rem(b) {
                Some(remainder) => Ok(Num::Int(remainder)),
                None => Ok(Num::Float((a as f64) % (b as f64))),
            },
            _ => Ok(Num::Float(self.as_f64() % rhs.as_f64())),
        }
    }

    fn neg(self) -> Num {
        match self {
            Num::Int(value) => value
                .checked_neg()
                .map(Num::Int)
                .unwrap_or(Num::Float(-(value as f64))),
            Num::Float(value) => Num::Float(-value),
        }
    }

    fn into_json(self) -> Result<serde_json::Number> {
        match self {
            Num::Int(value) => Ok(serde_json::Number::from(value)),
            Num::Float(value) => serde_json::Number::from_f64(value).ok_or_else(|| {
                ToolError::InvalidExpression("expression produced a non-finite value".to_string())
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(Num),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
}

impl Token {
    fn describe(self) -> &'static str {
        match self {
            Token::Number(_) => "number",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::Percent => "'%'",
            Token::LParen => "'('",
            Token::RParen => "')'",
        }
    }
}

/// Split the input into arithmetic tokens.
///
/// Any character outside the arithmetic set is rejected here, before
/// anything is evaluated.
fn tokenize(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut index = 0;

    while index < chars.len() {
        let ch = chars[index];
        match ch {
            ' ' | '\t' | '\r' | '\n' => index += 1,
            '+' => {
                tokens.push(Token::Plus);
                index += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                index += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                index += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                index += 1;
            }
            '%' => {
                tokens.push(Token::Percent);
                index += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                index += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                index += 1;
            }
            '0'..='9' | '.' => {
                let start = index;
                let mut seen_dot = false;
                while index < chars.len() {
                    match chars[index] {
                        '0'..='9' => index += 1,
                        '.' if !seen_dot => {
                            seen_dot = true;
                            index += 1;
                        }
                        _ => break,
                    }
                }
                let literal: String = chars[start..index].iter().collect();
                tokens.push(Token::Number(parse_literal(&literal)?));
            }
            _ => {
                return Err(ToolError::InvalidExpression(format!(
                    "unsupported token '{}'",
                    ch
                )));
            }
        }
    }

    Ok(tokens)
}

fn parse_literal(literal: &str) -> Result<Num> {
    if !literal.contains('.') {
        if let Ok(value) = literal.parse::<i64>() {
            return Ok(Num::Int(value));
        }
        // Literal too large for i64, fall through to floating point
    }
    literal
        .parse::<f64>()
        .map(Num::Float)
        .map_err(|_| ToolError::InvalidExpression(format!("invalid number '{}'", literal)))
}

/// Upper bound on parser recursion so a deeply nested input surfaces as
/// an error instead of exhausting the stack
const MAX_NESTING_DEPTH: usize = 128;

/// Recursive-descent parser over the token stream.
///
/// Grammar: expr := term (('+'|'-') term)*
///          term := unary (('*'|'/'|'%') unary)*
///          unary := ('+'|'-') unary | primary
///          primary := number | '(' expr ')'
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ToolError::InvalidExpression(
                "expression too deeply nested".to_string(),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expr(&mut self) -> Result<Num> {
        self.enter()?;
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            if !matches!(op, Token::Plus | Token::Minus) {
                break;
            }
            self.pos += 1;
            let rhs = self.term()?;
            value = match op {
                Token::Plus => value.add(rhs),
                _ => value.sub(rhs),
            };
        }
        self.leave();
        Ok(value)
    }

    fn term(&mut self) -> Result<Num> {
        let mut value = self.unary()?;
        while let Some(op) = self.peek() {
            if !matches!(op, Token::Star | Token::Slash | Token::Percent) {
                break;
            }
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                Token::Star => value.mul(rhs),
                Token::Slash => value.div(rhs)?,
                _ => value.rem(rhs)?,
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<Num> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.enter()?;
                let value = self.unary()?.neg();
                self.leave();
                Ok(value)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.enter()?;
                let value = self.unary()?;
                self.leave();
                Ok(value)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Num> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(ToolError::InvalidExpression(
                        "missing closing parenthesis".to_string(),
                    )),
                }
            }
            Some(token) => Err(ToolError::InvalidExpression(format!(
                "unexpected {}",
                token.describe()
            ))),
            None => Err(ToolError::InvalidExpression(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}

fn eval_expression(input: &str) -> Result<Num> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        return Err(ToolError::InvalidExpression(format!(
            "unexpected {} after expression",
            tokens[parser.pos].describe()
        )));
    }
    Ok(value)
}
