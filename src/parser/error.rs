use crate::lexer::{error::LexError, token::Token};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("[line {line}] unexpected {found} at start of statement")]
    UnexpectedToken { line: usize, found: Token },
    #[error("[line {line}] expected {expected}, found {found}")]
    Expected {
        line: usize,
        expected: String,
        found: Token,
    },
    #[error("[line {line}] expected an expression, found {found}")]
    ExpectedExpression { line: usize, found: Token },
    #[error("[line {line}] integer literal {digits} is out of range")]
    IntegerOutOfRange { line: usize, digits: String },
    #[error("[line {line}] {error}")]
    Lexical { line: usize, error: LexError },
    #[error("[line {line}] expression exceeds {limit} operators and parentheses")]
    ExpressionTooDeep { line: usize, limit: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { line, .. }
            | ParseError::Expected { line, .. }
            | ParseError::ExpectedExpression { line, .. }
            | ParseError::IntegerOutOfRange { line, .. }
            | ParseError::Lexical { line, .. }
            | ParseError::ExpressionTooDeep { line, .. } => *line,
        }
    }
}
