use crate::lexer::error::LexError;
use std::{fmt, fmt::Display};

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Token {
    Eof,

    // Symbols
    Semicolon,
    LParen,
    RParen,

    // Operators
    Assign,
    Eq,
    Plus,
    Minus,
    Asterisk,
    Power,
    Slash,
    Percent,

    // Keywords
    IntType,
    StringType,
    BoolType,
    /// `print` or its `echo` alias, keeping the spelling used.
    Print(String),

    // Complex Types
    Ident(String),
    Int(String),
    Str(String),
    Bool(bool),

    Illegal(LexError),
}

impl Token {
    /// The textual payload of the token: the identifier name, the literal text
    /// or the operator symbol. `Eof` and `Illegal` carry none.
    pub fn literal(&self) -> Option<&str> {
        let text = match self {
            Token::Eof | Token::Illegal(_) => return None,
            Token::Semicolon => ";",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Assign => "=",
            Token::Eq => "==",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Asterisk => "*",
            Token::Power => "**",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::IntType => "int",
            Token::StringType => "string",
            Token::BoolType => "bool",
            Token::Print(spelling) => spelling,
            Token::Ident(ident) => ident,
            Token::Int(digits) => digits,
            Token::Str(s) => s,
            Token::Bool(true) => "true",
            Token::Bool(false) => "false",
        };

        Some(text)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "end of input"),
            Token::Illegal(e) => write!(f, "{}", e),
            Token::Ident(ident) => write!(f, "identifier '{}'", ident),
            Token::Int(digits) => write!(f, "integer {}", digits),
            Token::Str(s) => write!(f, r#"string "{}""#, s),
            other => write!(f, "'{}'", other.literal().unwrap_or_default()),
        }
    }
}
