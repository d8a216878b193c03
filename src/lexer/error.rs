use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unknown character '{0}'")]
    UnknownCharacter(char),
    #[error("unterminated string literal {0:?}")]
    UnterminatedString(String),
}
