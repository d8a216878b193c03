use crate::parser::ast::{Ident, Infix, VarType};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("undefined variable '{0}'")]
    UndefinedVariable(Ident),
    #[error("variable '{name}' is {found}, expected {expected}")]
    TypeMismatch {
        name: Ident,
        expected: VarType,
        found: VarType,
    },
    #[error("cannot use `{found}` as {expected}")]
    UnsupportedOperand { expected: VarType, found: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulus by zero")]
    ModuloByZero,
    #[error("integer overflow evaluating {left} {op} {right}")]
    Overflow { op: Infix, left: i64, right: i64 },
    #[error("cannot bind '{name}': maximum number of variables ({capacity}) reached")]
    CapacityExceeded { name: Ident, capacity: usize },
    #[error("failed to write output: {0}")]
    Output(String),
}

impl RuntimeError {
    /// Whether the error comes from a value of the wrong type, as opposed to
    /// an arithmetic or lookup failure.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            RuntimeError::TypeMismatch { .. } | RuntimeError::UnsupportedOperand { .. }
        )
    }
}
