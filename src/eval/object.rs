use crate::parser::ast::VarType;
use std::{fmt, fmt::Display};

/// A runtime value; its variant doubles as the variable's type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Integer(i64),
    String(String),
    Boolean(bool),
}

impl Object {
    pub fn kind(&self) -> VarType {
        match self {
            Object::Integer(_) => VarType::Int,
            Object::String(_) => VarType::String,
            Object::Boolean(_) => VarType::Bool,
        }
    }

    /// The value an uninitialised declaration of `ty` starts with.
    pub fn default_for(ty: VarType) -> Self {
        match ty {
            VarType::Int => Object::Integer(0),
            VarType::String => Object::String(String::new()),
            VarType::Bool => Object::Boolean(false),
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(int) => write!(f, "{}", int),
            Object::String(s) => write!(f, "{}", s),
            Object::Boolean(b) => write!(f, "{}", b),
        }
    }
}
