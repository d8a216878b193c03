use std::{fmt, fmt::Display};

pub type Program = Vec<Statement>;
pub type Ident = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Declare {
        ty: VarType,
        name: Ident,
        value: Option<Expr>,
    },
    Assign(Ident, Expr),
    Print(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(Ident),
    Literal(Literal),
    Infix(Infix, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Str(String),
    Bool(bool),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Infix {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Power,
}

/// Declared type of a variable, also used as the runtime tag of a value.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum VarType {
    Int,
    String,
    Bool,
}

impl Display for Infix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infix::Plus => write!(f, "+"),
            Infix::Minus => write!(f, "-"),
            Infix::Multiply => write!(f, "*"),
            Infix::Divide => write!(f, "/"),
            Infix::Modulo => write!(f, "%"),
            Infix::Power => write!(f, "**"),
        }
    }
}

impl Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarType::Int => write!(f, "int"),
            VarType::String => write!(f, "string"),
            VarType::Bool => write!(f, "bool"),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(int) => write!(f, "{}", int),
            Literal::Str(s) => write!(f, r#""{}""#, s),
            Literal::Bool(b) => write!(f, "{}", b),
        }
    }
}

// Fully parenthesised, so the tree shape is visible when dumped.
impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(ident) => write!(f, "{}", ident),
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Infix(op, left, right) => write!(f, "({} {} {})", left, op, right),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Declare {
                ty,
                name,
                value: Some(value),
            } => write!(f, "{} {} = {};", ty, name, value),
            Statement::Declare {
                ty,
                name,
                value: None,
            } => write!(f, "{} {};", ty, name),
            Statement::Assign(name, value) => write!(f, "{} = {};", name, value),
            Statement::Print(expr) => write!(f, "print({});", expr),
        }
    }
}
