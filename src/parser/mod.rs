pub mod ast;
pub mod error;

use crate::{
    lexer::{token::Token, Lexer},
    parser::{
        ast::{Expr, Ident, Infix, Literal, Program, Statement, VarType},
        error::{ParseError, Result},
    },
};
use std::mem;
use tracing::{trace, warn};

/// Recursive-descent parser that pulls tokens from the lexer on demand.
///
/// Grammar, loosest binding first:
///
/// ```text
/// expression := term (('+' | '-') term)*
/// term       := power (('*' | '/' | '%') power)*
/// power      := factor ('**' power)?
/// factor     := INT | IDENT | BOOL | STRING | '(' expression ')'
/// ```
///
/// A statement that fails to parse is reported and dropped; parsing resumes
/// at the token where the failure was detected.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    line: usize,
    depth: usize,
    errors: Vec<ParseError>,
}

/// Operators plus open parentheses allowed in a single statement. Bounds both
/// the parser's recursion and the depth of the tree handed to the evaluator.
pub const MAX_EXPRESSION_DEPTH: usize = 256;

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        let line = lexer.line();

        Self {
            lexer,
            current,
            line,
            depth: 0,
            errors: Vec::new(),
        }
    }

    pub fn parse_program(input: &str) -> Program {
        Parser::new(input).parse()
    }

    /// Parses statements until end of input. An empty program means nothing
    /// could be parsed; see `errors` for why.
    pub fn parse(&mut self) -> Program {
        let mut program = Program::new();

        while self.current != Token::Eof {
            match self.parse_statement() {
                Ok(Some(statement)) => program.push(statement),
                Ok(None) => break,
                Err(e @ ParseError::ExpressionTooDeep { .. }) => {
                    self.report(e);
                    self.skip_statement();
                }
                Err(e) => self.report(e),
            }
        }

        program
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    fn report(&mut self, error: ParseError) {
        warn!(line = error.line(), "{}", error);
        self.errors.push(error);
    }

    fn parse_statement(&mut self) -> Result<Option<Statement>> {
        self.depth = 0;

        let statement = match &self.current {
            Token::IntType => self.parse_declaration(VarType::Int)?,
            Token::StringType => self.parse_declaration(VarType::String)?,
            Token::BoolType => self.parse_declaration(VarType::Bool)?,
            Token::Print(_) => self.parse_print()?,
            Token::Ident(_) => self.parse_assignment()?,
            Token::Eof => return Ok(None),
            Token::Illegal(error) => {
                let error = ParseError::Lexical {
                    line: self.line,
                    error: error.clone(),
                };
                self.next_token();
                return Err(error);
            }
            found => {
                let error = ParseError::UnexpectedToken {
                    line: self.line,
                    found: found.clone(),
                };
                self.next_token();
                return Err(error);
            }
        };

        self.tag(Token::Semicolon)?;

        Ok(Some(statement))
    }

    fn parse_declaration(&mut self, ty: VarType) -> Result<Statement> {
        self.next_token();
        let name = self.parse_ident()?;

        let value = if self.current == Token::Assign {
            self.next_token();

            // A literal of the declared type is taken as-is, without going
            // through the expression grammar.
            let value = match (ty, &self.current) {
                (VarType::String, Token::Str(_)) | (VarType::Bool, Token::Bool(_)) => {
                    self.parse_literal()?
                }
                _ => self.parse_expression()?,
            };

            Some(value)
        } else {
            None
        };

        trace!(%ty, %name, "parsed declaration");

        Ok(Statement::Declare { ty, name, value })
    }

    fn parse_assignment(&mut self) -> Result<Statement> {
        let name = self.parse_ident()?;
        self.tag(Token::Assign)?;

        let value = match self.current {
            Token::Bool(_) => self.parse_literal()?,
            _ => self.parse_expression()?,
        };

        trace!(%name, "parsed assignment");

        Ok(Statement::Assign(name, value))
    }

    fn parse_print(&mut self) -> Result<Statement> {
        self.next_token();
        self.tag(Token::LParen)?;
        let expr = self.parse_expression()?;
        self.tag(Token::RParen)?;

        Ok(Statement::Print(expr))
    }

    fn parse_expression(&mut self) -> Result<Expr> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.current {
                Token::Plus => Infix::Plus,
                Token::Minus => Infix::Minus,
                _ => break,
            };
            self.next_token();
            self.descend()?;

            let right = self.parse_term()?;
            left = Self::infix(op, left, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut left = self.parse_power()?;

        loop {
            let op = match self.current {
                Token::Asterisk => Infix::Multiply,
                Token::Slash => Infix::Divide,
                Token::Percent => Infix::Modulo,
                _ => break,
            };
            self.next_token();
            self.descend()?;

            let right = self.parse_power()?;
            left = Self::infix(op, left, right);
        }

        Ok(left)
    }

    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_factor()?;

        if self.current != Token::Power {
            return Ok(base);
        }
        self.next_token();
        self.descend()?;

        let exponent = self.parse_power()?;
        Ok(Self::infix(Infix::Power, base, exponent))
    }

    fn parse_factor(&mut self) -> Result<Expr> {
        match self.current {
            Token::Int(_) | Token::Str(_) | Token::Bool(_) => self.parse_literal(),
            Token::Ident(_) => self.parse_ident().map(Expr::Ident),
            Token::LParen => {
                self.next_token();
                self.descend()?;
                let expr = self.parse_expression()?;
                self.tag(Token::RParen)?;

                Ok(expr)
            }
            _ => Err(ParseError::ExpectedExpression {
                line: self.line,
                found: self.current.clone(),
            }),
        }
    }

    fn parse_literal(&mut self) -> Result<Expr> {
        let literal = match &self.current {
            Token::Int(digits) => {
                digits
                    .parse::<i64>()
                    .map(Literal::Int)
                    .map_err(|_| ParseError::IntegerOutOfRange {
                        line: self.line,
                        digits: digits.clone(),
                    })
            }
            Token::Str(s) => Ok(Literal::Str(s.clone())),
            Token::Bool(b) => Ok(Literal::Bool(*b)),
            found => {
                return Err(ParseError::ExpectedExpression {
                    line: self.line,
                    found: found.clone(),
                })
            }
        };
        self.next_token();

        let literal = literal?;
        trace!(%literal, "built literal");

        Ok(Expr::Literal(literal))
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        match &self.current {
            Token::Ident(ident) => {
                let ident = ident.clone();
                self.next_token();

                Ok(ident)
            }
            found => Err(ParseError::Expected {
                line: self.line,
                expected: "an identifier".to_string(),
                found: found.clone(),
            }),
        }
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;

        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(ParseError::ExpressionTooDeep {
                line: self.line,
                limit: MAX_EXPRESSION_DEPTH,
            });
        }

        Ok(())
    }

    // Drops the rest of an oversized statement, up to and including its `;`.
    fn skip_statement(&mut self) {
        while !matches!(self.current, Token::Semicolon | Token::Eof) {
            self.next_token();
        }

        if self.current == Token::Semicolon {
            self.next_token();
        }
    }

    fn infix(op: Infix, left: Expr, right: Expr) -> Expr {
        trace!(%op, "built binary operation");
        Expr::Infix(op, Box::new(left), Box::new(right))
    }

    /// Consumes the current token if it is `tag`, otherwise leaves it in place.
    fn tag(&mut self, tag: Token) -> Result<()> {
        if self.current != tag {
            return Err(ParseError::Expected {
                line: self.line,
                expected: tag.to_string(),
                found: self.current.clone(),
            });
        }

        self.next_token();
        Ok(())
    }

    fn next_token(&mut self) -> Token {
        let next = self.lexer.next_token();
        self.line = self.lexer.line();
        mem::replace(&mut self.current, next)
    }
}
