pub mod error;
pub mod token;

use error::LexError;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while, take_while1},
    character::complete::{char, digit1, satisfy},
    combinator::{map, opt, recognize, rest, value},
    multi::many0,
    sequence::{pair, preceded, tuple},
    IResult, Offset,
};
use token::Token;
use tracing::trace;

/// Pulls tokens out of a source string one at a time.
///
/// The only state is the cursor into the remaining input plus the line
/// bookkeeping used for diagnostics; no token history is kept.
pub struct Lexer<'a> {
    input: &'a str,
    line: usize,
    token_line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            line: 1,
            token_line: 1,
        }
    }

    /// Lexes the whole input, including the trailing `Token::Eof`.
    pub fn lex_input(input: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = Lexer::new(input).collect();
        tokens.push(Token::Eof);
        tokens
    }

    /// Returns the next token, or `Token::Eof` once the input is exhausted.
    /// Calling it again after `Eof` keeps returning `Eof`.
    pub fn next_token(&mut self) -> Token {
        let start = match Self::trivia(self.input) {
            Ok((i, _)) => i,
            Err(_) => self.input,
        };
        self.advance_to(start);
        self.token_line = self.line;

        let token = match Self::token(self.input) {
            Ok((i, token)) => {
                self.advance_to(i);
                token
            }
            Err(_) => match self.input.chars().next() {
                Some(c) => {
                    let input = self.input;
                    self.advance_to(&input[c.len_utf8()..]);
                    Token::Illegal(LexError::UnknownCharacter(c))
                }
                None => Token::Eof,
            },
        };

        trace!(line = self.token_line, token = %token, "lexed token");
        token
    }

    /// The next raw character under the cursor, without advancing.
    pub fn peek_char(&self) -> Option<char> {
        self.input.chars().next()
    }

    /// Line on which the most recently returned token starts.
    pub fn line(&self) -> usize {
        self.token_line
    }

    fn advance_to(&mut self, remaining: &'a str) {
        let consumed = &self.input[..self.input.offset(remaining)];
        self.line += consumed.matches('\n').count();
        self.input = remaining;
    }

    fn trivia(i: &str) -> IResult<&str, ()> {
        value(
            (),
            many0(alt((
                take_while1(|c: char| " \t\r\n".contains(c)),
                Self::line_comment,
                Self::block_comment,
            ))),
        )(i)
    }

    fn line_comment(i: &str) -> IResult<&str, &str> {
        recognize(pair(tag("//"), take_till(|c: char| c == '\n')))(i)
    }

    // An unclosed block comment swallows the rest of the input.
    fn block_comment(i: &str) -> IResult<&str, &str> {
        recognize(tuple((
            tag("/*"),
            alt((take_until("*/"), rest)),
            opt(tag("*/")),
        )))(i)
    }

    fn token(i: &str) -> IResult<&str, Token> {
        alt((Self::word, Self::number, Self::string, Self::symbol))(i)
    }

    fn word(i: &str) -> IResult<&str, Token> {
        map(
            recognize(pair(
                satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
                take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            )),
            Self::keyword_or_ident,
        )(i)
    }

    fn keyword_or_ident(word: &str) -> Token {
        match word {
            "int" => Token::IntType,
            "string" => Token::StringType,
            "bool" => Token::BoolType,
            "print" | "echo" => Token::Print(word.to_string()),
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            _ => Token::Ident(word.to_string()),
        }
    }

    fn number(i: &str) -> IResult<&str, Token> {
        map(digit1, |digits: &str| Token::Int(digits.to_string()))(i)
    }

    fn string(i: &str) -> IResult<&str, Token> {
        map(
            preceded(char('"'), pair(take_till(|c: char| c == '"'), opt(char('"')))),
            |(text, closing): (&str, Option<char>)| match closing {
                Some(_) => Token::Str(text.to_string()),
                None => Token::Illegal(LexError::UnterminatedString(text.to_string())),
            },
        )(i)
    }

    fn symbol(i: &str) -> IResult<&str, Token> {
        alt((
            Self::static_token("==", Token::Eq),
            Self::static_token("=", Token::Assign),
            Self::static_token("**", Token::Power),
            Self::static_token("*", Token::Asterisk),
            Self::static_token("+", Token::Plus),
            Self::static_token("-", Token::Minus),
            Self::static_token("/", Token::Slash),
            Self::static_token("%", Token::Percent),
            Self::static_token("(", Token::LParen),
            Self::static_token(")", Token::RParen),
            Self::static_token(";", Token::Semicolon),
        ))(i)
    }

    fn static_token<'b>(
        symbol: &'static str,
        token: Token,
    ) -> impl FnMut(&'b str) -> IResult<&'b str, Token> {
        map(tag(symbol), move |_| token.clone())
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token::Eof => None,
            token => Some(token),
        }
    }
}
