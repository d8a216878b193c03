pub mod eval;
pub mod lexer;
pub mod parser;
pub mod repl;

use crate::{
    eval::{error::RuntimeError, Evaluator},
    parser::{error::ParseError, Parser},
};
use std::io::Write;

/// Parses `source` and runs whatever statements survived parsing.
///
/// Returns the syntax diagnostics collected along the way, or the runtime
/// error that stopped the program.
pub fn interpret<W: Write>(
    source: &str,
    evaluator: &mut Evaluator<W>,
) -> Result<Vec<ParseError>, RuntimeError> {
    let mut parser = Parser::new(source);
    let program = parser.parse();

    evaluator.run(&program)?;

    Ok(parser.into_errors())
}
