use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use libaplus::{
    eval::{environment::DEFAULT_CAPACITY, Config, ErrorPolicy, Evaluator},
    lexer::Lexer,
    parser::Parser,
    repl,
};
use std::{fs, path::PathBuf};
use tracing::{info, Level};

const EXTENSION: &str = ".a++";

/// Interpreter for the A++ language. Starts a REPL when no file is given.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file to run; must end in `.a++`.
    file: Option<PathBuf>,

    /// Print the token stream instead of running the program.
    #[arg(long)]
    tokens: bool,

    /// Print the parsed statements instead of running the program.
    #[arg(long)]
    ast: bool,

    /// Stop at the first runtime error instead of substituting a default.
    #[arg(long)]
    abort_on_error: bool,

    /// Maximum number of distinct variables a program may bind.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    max_variables: usize,

    /// More log output; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }

        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn config(&self) -> Config {
        Config {
            max_variables: self.max_variables,
            on_error: if self.abort_on_error {
                ErrorPolicy::Abort
            } else {
                ErrorPolicy::Continue
            },
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();

    let path = match &args.file {
        Some(path) => path,
        None => {
            println!("A++ interpreter, end input with Ctrl-D");
            return repl::start(args.config()).context("REPL failed");
        }
    };

    let name = path.to_string_lossy();
    if !name.ends_with(EXTENSION) {
        bail!("'{}' is not an A++ source file (expected a {} extension)", name, EXTENSION);
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", name))?;
    info!(file = %name, bytes = source.len(), "loaded source");

    if args.tokens {
        Lexer::lex_input(&source)
            .iter()
            .for_each(|token| println!("{:?}", token));
        return Ok(());
    }

    let mut parser = Parser::new(&source);
    let program = parser.parse();

    if program.is_empty() && !parser.errors().is_empty() {
        bail!(
            "'{}' contains no valid statements ({} syntax errors)",
            name,
            parser.errors().len()
        );
    }

    if args.ast {
        program
            .iter()
            .for_each(|statement| println!("{}", statement));
        return Ok(());
    }

    let mut evaluator = Evaluator::with_output(std::io::stdout(), args.config());
    evaluator
        .run(&program)
        .with_context(|| format!("failed to run '{}'", name))?;

    info!(
        statements = program.len(),
        runtime_errors = evaluator.diagnostics().len(),
        "program finished"
    );

    Ok(())
}
