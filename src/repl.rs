use std::{
    io,
    io::{stdin, stdout, BufRead, Write},
};

use crate::{
    eval::{Config, Evaluator},
    interpret,
};

pub const PROMPT: &str = ">> ";

pub fn start(config: Config) -> io::Result<()> {
    let mut buffer = String::new();
    let mut evaluator = Evaluator::with_output(stdout(), config);

    let stdin = stdin();

    let mut stdout = stdout();

    loop {
        write!(stdout, "{}", PROMPT)?;

        stdout.flush()?;

        if stdin.lock().read_line(&mut buffer)? == 0 {
            writeln!(stdout)?;
            return Ok(());
        }

        match interpret(&buffer, &mut evaluator) {
            Ok(errors) => errors
                .iter()
                .try_for_each(|error| writeln!(stdout, "{}", error))?,
            Err(error) => writeln!(stdout, "error: {}", error)?,
        }

        buffer.clear();
    }
}
