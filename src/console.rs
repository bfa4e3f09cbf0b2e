//! Operator console: prompts on stdout, lines from stdin.
//!
//! Prompts are user interaction, not logs, so they go to stdout directly with
//! an explicit flush (the operator must see a prompt before typing). All
//! logging goes through `tracing` to stderr.

use std::io::{self, BufRead, Write};

use crate::reply::OperatorInput;

/// [`OperatorInput`] backed by the process's stdin/stdout.
pub struct ConsoleInput {
    stdin: io::Stdin,
}

impl ConsoleInput {
    /// Create a console input over the process's standard streams.
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorInput for ConsoleInput {
    fn prompt(&mut self, text: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(text.as_bytes())?;
        handle.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        let n = self.stdin.lock().read_line(&mut line)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "operator input closed",
            ));
        }
        // Strip the trailing newline (and \r on Windows line endings).
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}
