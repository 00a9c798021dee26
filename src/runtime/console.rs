//! Console streams used by `print`, `println` and `read`

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Failure reported by a console; the evaluator attaches the source line
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ConsoleError(#[from] io::Error);

/// Output sink and line source for a running program
pub trait Console {
    /// Writes text without adding a line terminator
    fn write(&mut self, text: &str) -> Result<(), ConsoleError>;

    /// Blocks for one line of input. `Ok(None)` means end of input.
    fn read_line(&mut self) -> Result<Option<String>, ConsoleError>;
}

/// Process standard output and standard input
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write(&mut self, text: &str) -> Result<(), ConsoleError> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, ConsoleError> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(strip_line_ending(line)))
    }
}

/// In-memory console: scripted input lines and captured output
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    input: VecDeque<String>,
    output: String,
}

impl BufferConsole {
    pub fn new() -> Self {
        BufferConsole::default()
    }

    /// Creates a console that answers `read` with the given lines in order
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BufferConsole {
            input: lines.into_iter().map(Into::into).collect(),
            output: String::new(),
        }
    }

    /// Everything written so far
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Takes the captured output, leaving the buffer empty
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl Console for BufferConsole {
    fn write(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.output.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, ConsoleError> {
        Ok(self.input.pop_front())
    }
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
