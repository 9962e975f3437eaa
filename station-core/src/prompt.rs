use std::io::{self, BufRead, Write};

use crate::model::Field;

/// Source of user answers and sink for user-facing messages.
pub trait Prompt {
    /// Ask for one field. `Ok(None)` means the input is exhausted.
    fn ask(&mut self, field: Field, placeholder: Option<&str>) -> io::Result<Option<String>>;

    /// Show a message (errors, warnings) to the user.
    fn notify(&mut self, message: &str) -> io::Result<()>;
}

/// Plain line-oriented prompt over any reader/writer pair.
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, field: Field, placeholder: Option<&str>) -> io::Result<Option<String>> {
        match (field, placeholder) {
            (Field::Date, Some(hint)) => write!(self.output, "\nEnter {field} ({hint}): ")?,
            (Field::Date, None) => write!(self.output, "\nEnter {field}: ")?,
            _ => write!(self.output, " Enter {field}: ")?,
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    fn notify(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }
}
