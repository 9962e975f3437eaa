use std::io;

use inquire::{InquireError, Text};
use station_core::{Field, Prompt};

/// Interactive prompt rendered with `inquire`. Esc and Ctrl-C end the input.
#[derive(Debug, Default)]
pub struct InquirePrompt;

impl Prompt for InquirePrompt {
    fn ask(&mut self, field: Field, placeholder: Option<&str>) -> io::Result<Option<String>> {
        let message = format!("Enter {field}:");
        let mut text = Text::new(&message);
        if let Some(hint) = placeholder {
            text = text.with_placeholder(hint);
        }

        match text.prompt() {
            Ok(answer) => Ok(Some(answer.trim().to_string())),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(InquireError::IO(err)) => Err(err),
            Err(err) => Err(io::Error::other(err)),
        }
    }

    fn notify(&mut self, message: &str) -> io::Result<()> {
        println!("{message}");
        Ok(())
    }
}
