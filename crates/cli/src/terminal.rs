//! Terminal side of a routed command
//!
//! Replies are printed through the [`OutputHandler`]; follow-up questions are
//! answered on a line editor.

use anyhow::Result;
use colored::Colorize;
use marvin::Conversation;
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::output::OutputHandler;

/// A [`Conversation`] over stdin and stdout.
pub struct TerminalConversation<'a> {
    editor: DefaultEditor,
    output: &'a OutputHandler,
}

impl<'a> TerminalConversation<'a> {
    pub fn new(output: &'a OutputHandler) -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            output,
        })
    }
}

impl Conversation for TerminalConversation<'_> {
    fn say(&mut self, text: &str) {
        self.output.print_reply(text);
    }

    fn listen(&mut self) -> Option<String> {
        match self.editor.readline(&format!("{} ", "you>".bright_green())) {
            Ok(line) => Some(line.trim().to_string()),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
            Err(e) => {
                tracing::warn!(error = %e, "reading reply failed");
                None
            }
        }
    }
}
