//! Output formatting and terminal rendering
//!
//! Handles coloured terminal output for replies, classification results and
//! the keyword table.

use colored::Colorize;
use marvin::{ModuleName, ParsedCommand};

/// Output handler for terminal display
pub struct OutputHandler {
    pub show_gated_modules: bool,
}

impl OutputHandler {
    pub fn new(color: bool, show_gated_modules: bool) -> Self {
        colored::control::set_override(color);
        Self { show_gated_modules }
    }

    /// Print a section header
    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", format!("▶ {}", text).bright_yellow().bold());
        println!("{}", "─".repeat(60).dimmed());
    }

    /// Print a success message
    pub fn print_success(&self, text: &str) {
        println!("{} {}", "✓".bright_green(), text.bright_white());
    }

    /// Print an error message
    pub fn print_error(&self, text: &str) {
        println!("{} {}", "✗".bright_red(), text.bright_red());
    }

    /// Print a warning message
    pub fn print_warning(&self, text: &str) {
        println!("{} {}", "⚠".bright_yellow(), text.yellow());
    }

    /// Print something the assistant says
    pub fn print_reply(&self, text: &str) {
        for line in text.lines() {
            println!("{} {}", "marvin>".bright_cyan().bold(), line);
        }
    }

    /// Print the modules admitted by the keyword gate
    pub fn print_gated(&self, gated: &[ModuleName]) {
        if !self.show_gated_modules {
            return;
        }
        let names = if gated.is_empty() {
            "none".dimmed().to_string()
        } else {
            gated
                .iter()
                .map(|module| module.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("  {} {}", "Gated:".dimmed(), names);
    }

    /// Print a classification result
    pub fn print_command(&self, command: Option<&ParsedCommand>) {
        match command {
            Some(command) => {
                println!(
                    "  {} {}",
                    "Module:".dimmed(),
                    command.module().as_str().bright_green()
                );
                println!("  {} {}", "Intent:".dimmed(), command.label().bright_white());
                println!("  {} {:?}", "Arguments:".dimmed(), command);
            }
            None => println!("  {} {}", "Intent:".dimmed(), "no match".bright_red()),
        }
    }

    /// Print the keyword gate table
    pub fn print_keywords(&self, rows: &[(ModuleName, Vec<String>)]) {
        println!();
        println!(
            "{}",
            format!("{:<10} {}", "Module", "Keywords").bright_white().bold()
        );
        println!("{}", "─".repeat(60).dimmed());
        for (module, keywords) in rows {
            let keywords = keywords
                .iter()
                .map(|keyword| format!("{:?}", keyword))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{:<10} {}", module.as_str().bright_cyan(), keywords);
        }
        println!();
    }
}
