//! CLI subcommand handlers
//!
//! Handles non-interactive commands like classify, route, keywords and config.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use marvin::{IntentRouter, ModuleName, ParsedCommand};
use serde::Serialize;

use crate::{
    config::{join_modules, Config},
    handlers,
    output::OutputHandler,
    terminal::TerminalConversation,
};

/// Build the dry-run router described by `config`
pub fn build_router(config: &Config) -> Result<IntentRouter> {
    let today = chrono::Local::now().date_naive();
    Ok(handlers::dry_run_router(&config.marvin(), today)?)
}

/// What `classify --json` prints
#[derive(Debug, Serialize)]
pub struct ClassifyReport<'a> {
    pub utterance: &'a str,
    pub gated: Vec<ModuleName>,
    pub command: Option<ParsedCommand>,
}

/// Show how an utterance would be classified without acting on it
pub fn classify(
    router: &IntentRouter,
    utterance: &str,
    json: bool,
    output: &OutputHandler,
) -> Result<()> {
    let report = ClassifyReport {
        utterance,
        gated: router.gated_modules(utterance),
        command: router.classify(utterance)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output.print_header("Classification");
    println!("  {} {}", "Utterance:".dimmed(), utterance.bright_white());
    output.print_gated(&report.gated);
    output.print_command(report.command.as_ref());
    Ok(())
}

/// Route one utterance through the dry-run modules
pub fn route(router: &IntentRouter, utterance: &str, output: &OutputHandler) -> Result<()> {
    output.print_gated(&router.gated_modules(utterance));

    let mut conversation = TerminalConversation::new(output)?;
    if !router.route(utterance, &mut conversation)? {
        output.print_warning("No module handled the command");
    }
    Ok(())
}

/// List the keyword gate of every dispatched module
pub fn keywords(router: &IntentRouter, output: &OutputHandler) {
    let rows: Vec<_> = router
        .modules()
        .into_iter()
        .map(|module| (module, router.gate().keywords(module).to_vec()))
        .collect();

    output.print_header("Keyword gate");
    output.print_keywords(&rows);
}

/// Show current configuration
pub fn show_config(config: &Config, path: &Path) -> Result<()> {
    let output = OutputHandler::new(config.display.color, false);

    output.print_header("Configuration");

    println!();
    println!("  {}", "[router]".bright_cyan());
    println!(
        "    {} = \"{}\"",
        "priority".dimmed(),
        join_modules(&config.router.priority)
    );
    println!(
        "    {} = \"{}\"",
        "fallback_message".dimmed(),
        config.router.fallback_message
    );
    for module in ModuleName::PRIORITY {
        if let Some(words) = config.router.extra_keywords.get(module.as_str()) {
            println!(
                "    {} = \"{}\"",
                format!("extra_keywords.{}", module).dimmed(),
                words.join(",")
            );
        }
    }

    println!();
    println!("  {}", "[sms]".bright_cyan());
    println!(
        "    {} = \"{}\"",
        "sender_name".dimmed(),
        config.sms.sender_name
    );
    println!(
        "    {} = \"{}\"",
        "country_prefix".dimmed(),
        config.sms.country_prefix
    );

    println!();
    println!("  {}", "[display]".bright_cyan());
    println!("    {} = {}", "color".dimmed(), config.display.color);
    println!(
        "    {} = {}",
        "show_gated_modules".dimmed(),
        config.display.show_gated_modules
    );

    println!();
    println!("  {} {}", "Config file:".dimmed(), path.display());

    Ok(())
}

/// Print one configuration value
pub fn get_config(config: &Config, key: &str) -> Result<()> {
    match config.get(key) {
        Some(value) => println!("{}", value),
        None => anyhow::bail!("Unknown configuration key: {}", key),
    }
    Ok(())
}

/// Set a configuration value
pub fn set_config(kv: &str, path: &Path) -> Result<()> {
    let Some((key, value)) = kv.split_once('=') else {
        anyhow::bail!("Invalid format. Use: key=value");
    };
    let key = key.trim();
    let value = value.trim().trim_matches('"');

    let mut config = Config::load_from(path)?;
    config
        .set(key, value)
        .with_context(|| format!("Failed to set {}", key))?;
    config.save_to(path)?;

    let output = OutputHandler::new(config.display.color, false);
    output.print_success(&format!("Set {} = \"{}\"", key, value));
    Ok(())
}
