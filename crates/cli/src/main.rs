//! Marvin CLI - Command classification and dry-run routing
//!
//! Feeds typed commands through the same keyword gate, pattern tables and
//! dispatch order the voice assistant uses, with every backend replaced by a
//! description of the call it would make.

mod commands;
mod config;
mod handlers;
mod output;
mod samples;
mod terminal;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Marvin CLI - Voice assistant command router
#[derive(Parser)]
#[command(name = "marvin")]
#[command(author = "Marvin Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Classify and route voice assistant commands")]
#[command(long_about = r#"
Marvin CLI runs commands through the assistant's router without touching any
backend. Each module reports the call it would make instead.

Examples:
  marvin classify play playlist three            # Show the parsed intent
  marvin classify --json what is the weather     # Same, as JSON
  marvin route send a text                       # Walk through the SMS dialog
  marvin config --set router.priority=calendar,weather,music
"#)]
struct Cli {
    /// Configuration file (defaults to ~/.marvin/config.toml)
    #[arg(long, env = "MARVIN_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a command is classified without acting on it
    Classify {
        /// The command, as it would be transcribed
        #[arg(required = true)]
        utterance: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Route a command through the dry-run modules
    Route {
        /// The command, as it would be transcribed
        #[arg(required = true)]
        utterance: Vec<String>,
    },

    /// List each module's gate keywords
    Keywords,

    /// Configuration management
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Print a single configuration value
        #[arg(long)]
        get: Option<String>,

        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("marvin={lvl},marvin_cli={lvl},warn", lvl = log_level).into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(config::Config::config_path);
    let config = config::Config::load_from(&config_path)?;
    let output = output::OutputHandler::new(config.display.color, config.display.show_gated_modules);

    match cli.command {
        Commands::Classify { utterance, json } => {
            let router = commands::build_router(&config)?;
            commands::classify(&router, &utterance.join(" "), json, &output)?;
        }
        Commands::Route { utterance } => {
            let router = commands::build_router(&config)?;
            commands::route(&router, &utterance.join(" "), &output)?;
        }
        Commands::Keywords => {
            let router = commands::build_router(&config)?;
            commands::keywords(&router, &output);
        }
        Commands::Config { show, get, set } => {
            if show {
                commands::show_config(&config, &config_path)?;
            } else if let Some(key) = get {
                commands::get_config(&config, &key)?;
            } else if let Some(kv) = set {
                commands::set_config(&kv, &config_path)?;
            } else {
                commands::show_config(&config, &config_path)?;
            }
        }
    }

    Ok(())
}
