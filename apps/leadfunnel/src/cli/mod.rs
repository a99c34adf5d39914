//! # Lead Funnel CLI Module
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `assess` - Run one lead (JSON file) through the submission flow
//! - `interview` - Fill the form interactively in the terminal
//! - `config` - Show which credentials are configured

mod commands;

use crate::config::{AppConfig, ConfigError};
use clap::{Parser, Subcommand};
use leadfunnel_core::FunnelError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors that abort a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Service setup failed: {0}")]
    Setup(#[from] FunnelError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid input: {0}")]
    Input(String),
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Lead funnel - marketing maturity assessments for landing page leads.
#[derive(Parser, Debug)]
#[command(name = "leadfunnel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file (environment variables override it)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Submit one lead from a JSON file and print the outcome
    Assess {
        /// Path to the lead JSON file (camelCase fields)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Fill the lead form step by step in the terminal
    Interview,

    /// Show configuration and credential presence
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Serve { host, port }) => cmd_serve(config, host, port).await,
        Some(Commands::Assess { file }) => cmd_assess(&config, &file, json_mode).await,
        Some(Commands::Interview) => cmd_interview(&config).await,
        Some(Commands::Config) | None => cmd_config(&config, json_mode),
    }
}
