//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the contract fetcher using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Contract Fetcher - SAM.gov opportunities batch job
#[derive(Parser, Debug)]
#[command(name = "contract-fetcher")]
#[command(version, about, long_about = None)]
#[command(author = "Contract Fetcher Contributors")]
pub struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "CONTRACTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to execute; `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The command to execute, defaulting to a plain `run`
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(commands::run::RunArgs::default()))
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fetch, persist and report one date range of contract opportunities
    Run(commands::run::RunArgs),

    /// Validate configuration and print a redacted summary
    ValidateConfig(commands::validate::ValidateArgs),
}
