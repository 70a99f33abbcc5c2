// Contract Fetcher - SAM.gov opportunities batch job
// Copyright (c) 2025 Contract Fetcher Contributors
// Licensed under the MIT License

use contract_fetcher::cli::{Cli, Commands};
use contract_fetcher::config::{load_config_with, LogFormat, LoggingConfig, RunConfig};
use contract_fetcher::core::run::{EXIT_CONFIGURATION, EXIT_FATAL};
use contract_fetcher::domain::Result;
use contract_fetcher::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Read configuration once; logging settings come from it when it loads,
    // errors are reported by the command after logging is up
    let loaded = load_config_with(cli.config.as_deref(), |name| std::env::var(name).ok());

    let (config_level, log_format, logging_config) = match &loaded {
        Ok(config) => (
            config.application.log_level.clone(),
            config.application.log_format,
            config.logging.clone(),
        ),
        Err(_) => ("info".to_string(), LogFormat::Text, LoggingConfig::default()),
    };
    let log_level = cli.log_level.clone().unwrap_or(config_level);

    let guard = match init_logging(&log_level, log_format, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_CONFIGURATION);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Contract Fetcher - SAM.gov opportunities batch job"
    );

    let exit_code = match execute_command(&cli, loaded).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors; flush the file writer first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, loaded: Result<RunConfig>) -> anyhow::Result<i32> {
    match cli.command() {
        Commands::Run(args) => args.execute(loaded).await,
        Commands::ValidateConfig(args) => args.execute(loaded).await,
    }
}
