//! Run command implementation
//!
//! This module implements the `run` command: one fetch-persist-notify cycle
//! for a single posted-date range.

use crate::config::{finalize_config, RunConfig, StorageBackend};
use crate::core::run::{configuration_failure, Collaborators, RunOrchestrator, RunRequest};
use crate::domain::Result;
use clap::Args;
use std::path::PathBuf;
use uuid::Uuid;

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Start of the posted-date range (MM/DD/YYYY); defaults to yesterday
    #[arg(long, value_name = "MM/DD/YYYY")]
    pub posted_from: Option<String>,

    /// End of the posted-date range (MM/DD/YYYY); defaults to yesterday
    #[arg(long, value_name = "MM/DD/YYYY")]
    pub posted_to: Option<String>,

    /// Override organization code(s) to search (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub org_codes: Option<Vec<String>>,

    /// Write the durable copy to a local directory instead of Cloud Storage
    #[arg(long, value_name = "DIR")]
    pub local_output: Option<PathBuf>,

    /// Skip the warehouse insert
    #[arg(long)]
    pub no_warehouse: bool,

    /// Skip the summary email
    #[arg(long)]
    pub no_email: bool,
}

impl RunArgs {
    /// Execute the run command
    ///
    /// `loaded` is the configuration as read from file and environment,
    /// before command-line overrides and validation.
    pub async fn execute(&self, loaded: Result<RunConfig>) -> anyhow::Result<i32> {
        let run_id = Uuid::new_v4().to_string();
        tracing::info!(run_id = %run_id, "Starting run command");

        let mut config = match loaded {
            Ok(config) => config,
            Err(e) => return Ok(configuration_failure(&run_id, e.to_string()).exit_code()),
        };

        self.apply_overrides(&mut config);

        match finalize_config(&mut config) {
            Ok(warnings) => {
                for warning in warnings {
                    tracing::warn!("{}", warning);
                }
            }
            Err(e) => return Ok(configuration_failure(&run_id, e.to_string()).exit_code()),
        }

        let collaborators = match Collaborators::from_config(&config) {
            Ok(collaborators) => collaborators,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize adapters");
                return Ok(configuration_failure(&run_id, e.to_string()).exit_code());
            }
        };

        let request = RunRequest {
            posted_from: self.posted_from.clone(),
            posted_to: self.posted_to.clone(),
        };

        let orchestrator = RunOrchestrator::new(config, collaborators);
        let now = chrono::Local::now().naive_local();
        let summary = orchestrator.run(&request, &run_id, now).await;

        Ok(summary.exit_code())
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut RunConfig) {
        if let Some(codes) = &self.org_codes {
            let codes: Vec<String> = codes
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if codes.is_empty() {
                tracing::warn!("--org-codes has no codes, keeping configured organizations");
            } else {
                tracing::info!(org_codes = ?codes, "Overriding organization codes from CLI");
                config.sam.org_codes = codes;
            }
        }

        if let Some(dir) = &self.local_output {
            tracing::info!(dir = %dir.display(), "Writing output to local directory");
            config.storage.backend = StorageBackend::Local;
            config.storage.local_root = Some(dir.display().to_string());
        }

        if self.no_warehouse {
            tracing::info!("Disabling warehouse insert from CLI");
            config.warehouse.enabled = Some(false);
        }

        if self.no_email {
            tracing::info!("Disabling email notifications from CLI");
            config.email.enabled = false;
        }
    }
}
