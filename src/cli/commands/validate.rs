//! Validate config command implementation
//!
//! This module implements the `validate-config` command, which resolves the
//! configuration exactly as `run` would and prints a summary with every
//! secret redacted.

use crate::config::{finalize_config, RunConfig, StorageBackend};
use crate::core::run::{EXIT_CONFIGURATION, EXIT_SUCCESS};
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, loaded: Result<RunConfig>) -> anyhow::Result<i32> {
        tracing::info!("Validating configuration");

        let mut config = match loaded {
            Ok(c) => {
                println!("✅ Configuration loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIGURATION);
            }
        };

        match finalize_config(&mut config) {
            Ok(warnings) => {
                println!("✅ Configuration is valid");
                for warning in &warnings {
                    println!("⚠️  {warning}");
                }
                println!();
                println!("Configuration Summary:");
                for line in summary_lines(&config) {
                    println!("  {line}");
                }
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIGURATION)
            }
        }
    }
}

/// Human-readable configuration summary; secrets appear only as `set`/`not set`
pub fn summary_lines(config: &RunConfig) -> Vec<String> {
    let presence = |set: bool| if set { "set" } else { "not set" };

    let mut lines = vec![
        format!("Log Level: {}", config.application.log_level),
        format!(
            "Request Timeout: {}s",
            config.application.request_timeout_seconds
        ),
        format!("Opportunities API: {}", config.sam.base_url),
        format!("API Key: {}", presence(config.sam.api_key.is_some())),
        format!("Organization Codes: {}", config.sam.org_codes.join(", ")),
    ];

    match config.storage.backend {
        StorageBackend::Gcs => lines.push(format!(
            "Storage: gs://{}/{}",
            config.storage.bucket, config.storage.prefix
        )),
        StorageBackend::Local => lines.push(format!(
            "Storage: local directory {}/{}",
            config.storage.local_root.as_deref().unwrap_or(""),
            config.storage.prefix
        )),
    }

    if config.warehouse.is_enabled() {
        lines.push(format!("Warehouse: {}", config.warehouse.full_table_id()));
    } else {
        lines.push("Warehouse: disabled".to_string());
    }

    if config.email.enabled {
        lines.push(format!(
            "Email: enabled via {} to {}",
            config.email.mailgun_domain.as_deref().unwrap_or(""),
            config.email.recipient.as_deref().unwrap_or("")
        ));
    } else {
        lines.push("Email: disabled".to_string());
    }

    lines.push(format!(
        "Cloud Credentials: {}",
        if config.gcp.access_token.is_some() {
            "access token"
        } else {
            "metadata server"
        }
    ));

    lines
}
