//! Configuration management.
//!
//! This module provides configuration loading from an optional TOML file plus
//! the job's environment variables, and validation of the result.
//!
//! # Overview
//!
//! Configuration is resolved once per invocation into a [`RunConfig`]:
//! - Optional TOML file with `${VAR_NAME}` substitution
//! - Environment overrides (`SAM_API_KEY`, `GCS_BUCKET_NAME`, `ORG_CODES`, ...)
//! - Defaults for everything optional
//! - Validation before any network or storage call
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use contract_fetcher::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (config, warnings) = load_config(None)?;
//! for warning in &warnings {
//!     eprintln!("warning: {warning}");
//! }
//! println!("Bucket: {}", config.storage.bucket);
//! println!("Org codes: {:?}", config.sam.org_codes);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level, log format, request timeout
//! - [`SamConfig`] - Opportunities API key, endpoint, organization codes
//! - [`StorageConfig`] - Durable sink (bucket or local directory) and work dir
//! - [`WarehouseConfig`] - BigQuery project, dataset and table
//! - [`EmailConfig`] - Mailgun settings for the summary email
//! - [`GcpConfig`] - Access token or metadata server
//! - [`LoggingConfig`] - Optional rolling log file
//!
//! # Example Configuration
//!
//! ```toml
//! [sam]
//! api_key = "${SAM_API_KEY}"
//! org_codes = ["070", "047"]
//!
//! [storage]
//! bucket = "gov-contracts"
//! prefix = "contracts"
//!
//! [warehouse]
//! project_id = "my-project"
//! dataset = "contracts_data"
//! table = "contracts"
//!
//! [email]
//! enabled = true
//! mailgun_api_key = "${MAILGUN_API_KEY}"
//! mailgun_domain = "mg.example.com"
//! recipient = "team@example.com"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{finalize_config, load_config, load_config_with};
pub use schema::{
    ApplicationConfig, EmailConfig, GcpConfig, LogFormat, LoggingConfig, RunConfig, SamConfig,
    StorageBackend, StorageConfig, WarehouseConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
