//! Core business logic.
//!
//! This module contains the fetch-normalize-persist pipeline and the run
//! orchestration around it.
//!
//! # Modules
//!
//! - [`fetch`] - Multi-organization fetch with deduplication
//! - [`transform`] - Raw opportunity normalization
//! - [`persist`] - Local artifact, object store and warehouse persistence
//! - [`run`] - Run state machine, orchestration and summary
//!
//! # Run Workflow
//!
//! 1. **Configure**: Validate the resolved configuration
//! 2. **Fetch**: One search per organization code, merged and deduplicated
//! 3. **Normalize**: Flatten every raw opportunity
//! 4. **Persist**: Local JSON, object store (fatal), warehouse (recoverable)
//! 5. **Notify**: Hand the batch to each notifier (recoverable)
//! 6. **Report**: Log the run summary and map it to an exit status
//!
//! # Example
//!
//! ```rust,no_run
//! use contract_fetcher::config::load_config;
//! use contract_fetcher::core::run::{Collaborators, RunOrchestrator, RunRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (config, _warnings) = load_config(None)?;
//! let collaborators = Collaborators::from_config(&config)?;
//! let orchestrator = RunOrchestrator::new(config, collaborators);
//!
//! let now = chrono::Local::now().naive_local();
//! let summary = orchestrator.run(&RunRequest::default(), "manual", now).await;
//!
//! println!("Fetched: {}", summary.fetched);
//! println!("Exit code: {}", summary.exit_code());
//! # Ok(())
//! # }
//! ```

pub mod fetch;
pub mod persist;
pub mod run;
pub mod transform;
