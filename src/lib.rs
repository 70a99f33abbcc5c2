// Contract Fetcher - SAM.gov opportunities batch job
// Copyright (c) 2025 Contract Fetcher Contributors
// Licensed under the MIT License

//! # Contract Fetcher - SAM.gov Opportunities Batch Job
//!
//! Contract Fetcher is a scheduled batch job that pulls newly posted federal
//! contract opportunities from the SAM.gov search API, normalizes them into a
//! flat record shape, and delivers them to Cloud Storage, BigQuery and an
//! optional summary email.
//!
//! ## Overview
//!
//! One invocation covers one posted-date range (yesterday by default):
//! - **Fetching** one search per configured organization code, deduplicated by notice id
//! - **Normalizing** each raw opportunity into a [`domain::NormalizedContract`]
//! - **Persisting** a pretty-printed JSON artifact to the object store, and rows to the warehouse
//! - **Notifying** recipients with an HTML/text summary
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (fetch, transform, persist, run)
//! - [`adapters`] - External integrations (SAM.gov, Cloud Storage, BigQuery, Mailgun)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contract_fetcher::config::load_config;
//! use contract_fetcher::core::run::{Collaborators, RunOrchestrator, RunRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (config, _warnings) = load_config(None)?;
//!     let collaborators = Collaborators::from_config(&config)?;
//!     let orchestrator = RunOrchestrator::new(config, collaborators);
//!
//!     let now = chrono::Local::now().naive_local();
//!     let summary = orchestrator.run(&RunRequest::default(), "manual", now).await;
//!
//!     println!("Fetched {} contracts", summary.fetched);
//!     std::process::exit(summary.exit_code());
//! }
//! ```
//!
//! ## Failure Model
//!
//! Missing configuration and a failed durable write end the run in `FAILED`.
//! Everything else (a failed organization fetch, warehouse insert, email or
//! cleanup) is logged as a warning and the run still reaches `DONE`:
//!
//! | Exit code | Meaning |
//! |-----------|---------|
//! | 0 | Run reached `DONE` |
//! | 2 | Configuration missing or invalid |
//! | 5 | Durable write failed |
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], an alias over [`domain::FetcherError`]:
//!
//! ```rust,no_run
//! use contract_fetcher::domain::FetcherError;
//!
//! fn example() -> Result<(), FetcherError> {
//!     let (_config, _warnings) = contract_fetcher::config::load_config(None)?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
