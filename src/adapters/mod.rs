//! External system integrations.
//!
//! This module provides adapters for the systems a run talks to:
//!
//! - [`sam`] - Opportunities search API (SAM.gov)
//! - [`storage`] - Sink traits, local directory store, sink factory
//! - [`gcp`] - Cloud Storage, BigQuery and credential providers
//! - [`notify`] - Notification channels (Mailgun email)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations. The core only depends on the
//! traits ([`sam::OpportunitySource`], [`storage::ObjectStore`],
//! [`storage::Warehouse`], [`notify::Notifier`]).
//!
//! # Opportunities API
//!
//! ```rust,no_run
//! use contract_fetcher::adapters::sam::SamClient;
//! use contract_fetcher::config::SamConfig;
//!
//! # fn example() -> contract_fetcher::domain::Result<()> {
//! let client = SamClient::new(&SamConfig::default(), 30)?;
//! println!("Searching {}", client.base_url());
//! # Ok(())
//! # }
//! ```
//!
//! # Sinks
//!
//! ```rust,no_run
//! use contract_fetcher::adapters::storage::create_sinks;
//! use contract_fetcher::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (config, _warnings) = load_config(None)?;
//! let sinks = create_sinks(&config)?;
//! println!("Writing to {}", sinks.object_store.destination());
//! # Ok(())
//! # }
//! ```

pub mod gcp;
pub mod http;
pub mod notify;
pub mod sam;
pub mod storage;
