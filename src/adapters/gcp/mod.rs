//! Google Cloud adapters
//!
//! This module provides the Cloud Storage object store, the BigQuery
//! warehouse, and the credential providers they share.

pub mod auth;
pub mod bigquery;
pub mod models;
pub mod storage;

pub use auth::{
    token_provider_from_config, MetadataTokenProvider, StaticTokenProvider, TokenProvider,
};
pub use bigquery::BigQueryWarehouse;
pub use models::WarehouseRow;
pub use storage::GcsObjectStore;
