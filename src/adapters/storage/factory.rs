//! Sink factory
//!
//! This module builds the object store and the optional warehouse from
//! configuration.

use super::local::LocalObjectStore;
use super::traits::{ObjectStore, Warehouse};
use crate::adapters::gcp::{token_provider_from_config, BigQueryWarehouse, GcsObjectStore, TokenProvider};
use crate::config::schema::{RunConfig, StorageBackend};
use crate::domain::{FetcherError, Result};
use std::sync::Arc;

/// The two sinks of a run
pub struct Sinks {
    /// Durable object store (fatal on failure)
    pub object_store: Arc<dyn ObjectStore>,

    /// Warehouse, `None` when warehouse sync is disabled
    pub warehouse: Option<Arc<dyn Warehouse>>,
}

/// Create the sinks described by the configuration
///
/// A token provider is only created when a Google API is actually used.
///
/// # Errors
///
/// Returns an error if a client cannot be built or a required setting is
/// missing.
pub fn create_sinks(config: &RunConfig) -> Result<Sinks> {
    let timeout = config.application.request_timeout_seconds;
    let needs_tokens =
        config.storage.backend == StorageBackend::Gcs || config.warehouse.is_enabled();

    let tokens: Option<Arc<dyn TokenProvider>> = if needs_tokens {
        Some(token_provider_from_config(&config.gcp, timeout)?)
    } else {
        None
    };

    let object_store: Arc<dyn ObjectStore> = match config.storage.backend {
        StorageBackend::Gcs => {
            tracing::info!(bucket = %config.storage.bucket, "Creating GCS object store");
            Arc::new(GcsObjectStore::new(
                config.storage.base_url.clone(),
                config.storage.bucket.clone(),
                require_tokens(&tokens)?,
                timeout,
            )?)
        }
        StorageBackend::Local => {
            let root = config.storage.local_root.clone().ok_or_else(|| {
                FetcherError::Configuration(
                    "storage.local_root is required for the local backend".to_string(),
                )
            })?;
            tracing::info!(root = %root, "Creating local object store");
            Arc::new(LocalObjectStore::new(root))
        }
    };

    let warehouse: Option<Arc<dyn Warehouse>> = if config.warehouse.is_enabled() {
        tracing::info!(table = %config.warehouse.full_table_id(), "Creating BigQuery warehouse");
        Some(Arc::new(BigQueryWarehouse::new(
            &config.warehouse,
            require_tokens(&tokens)?,
            timeout,
        )?))
    } else {
        tracing::info!("Warehouse sync disabled");
        None
    };

    Ok(Sinks {
        object_store,
        warehouse,
    })
}

fn require_tokens(tokens: &Option<Arc<dyn TokenProvider>>) -> Result<Arc<dyn TokenProvider>> {
    tokens
        .clone()
        .ok_or_else(|| FetcherError::Other("No credential provider available".to_string()))
}
