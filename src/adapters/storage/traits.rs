//! Sink abstraction traits
//!
//! This module defines the two sinks a run persists to: the durable
//! [`ObjectStore`] and the secondary tabular [`Warehouse`].

use crate::domain::{NormalizedContract, Result};
use async_trait::async_trait;
use std::path::Path;

/// Durable object storage, the run's source of truth
///
/// An upload either completes or fails; implementations never report a
/// partially written object as success.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Copies the file at `path` to the object named `key`
    ///
    /// Returns the URI of the stored object.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::FetcherError::Storage`] if the file cannot be
    /// read or the store does not confirm the write.
    async fn put_file(&self, key: &str, path: &Path) -> Result<String>;

    /// Human-readable destination, used in logs
    fn destination(&self) -> String;
}

/// Row-insert access to the analytical table
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Inserts one row per contract, returning the number of rows inserted
    ///
    /// There are no upsert semantics: inserting the same contracts twice
    /// produces duplicate rows.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::FetcherError::Warehouse`] if any request or
    /// any row is rejected.
    async fn insert_rows(&self, contracts: &[NormalizedContract]) -> Result<usize>;

    /// Fully qualified table id, used in logs
    fn table_id(&self) -> String;
}
