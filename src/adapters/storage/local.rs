//! Local directory object store
//!
//! Stands in for the bucket when testing the job on a workstation: objects
//! are copied to `<root>/<key>` and addressed with `file://` URIs.

use super::traits::ObjectStore;
use crate::domain::{Result, StorageError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Object store writing into a local directory
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory objects are written under
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_file(&self, key: &str, path: &Path) -> Result<String> {
        let target = self.root.join(key);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::LocalFile(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let bytes = tokio::fs::copy(path, &target).await.map_err(|e| {
            StorageError::LocalFile(format!(
                "Failed to copy {} to {}: {}",
                path.display(),
                target.display(),
                e
            ))
        })?;

        let absolute = tokio::fs::canonicalize(&target)
            .await
            .unwrap_or_else(|_| target.clone());

        tracing::debug!(target = %absolute.display(), bytes = bytes, "Copied file to local store");

        Ok(format!("file://{}", absolute.display()))
    }

    fn destination(&self) -> String {
        self.root.display().to_string()
    }
}
