//! Dual-sink persister
//!
//! Writes a batch to a local JSON artifact, uploads it to the object store,
//! then inserts the same batch into the warehouse. The upload is fatal on
//! failure; the warehouse insert is not. The local artifact is removed once
//! the sinks have been attempted.

use super::filename::{contract_filename, object_key};
use crate::adapters::storage::{ObjectStore, Warehouse};
use crate::domain::{
    DateRange, FetchBatch, FetcherError, NormalizedContract, Result, StorageError,
};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use std::sync::Arc;

/// The transient local copy of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    pub path: PathBuf,
    pub filename: String,
    pub bytes: u64,
}

/// What happened to the warehouse sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarehouseOutcome {
    /// Warehouse sync is not configured
    Disabled,
    /// Nothing to insert
    SkippedEmpty,
    /// Rows inserted
    Inserted(usize),
    /// Insert failed; the run continues
    Failed(String),
}

impl WarehouseOutcome {
    /// Rows inserted, if the insert ran and succeeded
    pub fn rows(&self) -> Option<usize> {
        match self {
            WarehouseOutcome::Inserted(rows) => Some(*rows),
            _ => None,
        }
    }
}

/// Result of a successful persist (the durable write succeeded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    pub object_uri: String,
    pub artifact: LocalArtifact,
    pub warehouse: WarehouseOutcome,
    /// Set when the local artifact could not be removed
    pub cleanup_error: Option<String>,
}

/// Writes batches to the object store and the warehouse
pub struct Persister {
    object_store: Arc<dyn ObjectStore>,
    warehouse: Option<Arc<dyn Warehouse>>,
    work_dir: PathBuf,
    prefix: String,
}

impl Persister {
    /// Create a new persister
    ///
    /// # Arguments
    ///
    /// * `object_store` - Durable sink
    /// * `warehouse` - Secondary sink, `None` to skip warehouse sync
    /// * `work_dir` - Directory for the transient local artifact
    /// * `prefix` - Logical prefix for object keys
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        warehouse: Option<Arc<dyn Warehouse>>,
        work_dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            object_store,
            warehouse,
            work_dir: work_dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Serializes the contracts as a pretty-printed JSON array in the work dir
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::LocalFile`] if the directory or file cannot be
    /// written.
    pub async fn write_local(
        &self,
        contracts: &[NormalizedContract],
        range: &DateRange,
        now: NaiveDateTime,
    ) -> Result<LocalArtifact> {
        let filename = contract_filename(range, now);
        let path = self.work_dir.join(&filename);

        let json = serde_json::to_vec_pretty(contracts)?;

        tokio::fs::create_dir_all(&self.work_dir).await.map_err(|e| {
            StorageError::LocalFile(format!(
                "Failed to create work directory {}: {}",
                self.work_dir.display(),
                e
            ))
        })?;

        tokio::fs::write(&path, &json).await.map_err(|e| {
            StorageError::LocalFile(format!("Failed to write {}: {}", path.display(), e))
        })?;

        let artifact = LocalArtifact {
            path,
            filename,
            bytes: json.len() as u64,
        };

        tracing::info!(
            path = %artifact.path.display(),
            bytes = artifact.bytes,
            records = contracts.len(),
            "Wrote local artifact"
        );

        Ok(artifact)
    }

    /// Uploads the artifact under `<prefix>/<filename>`
    ///
    /// # Errors
    ///
    /// Any failure is returned; there is no partial success.
    pub async fn upload_object(&self, artifact: &LocalArtifact) -> Result<String> {
        let key = object_key(&self.prefix, &artifact.filename);
        let uri = self.object_store.put_file(&key, &artifact.path).await?;

        tracing::info!(uri = %uri, bytes = artifact.bytes, "Uploaded to object storage");

        Ok(uri)
    }

    /// Inserts the contracts into the warehouse, if one is configured
    ///
    /// Returns `None` when warehouse sync is disabled.
    ///
    /// # Errors
    ///
    /// Returns the warehouse error; callers treat it as recoverable.
    pub async fn insert_warehouse(
        &self,
        contracts: &[NormalizedContract],
    ) -> Result<Option<usize>> {
        let Some(warehouse) = &self.warehouse else {
            return Ok(None);
        };

        let rows = warehouse.insert_rows(contracts).await?;
        tracing::info!(table = %warehouse.table_id(), rows = rows, "Inserted rows into warehouse");
        Ok(Some(rows))
    }

    /// Deletes the local artifact
    ///
    /// # Errors
    ///
    /// Returns [`FetcherError::Io`] if the file exists but cannot be removed.
    pub async fn cleanup(&self, artifact: &LocalArtifact) -> Result<()> {
        match tokio::fs::remove_file(&artifact.path).await {
            Ok(()) => {
                tracing::debug!(path = %artifact.path.display(), "Removed local artifact");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FetcherError::Io(format!(
                "Failed to remove {}: {}",
                artifact.path.display(),
                e
            ))),
        }
    }

    /// Runs the full sequence: local write, upload, warehouse, cleanup
    ///
    /// # Errors
    ///
    /// Returns an error only if the local write or the upload fails. The local
    /// artifact is removed in the upload-failure case too.
    pub async fn persist(&self, batch: &FetchBatch, now: NaiveDateTime) -> Result<PersistOutcome> {
        let artifact = self.write_local(&batch.contracts, &batch.range, now).await?;

        let object_uri = match self.upload_object(&artifact).await {
            Ok(uri) => uri,
            Err(e) => {
                if let Err(cleanup_err) = self.cleanup(&artifact).await {
                    tracing::warn!(error = %cleanup_err, "Failed to remove local artifact");
                }
                return Err(e);
            }
        };

        let warehouse = if self.warehouse.is_none() {
            WarehouseOutcome::Disabled
        } else if batch.is_empty() {
            tracing::info!("No contracts to insert, skipping warehouse");
            WarehouseOutcome::SkippedEmpty
        } else {
            match self.insert_warehouse(&batch.contracts).await {
                Ok(Some(rows)) => WarehouseOutcome::Inserted(rows),
                Ok(None) => WarehouseOutcome::Disabled,
                Err(e) => {
                    tracing::warn!(error = %e, "Warehouse insert failed, data is in object storage");
                    WarehouseOutcome::Failed(e.to_string())
                }
            }
        };

        let cleanup_error = match self.cleanup(&artifact).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to remove local artifact");
                Some(e.to_string())
            }
        };

        Ok(PersistOutcome {
            object_uri,
            artifact,
            warehouse,
            cleanup_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalObjectStore;
    use crate::domain::WarehouseError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct RecordingWarehouse {
        fail: bool,
        calls: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Warehouse for RecordingWarehouse {
        async fn insert_rows(&self, contracts: &[NormalizedContract]) -> Result<usize> {
            self.calls.lock().unwrap().push(contracts.len());
            if self.fail {
                return Err(WarehouseError::ConnectionFailed("down".to_string()).into());
            }
            Ok(contracts.len())
        }

        fn table_id(&self) -> String {
            "p.d.t".to_string()
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ObjectStore for FailingStore {
        async fn put_file(&self, key: &str, _path: &Path) -> Result<String> {
            Err(StorageError::UploadFailed {
                object: key.to_string(),
                status: 503,
                message: "unavailable".to_string(),
            }
            .into())
        }

        fn destination(&self) -> String {
            "gs://failing".to_string()
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 28)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    fn batch(ids: &[&str]) -> FetchBatch {
        let contracts = ids
            .iter()
            .map(|id| NormalizedContract {
                notice_id: id.to_string(),
                ..Default::default()
            })
            .collect();
        FetchBatch::new(contracts, DateRange::new("01/27/2026", "01/27/2026"))
    }

    fn warehouse(fail: bool) -> Arc<RecordingWarehouse> {
        Arc::new(RecordingWarehouse {
            fail,
            calls: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_write_local_is_pretty_json() {
        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let persister = Persister::new(
            Arc::new(LocalObjectStore::new(out.path())),
            None,
            work.path(),
            "contracts",
        );

        let b = batch(&["N1"]);
        let artifact = persister.write_local(&b.contracts, &b.range, now()).await.unwrap();

        assert_eq!(artifact.filename, "contracts_20260127.json");
        let text = std::fs::read_to_string(&artifact.path).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert_eq!(artifact.bytes, text.len() as u64);
        let parsed: Vec<NormalizedContract> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, b.contracts);
    }

    #[tokio::test]
    async fn test_persist_writes_both_sinks_and_cleans_up() {
        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let wh = warehouse(false);
        let persister = Persister::new(
            Arc::new(LocalObjectStore::new(out.path())),
            Some(wh.clone()),
            work.path(),
            "contracts",
        );

        let outcome = persister.persist(&batch(&["N1", "N2"]), now()).await.unwrap();

        assert!(outcome.object_uri.ends_with("contracts/contracts_20260127.json"));
        assert_eq!(outcome.warehouse, WarehouseOutcome::Inserted(2));
        assert!(outcome.cleanup_error.is_none());
        assert!(!outcome.artifact.path.exists());
        assert!(out.path().join("contracts/contracts_20260127.json").exists());
        assert_eq!(*wh.calls.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_warehouse_failure_is_recoverable() {
        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let persister = Persister::new(
            Arc::new(LocalObjectStore::new(out.path())),
            Some(warehouse(true)),
            work.path(),
            "contracts",
        );

        let outcome = persister.persist(&batch(&["N1"]), now()).await.unwrap();

        assert!(matches!(outcome.warehouse, WarehouseOutcome::Failed(_)));
        assert_eq!(outcome.warehouse.rows(), None);
        assert!(!outcome.artifact.path.exists());
    }

    #[tokio::test]
    async fn test_upload_failure_is_fatal_and_skips_warehouse() {
        let work = TempDir::new().unwrap();
        let wh = warehouse(false);
        let persister = Persister::new(
            Arc::new(FailingStore),
            Some(wh.clone()),
            work.path(),
            "contracts",
        );

        let result = persister.persist(&batch(&["N1"]), now()).await;

        assert!(matches!(result, Err(FetcherError::Storage(_))));
        assert!(wh.calls.lock().unwrap().is_empty());
        assert!(!work.path().join("contracts_20260127.json").exists());
    }

    #[tokio::test]
    async fn test_empty_batch_writes_empty_array_and_skips_warehouse() {
        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let wh = warehouse(false);
        let persister = Persister::new(
            Arc::new(LocalObjectStore::new(out.path())),
            Some(wh.clone()),
            work.path(),
            "contracts",
        );

        let outcome = persister.persist(&batch(&[]), now()).await.unwrap();

        assert_eq!(outcome.warehouse, WarehouseOutcome::SkippedEmpty);
        assert!(wh.calls.lock().unwrap().is_empty());
        let stored =
            std::fs::read_to_string(out.path().join("contracts/contracts_20260127.json")).unwrap();
        assert_eq!(stored, "[]");
    }

    #[tokio::test]
    async fn test_cleanup_of_missing_file_is_ok() {
        let work = TempDir::new().unwrap();
        let persister = Persister::new(Arc::new(FailingStore), None, work.path(), "");
        let artifact = LocalArtifact {
            path: work.path().join("gone.json"),
            filename: "gone.json".to_string(),
            bytes: 0,
        };
        assert!(persister.cleanup(&artifact).await.is_ok());
    }
}
