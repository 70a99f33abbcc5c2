//! Google Cloud Storage object store
//!
//! Uploads use the JSON API simple media upload:
//! `POST {base}/upload/storage/v1/b/{bucket}/o?uploadType=media&name={key}`.

use super::auth::TokenProvider;
use super::models::ObjectResource;
use crate::adapters::http::{build_client, error_body};
use crate::adapters::storage::ObjectStore;
use crate::domain::{Result, StorageError};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;

/// Object store backed by a GCS bucket
pub struct GcsObjectStore {
    base_url: String,
    bucket: String,
    client: Client,
    tokens: Arc<dyn TokenProvider>,
}

impl GcsObjectStore {
    /// Creates a store for `bucket`
    ///
    /// # Arguments
    ///
    /// * `base_url` - Storage API root (`https://storage.googleapis.com`)
    /// * `bucket` - Bucket name
    /// * `tokens` - Source of bearer tokens
    /// * `timeout_seconds` - Hard timeout for each upload
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        bucket: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
        timeout_seconds: u64,
    ) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            client: build_client(timeout_seconds)?,
            tokens,
        })
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/storage/v1/b/{}/o", self.base_url, self.bucket)
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn put_file(&self, key: &str, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            StorageError::LocalFile(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let size = bytes.len();

        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(self.upload_url())
            .query(&[("uploadType", "media"), ("name", key)])
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StorageError::Timeout(e.to_string())
                } else {
                    StorageError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = error_body(response).await;
            return Err(StorageError::UploadFailed {
                object: key.to_string(),
                status: status.as_u16(),
                message,
            }
            .into());
        }

        match response.json::<ObjectResource>().await {
            Ok(object) => tracing::debug!(
                bucket = %object.bucket,
                name = %object.name,
                size = ?object.size,
                "Object stored"
            ),
            Err(e) => tracing::debug!(error = %e, "Upload confirmed without object metadata"),
        }

        let uri = format!("gs://{}/{}", self.bucket, key);
        tracing::debug!(uri = %uri, bytes = size, "Uploaded file to GCS");

        Ok(uri)
    }

    fn destination(&self) -> String {
        format!("gs://{}", self.bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gcp::auth::StaticTokenProvider;
    use crate::adapters::http::unresponsive_endpoint;
    use crate::config::secret_string;
    use crate::core::persist::Persister;
    use crate::domain::{DateRange, FetchBatch, FetcherError, NormalizedContract};
    use chrono::NaiveDate;
    use mockito::Matcher;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn store_for(server: &mockito::ServerGuard) -> GcsObjectStore {
        let tokens: Arc<dyn TokenProvider> =
            Arc::new(StaticTokenProvider::new(secret_string("ya29.test")));
        GcsObjectStore::new(server.url(), "gov-contracts", tokens, 5).unwrap()
    }

    fn artifact() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"[{"notice_id":"N1"}]"#).unwrap();
        file
    }

    #[tokio::test]
    async fn test_put_file_uploads_media() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload/storage/v1/b/gov-contracts/o")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("uploadType".into(), "media".into()),
                Matcher::UrlEncoded(
                    "name".into(),
                    "contracts/contracts_2025-01-15.json".into(),
                ),
            ]))
            .match_header("authorization", "Bearer ya29.test")
            .match_header("content-type", "application/json")
            .match_body(r#"[{"notice_id":"N1"}]"#)
            .with_status(200)
            .with_body(
                r#"{"bucket":"gov-contracts","name":"contracts/contracts_2025-01-15.json","size":"20"}"#,
            )
            .create_async()
            .await;

        let file = artifact();
        let uri = store_for(&server)
            .put_file("contracts/contracts_2025-01-15.json", file.path())
            .await
            .unwrap();

        assert_eq!(uri, "gs://gov-contracts/contracts/contracts_2025-01-15.json");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_file_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/upload/storage/v1/b/gov-contracts/o")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("permission denied")
            .create_async()
            .await;

        let file = artifact();
        let err = store_for(&server)
            .put_file("contracts/x.json", file.path())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetcherError::Storage(StorageError::UploadFailed { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_put_file_missing_local_file() {
        let server = mockito::Server::new_async().await;
        let err = store_for(&server)
            .put_file("contracts/x.json", Path::new("/nonexistent/contracts.json"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetcherError::Storage(StorageError::LocalFile(_))));
    }

    #[test]
    fn test_destination() {
        let tokens: Arc<dyn TokenProvider> =
            Arc::new(StaticTokenProvider::new(secret_string("t")));
        let store = GcsObjectStore::new("https://storage.googleapis.com/", "bucket", tokens, 5)
            .unwrap();
        assert_eq!(store.destination(), "gs://bucket");
        assert_eq!(
            store.upload_url(),
            "https://storage.googleapis.com/upload/storage/v1/b/bucket/o"
        );
    }

    async fn stalled_store() -> GcsObjectStore {
        let tokens: Arc<dyn TokenProvider> =
            Arc::new(StaticTokenProvider::new(secret_string("ya29.test")));
        GcsObjectStore::new(unresponsive_endpoint().await, "gov-contracts", tokens, 1).unwrap()
    }

    #[tokio::test]
    async fn test_put_file_timeout() {
        let file = artifact();
        let err = stalled_store()
            .await
            .put_file("contracts/x.json", file.path())
            .await
            .unwrap_err();

        assert!(matches!(err, FetcherError::Storage(StorageError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_upload_timeout_fails_persist_and_cleans_up() {
        let work_dir = tempfile::tempdir().unwrap();
        let persister = Persister::new(
            Arc::new(stalled_store().await),
            None,
            work_dir.path(),
            "contracts",
        );
        let batch = FetchBatch::new(
            vec![NormalizedContract {
                notice_id: "N1".to_string(),
                ..Default::default()
            }],
            DateRange::new("01/15/2025", "01/15/2025"),
        );
        let now = NaiveDate::from_ymd_opt(2025, 1, 16)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();

        let err = persister.persist(&batch, now).await.unwrap_err();

        assert!(matches!(err, FetcherError::Storage(StorageError::Timeout(_))));
        assert_eq!(std::fs::read_dir(work_dir.path()).unwrap().count(), 0);
    }
}
