//! BigQuery warehouse using the streaming `tabledata.insertAll` API
//!
//! Rows are sent in chunks of at most `max_rows_per_request`. Chunks already
//! accepted stay inserted when a later chunk fails; the insert as a whole is
//! still reported as failed.

use super::auth::TokenProvider;
use super::models::{InsertAllRequest, InsertAllResponse, InsertAllRow, WarehouseRow};
use crate::adapters::http::{build_client, error_body};
use crate::adapters::storage::Warehouse;
use crate::config::WarehouseConfig;
use crate::domain::{FetcherError, NormalizedContract, Result, WarehouseError};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

/// Warehouse backed by one BigQuery table
pub struct BigQueryWarehouse {
    base_url: String,
    project_id: String,
    dataset: String,
    table: String,
    max_rows_per_request: usize,
    client: Client,
    tokens: Arc<dyn TokenProvider>,
}

impl BigQueryWarehouse {
    /// Creates a warehouse client for the configured table
    ///
    /// # Errors
    ///
    /// Returns an error if no project id is configured or the HTTP client
    /// cannot be built.
    pub fn new(
        config: &WarehouseConfig,
        tokens: Arc<dyn TokenProvider>,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let project_id = config.project().ok_or_else(|| {
            FetcherError::Configuration("PROJECT_ID is required for BigQuery".to_string())
        })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            dataset: config.dataset.clone(),
            table: config.table.clone(),
            max_rows_per_request: config.max_rows_per_request.max(1),
            client: build_client(timeout_seconds)?,
            tokens,
        })
    }

    fn insert_url(&self) -> String {
        format!(
            "{}/bigquery/v2/projects/{}/datasets/{}/tables/{}/insertAll",
            self.base_url, self.project_id, self.dataset, self.table
        )
    }

    async fn insert_chunk(&self, token: &str, chunk: &[NormalizedContract]) -> Result<usize> {
        let rows = chunk
            .iter()
            .map(|contract| InsertAllRow {
                json: WarehouseRow::from(contract),
            })
            .collect();

        let response = self
            .client
            .post(self.insert_url())
            .bearer_auth(token)
            .json(&InsertAllRequest::new(rows))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WarehouseError::Timeout(e.to_string())
                } else {
                    WarehouseError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = error_body(response).await;
            return Err(WarehouseError::InsertFailed {
                table: self.table_id(),
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body: InsertAllResponse = response.json().await.map_err(|e| {
            FetcherError::Serialization(format!("Invalid insertAll response: {e}"))
        })?;

        if let Some(first) = body.insert_errors.first() {
            let first_error = first
                .errors
                .first()
                .map(|e| format!("row {}: {} ({})", first.index, e.message, e.reason))
                .unwrap_or_else(|| format!("row {} rejected", first.index));

            return Err(WarehouseError::RowErrors {
                failed: body.insert_errors.len(),
                total: chunk.len(),
                first_error,
            }
            .into());
        }

        Ok(chunk.len())
    }
}

#[async_trait]
impl Warehouse for BigQueryWarehouse {
    async fn insert_rows(&self, contracts: &[NormalizedContract]) -> Result<usize> {
        if contracts.is_empty() {
            return Ok(0);
        }

        let token = self.tokens.access_token().await?;
        let mut inserted = 0;

        for (index, chunk) in contracts.chunks(self.max_rows_per_request).enumerate() {
            let count = self.insert_chunk(&token, chunk).await?;
            inserted += count;
            tracing::debug!(
                chunk = index,
                rows = count,
                inserted_so_far = inserted,
                "Inserted warehouse chunk"
            );
        }

        Ok(inserted)
    }

    fn table_id(&self) -> String {
        format!("{}.{}.{}", self.project_id, self.dataset, self.table)
    }
}
