//! Ambient cloud credentials
//!
//! Storage and warehouse clients ask a [`TokenProvider`] for an OAuth access
//! token before each call. On the scheduled platform the token comes from the
//! instance metadata server; elsewhere an explicit token can be configured.

use super::models::MetadataToken;
use crate::adapters::http::{build_client, error_body};
use crate::config::{GcpConfig, SecretString};
use crate::domain::{FetcherError, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use std::sync::Arc;

const METADATA_TOKEN_PATH: &str =
    "/computeMetadata/v1/instance/service-accounts/default/token";

/// Supplies bearer tokens for Google APIs
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a currently valid access token
    ///
    /// # Errors
    ///
    /// Returns [`FetcherError::Authentication`] if no token can be obtained.
    async fn access_token(&self) -> Result<String>;
}

/// Provider returning a fixed, pre-issued token
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.expose_secret().as_ref().to_string())
    }
}

/// Provider that asks the instance metadata server for the default
/// service account's token
pub struct MetadataTokenProvider {
    base_url: String,
    client: Client,
}

impl MetadataTokenProvider {
    /// Creates a provider for the given metadata server root
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_client(timeout_seconds)?,
        })
    }
}

#[async_trait]
impl TokenProvider for MetadataTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let url = format!("{}{}", self.base_url, METADATA_TOKEN_PATH);

        let response = self
            .client
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| {
                FetcherError::Authentication(format!("Metadata server unreachable: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(FetcherError::Authentication(format!(
                "Metadata server returned {status}: {body}"
            )));
        }

        let token: MetadataToken = response.json().await.map_err(|e| {
            FetcherError::Authentication(format!("Invalid metadata token response: {e}"))
        })?;

        tracing::debug!(expires_in = token.expires_in, "Obtained access token from metadata server");

        Ok(token.access_token)
    }
}

/// Picks the explicit token when configured, the metadata server otherwise
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn token_provider_from_config(
    config: &GcpConfig,
    timeout_seconds: u64,
) -> Result<Arc<dyn TokenProvider>> {
    match &config.access_token {
        Some(token) if !token.expose_secret().is_blank() => {
            tracing::debug!("Using configured GCP access token");
            Ok(Arc::new(StaticTokenProvider::new(token.clone())))
        }
        _ => {
            tracing::debug!(metadata_url = %config.metadata_url, "Using metadata server credentials");
            Ok(Arc::new(MetadataTokenProvider::new(
                config.metadata_url.clone(),
                timeout_seconds,
            )?))
        }
    }
}
