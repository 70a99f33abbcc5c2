//! Shared HTTP client construction

use crate::domain::{FetcherError, Result};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// User agent sent with every outbound request
pub const USER_AGENT: &str = concat!("contract-fetcher/", env!("CARGO_PKG_VERSION"));

/// Builds a client whose every request is bounded by `timeout_seconds`
///
/// # Errors
///
/// Returns [`FetcherError::Configuration`] if the TLS backend cannot be
/// initialised.
pub fn build_client(timeout_seconds: u64) -> Result<Client> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_seconds))
        .connect_timeout(Duration::from_secs(timeout_seconds.min(30)))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FetcherError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Reads a response body for an error message, never failing
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    truncate(&body, 500)
}

fn truncate(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &value[..idx]),
        None => value.to_string(),
    }
}

/// Base URL of a local listener that accepts connections and never replies
#[cfg(test)]
pub(crate) async fn unresponsive_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}
