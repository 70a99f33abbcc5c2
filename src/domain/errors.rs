//! Domain error types
//!
//! This module defines the error hierarchy for the contract fetcher.
//! Adapters translate third-party errors (reqwest, serde, std::io) into these
//! types at their boundary, so nothing above the adapter layer depends on a
//! particular HTTP client or cloud SDK.

use thiserror::Error;

/// Main error type
///
/// Every fallible operation in the crate returns this type. Whether a given
/// error is fatal to a run is decided by the orchestrator, not by the variant.
#[derive(Debug, Error)]
pub enum FetcherError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Opportunities API errors
    #[error("Opportunities API error: {0}")]
    Api(#[from] ApiError),

    /// Object storage errors
    #[error("Object storage error: {0}")]
    Storage(#[from] StorageError),

    /// Warehouse errors
    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    /// Notification transport errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Credential acquisition errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors returned by the opportunities search API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, TLS, connection reset)
    #[error("Failed to connect to opportunities API: {0}")]
    ConnectionFailed(String),

    /// Request exceeded the configured timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx), including a rejected API key
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Body could not be decoded as a search response
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Builds a client or server error from an HTTP status and body
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status >= 500 {
            ApiError::ServerError { status, message }
        } else {
            ApiError::ClientError { status, message }
        }
    }
}

/// Errors from the durable object store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transport-level failure
    #[error("Failed to connect to object storage: {0}")]
    ConnectionFailed(String),

    /// Upload exceeded the configured timeout
    #[error("Upload timeout: {0}")]
    Timeout(String),

    /// Store rejected the upload
    #[error("Upload of {object} failed with status {status}: {message}")]
    UploadFailed {
        object: String,
        status: u16,
        message: String,
    },

    /// Local artifact could not be written, read or copied
    #[error("Local artifact error: {0}")]
    LocalFile(String),
}

/// Errors from the tabular warehouse
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Transport-level failure
    #[error("Failed to connect to warehouse: {0}")]
    ConnectionFailed(String),

    /// Insert request exceeded the configured timeout
    #[error("Insert timeout: {0}")]
    Timeout(String),

    /// Warehouse rejected the request as a whole
    #[error("Insert into {table} failed with status {status}: {message}")]
    InsertFailed {
        table: String,
        status: u16,
        message: String,
    },

    /// Request accepted but individual rows were rejected
    #[error("{failed}/{total} rows rejected: {first_error}")]
    RowErrors {
        failed: usize,
        total: usize,
        first_error: String,
    },
}

impl From<std::io::Error> for FetcherError {
    fn from(err: std::io::Error) -> Self {
        FetcherError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FetcherError {
    fn from(err: serde_json::Error) -> Self {
        FetcherError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for FetcherError {
    fn from(err: toml::de::Error) -> Self {
        FetcherError::Configuration(format!("TOML parse error: {err}"))
    }
}
