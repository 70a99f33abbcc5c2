//! Result type alias

use super::errors::FetcherError;

/// Result type alias for contract fetcher operations
///
/// # Examples
///
/// ```
/// use contract_fetcher::domain::result::Result;
/// use contract_fetcher::domain::errors::FetcherError;
///
/// fn failing_function() -> Result<()> {
///     Err(FetcherError::Configuration("GCS_BUCKET_NAME not set".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, FetcherError>;
