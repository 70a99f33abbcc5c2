//! Domain models and types.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Records** ([`RawOpportunity`], [`NormalizedContract`], [`FetchBatch`])
//! - **Value types** ([`DateRange`], [`OrgCode`])
//! - **Error types** ([`FetcherError`], [`ApiError`], [`StorageError`], [`WarehouseError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, FetcherError>`]:
//!
//! ```rust
//! use contract_fetcher::domain::{FetcherError, Result};
//!
//! fn require_bucket(bucket: &str) -> Result<()> {
//!     if bucket.is_empty() {
//!         return Err(FetcherError::Configuration("GCS_BUCKET_NAME not set".into()));
//!     }
//!     Ok(())
//! }
//! ```

pub mod contract;
pub mod date_range;
pub mod errors;
pub mod ids;
pub mod result;

pub use contract::{FetchBatch, NormalizedContract, RawOpportunity};
pub use date_range::DateRange;
pub use errors::{ApiError, FetcherError, StorageError, WarehouseError};
pub use ids::OrgCode;
pub use result::Result;
