//! Opportunity source trait definition
//!
//! The fetch coordinator talks to the opportunities API only through
//! [`OpportunitySource`], so tests can substitute an in-memory source.

use crate::config::SecretString;
use crate::domain::{DateRange, OrgCode, RawOpportunity, Result};
use async_trait::async_trait;

/// One search against the opportunities API
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    /// Organization code filter
    pub org_code: &'a OrgCode,

    /// Posted-date range
    pub range: &'a DateRange,

    /// Maximum number of records requested
    pub limit: u32,
}

/// Source of raw contract opportunities
///
/// Implementations perform exactly one request per call and never retry.
///
/// # Example
///
/// ```no_run
/// use contract_fetcher::adapters::sam::{OpportunitySource, SamClient, SearchQuery};
/// use contract_fetcher::config::{secret_string, SamConfig};
/// use contract_fetcher::domain::{DateRange, FetcherError, OrgCode};
///
/// # async fn example() -> contract_fetcher::domain::Result<()> {
/// let client = SamClient::new(&SamConfig::default(), 30)?;
/// let key = secret_string("sam-key".to_string());
/// let org = OrgCode::new("070").map_err(FetcherError::Configuration)?;
/// let range = DateRange::new("01/27/2026", "01/27/2026");
///
/// let items = client
///     .search(&key, SearchQuery { org_code: &org, range: &range, limit: 200 })
///     .await?;
/// println!("{} opportunities", items.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait OpportunitySource: Send + Sync {
    /// Searches active opportunities for one organization and date range
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::FetcherError::Api`] on transport failure,
    /// timeout, a non-success status, or an undecodable body.
    async fn search(
        &self,
        api_key: &SecretString,
        query: SearchQuery<'_>,
    ) -> Result<Vec<RawOpportunity>>;
}
