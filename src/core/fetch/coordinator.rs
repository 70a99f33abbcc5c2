//! Fetch coordinator - multi-organization retrieval with deduplication
//!
//! One search is issued per organization code, strictly in order. Results are
//! merged keeping the first occurrence of every notice id. A failing
//! organization is recorded and skipped; only a missing API key is fatal.

use crate::adapters::sam::{OpportunitySource, SearchQuery};
use crate::config::SecretString;
use crate::domain::{DateRange, FetcherError, OrgCode, RawOpportunity, Result};
use chrono::NaiveDate;
use secrecy::ExposeSecret;
use std::collections::HashSet;
use std::sync::Arc;

/// A per-organization fetch failure, downgraded to a warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgFailure {
    pub org_code: OrgCode,
    pub error: String,
}

/// Result of fetching across all organization codes
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Unique records in first-seen order
    pub records: Vec<RawOpportunity>,

    /// The range that was actually queried
    pub range: DateRange,

    /// Organizations whose request failed
    pub failures: Vec<OrgFailure>,

    /// Records dropped because their notice id was already seen
    pub duplicates_skipped: usize,

    /// Records dropped because they had no notice id
    pub missing_id_skipped: usize,
}

impl FetchOutcome {
    /// True if every organization's request failed
    pub fn all_failed(&self, org_count: usize) -> bool {
        org_count > 0 && self.failures.len() == org_count
    }
}

/// Drives one search per organization code and merges the results
pub struct FetchCoordinator {
    source: Arc<dyn OpportunitySource>,
    page_limit: u32,
}

impl FetchCoordinator {
    /// Create a new fetch coordinator
    ///
    /// # Arguments
    ///
    /// * `source` - Opportunities API implementation
    /// * `page_limit` - `limit` sent with each search
    pub fn new(source: Arc<dyn OpportunitySource>, page_limit: u32) -> Self {
        Self { source, page_limit }
    }

    /// Fetch opportunities for every organization code
    ///
    /// Unless both bounds are given, the range defaults to the day before
    /// `today`.
    ///
    /// # Errors
    ///
    /// Returns [`FetcherError::Configuration`] if the API key is blank. No
    /// request is made in that case. Per-organization failures never produce
    /// an error; they are reported in [`FetchOutcome::failures`].
    pub async fn fetch(
        &self,
        api_key: &SecretString,
        org_codes: &[OrgCode],
        posted_from: Option<&str>,
        posted_to: Option<&str>,
        today: NaiveDate,
    ) -> Result<FetchOutcome> {
        if api_key.expose_secret().is_blank() {
            return Err(FetcherError::Configuration(
                "SAM_API_KEY not set".to_string(),
            ));
        }

        let range = DateRange::resolve(posted_from, posted_to, today);
        let mut seen: HashSet<String> = HashSet::new();
        let mut records = Vec::new();
        let mut failures = Vec::new();
        let mut duplicates_skipped = 0;
        let mut missing_id_skipped = 0;

        tracing::info!(
            org_count = org_codes.len(),
            posted_from = %range.posted_from,
            posted_to = %range.posted_to,
            "Fetching contracts"
        );

        for org_code in org_codes {
            let query = SearchQuery {
                org_code,
                range: &range,
                limit: self.page_limit,
            };

            let items = match self.source.search(api_key, query).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(
                        org_code = %org_code,
                        error = %e,
                        "Fetch failed for organization, continuing"
                    );
                    failures.push(OrgFailure {
                        org_code: org_code.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let received = items.len();
            let mut kept = 0;
            for item in items {
                let Some(id) = item.notice_id() else {
                    missing_id_skipped += 1;
                    continue;
                };
                if seen.insert(id.to_string()) {
                    records.push(item);
                    kept += 1;
                } else {
                    duplicates_skipped += 1;
                }
            }

            tracing::info!(
                org_code = %org_code,
                received = received,
                kept = kept,
                "Fetched organization"
            );
        }

        let outcome = FetchOutcome {
            records,
            range,
            failures,
            duplicates_skipped,
            missing_id_skipped,
        };

        if outcome.all_failed(org_codes.len()) {
            tracing::warn!(
                org_count = org_codes.len(),
                "Every organization fetch failed; continuing with zero contracts"
            );
        }

        tracing::info!(
            total = outcome.records.len(),
            duplicates_skipped = outcome.duplicates_skipped,
            missing_id_skipped = outcome.missing_id_skipped,
            failed_orgs = outcome.failures.len(),
            "Fetch complete"
        );

        Ok(outcome)
    }
}
