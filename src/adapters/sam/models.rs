//! Opportunities search API response models

use crate::domain::RawOpportunity;
use serde::Deserialize;

/// Body of a successful search response
///
/// Only the fields the job reads are modelled; each opportunity is kept as an
/// untyped document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Total number of matches reported by the API
    #[serde(rename = "totalRecords", default)]
    pub total_records: Option<u64>,

    /// The page of opportunities; absent or null means no results
    #[serde(rename = "opportunitiesData", default)]
    pub opportunities_data: Option<Vec<RawOpportunity>>,
}

impl SearchResponse {
    /// Consumes the response, returning the opportunities (empty when absent)
    pub fn into_opportunities(self) -> Vec<RawOpportunity> {
        self.opportunities_data.unwrap_or_default()
    }
}
