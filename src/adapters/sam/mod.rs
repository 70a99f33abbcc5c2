//! Opportunities search API adapter
//!
//! This module provides the [`OpportunitySource`] seam, the HTTP
//! implementation for the SAM.gov search endpoint, and its response models.

pub mod client;
pub mod models;
pub mod source;

pub use client::SamClient;
pub use models::SearchResponse;
pub use source::{OpportunitySource, SearchQuery};
