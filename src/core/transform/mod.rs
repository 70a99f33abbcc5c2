//! Data transformation logic
//!
//! This module converts untyped opportunities from the search API into flat
//! [`crate::domain::NormalizedContract`] records. It is the only place the
//! untyped representation is read.

pub mod normalize;

pub use normalize::{normalize, normalize_all};
