//! Contract retrieval across organization codes

pub mod coordinator;

pub use coordinator::{FetchCoordinator, FetchOutcome, OrgFailure};
