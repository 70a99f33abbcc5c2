//! Persistence to the durable object store and the warehouse

pub mod filename;
pub mod persister;

pub use filename::{contract_filename, object_key};
pub use persister::{LocalArtifact, PersistOutcome, Persister, WarehouseOutcome};
