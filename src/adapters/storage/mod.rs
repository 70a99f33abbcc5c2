//! Sink abstraction layer
//!
//! Traits for the durable object store and the warehouse, the local
//! directory store, and the factory that wires sinks from configuration.

pub mod factory;
pub mod local;
pub mod traits;

pub use factory::{create_sinks, Sinks};
pub use local::LocalObjectStore;
pub use traits::{ObjectStore, Warehouse};
