//! Run orchestration, state machine and run summary

pub mod orchestrator;
pub mod state;
pub mod summary;

pub use orchestrator::{configuration_failure, Collaborators, RunOrchestrator, RunRequest};
pub use state::RunState;
pub use summary::{
    FatalKind, RunSummary, RunWarning, WarningKind, EXIT_CONFIGURATION, EXIT_FATAL, EXIT_SUCCESS,
};
