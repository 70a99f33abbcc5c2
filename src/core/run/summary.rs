//! Run summary and reporting
//!
//! This module defines the in-memory report of one run and its mapping onto
//! the process exit status.

use super::state::RunState;
use crate::domain::DateRange;
use std::fmt;
use std::time::Duration;

/// Exit status of a run that reached `DONE`
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status when configuration is missing or invalid
pub const EXIT_CONFIGURATION: i32 = 2;

/// Exit status for a fatal persistence failure or any other fatal error
pub const EXIT_FATAL: i32 = 5;

/// Category of a recoverable problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// One organization's fetch failed
    Fetch,
    /// Warehouse insert failed
    Warehouse,
    /// A notifier failed
    Notification,
    /// Local artifact could not be removed
    Cleanup,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::Fetch => "fetch",
            WarningKind::Warehouse => "warehouse",
            WarningKind::Notification => "notification",
            WarningKind::Cleanup => "cleanup",
        };
        f.write_str(s)
    }
}

/// A recoverable problem encountered during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunWarning {
    pub kind: WarningKind,
    pub message: String,
}

/// Category of a fatal failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
    /// Required configuration missing or invalid
    Configuration,
    /// Local artifact or object-store write failed
    Persistence,
}

/// Summary of one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Unique id of this invocation
    pub run_id: String,

    /// Final state (`DONE` or `FAILED` once the run has ended)
    pub state: RunState,

    /// Range that was fetched, once resolved
    pub range: Option<DateRange>,

    /// Unique records returned by the fetch
    pub fetched: usize,

    /// Records after normalization
    pub normalized: usize,

    /// Organization codes whose fetch failed
    pub failed_org_codes: Vec<String>,

    /// URI of the durable object
    pub object_uri: Option<String>,

    /// Size of the local artifact in bytes
    pub artifact_bytes: Option<u64>,

    /// Rows inserted into the warehouse (`None` when skipped or failed)
    pub warehouse_rows: Option<usize>,

    /// Notifiers that accepted the report
    pub notifications_sent: usize,

    /// Recoverable problems
    pub warnings: Vec<RunWarning>,

    /// Fatal failure, if the run ended in `FAILED`
    pub fatal: Option<(FatalKind, String)>,

    /// Wall-clock duration
    pub duration: Duration,
}

impl RunSummary {
    /// Create a new summary in the `CONFIGURING` state
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            state: RunState::Configuring,
            range: None,
            fetched: 0,
            normalized: 0,
            failed_org_codes: Vec::new(),
            object_uri: None,
            artifact_bytes: None,
            warehouse_rows: None,
            notifications_sent: 0,
            warnings: Vec::new(),
            fatal: None,
            duration: Duration::from_secs(0),
        }
    }

    /// Add a warning
    pub fn add_warning(&mut self, kind: WarningKind, message: impl Into<String>) {
        self.warnings.push(RunWarning {
            kind,
            message: message.into(),
        });
    }

    /// Warnings of one kind
    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &RunWarning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }

    /// Whether the run reached `DONE`
    pub fn is_successful(&self) -> bool {
        self.state == RunState::Done
    }

    /// Process exit status for this run
    pub fn exit_code(&self) -> i32 {
        match (self.state, &self.fatal) {
            (RunState::Done, _) => EXIT_SUCCESS,
            (_, Some((FatalKind::Configuration, _))) => EXIT_CONFIGURATION,
            _ => EXIT_FATAL,
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        let range = self
            .range
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        if let Some((_, message)) = &self.fatal {
            tracing::error!(
                run_id = %self.run_id,
                state = %self.state,
                date_range = %range,
                duration_ms = self.duration.as_millis() as u64,
                error = %message,
                "Run failed"
            );
            return;
        }

        tracing::info!(
            run_id = %self.run_id,
            state = %self.state,
            date_range = %range,
            fetched = self.fetched,
            normalized = self.normalized,
            object_uri = self.object_uri.as_deref().unwrap_or(""),
            artifact_bytes = self.artifact_bytes.unwrap_or(0),
            warehouse_rows = ?self.warehouse_rows,
            notifications_sent = self.notifications_sent,
            warning_count = self.warnings.len(),
            duration_ms = self.duration.as_millis() as u64,
            "Run completed"
        );

        if !self.failed_org_codes.is_empty() {
            tracing::warn!(
                org_codes = %self.failed_org_codes.join(","),
                "Some organizations could not be fetched"
            );
        }

        for warning in &self.warnings {
            tracing::warn!(kind = %warning.kind, message = %warning.message, "Run warning");
        }
    }
}
