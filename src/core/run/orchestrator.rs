//! Run orchestrator - sequences one invocation of the job
//!
//! `CONFIGURING → FETCHING → NORMALIZING → PERSISTING → NOTIFYING → DONE`,
//! with `FAILED` reachable from `CONFIGURING` and `PERSISTING` only. Every
//! transition is logged as one line.

use super::state::RunState;
use super::summary::{FatalKind, RunSummary, WarningKind};
use crate::adapters::notify::{MailgunNotifier, NotificationReport, Notifier};
use crate::adapters::sam::{OpportunitySource, SamClient};
use crate::adapters::storage::{create_sinks, ObjectStore, Warehouse};
use crate::config::secret::is_blank_secret;
use crate::config::RunConfig;
use crate::core::fetch::{FetchCoordinator, FetchOutcome};
use crate::core::persist::{Persister, WarehouseOutcome};
use crate::core::transform::normalize_all;
use crate::domain::{DateRange, FetchBatch, Result};
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Instant;

/// External systems a run talks to
pub struct Collaborators {
    pub source: Arc<dyn OpportunitySource>,
    pub object_store: Arc<dyn ObjectStore>,
    pub warehouse: Option<Arc<dyn Warehouse>>,
    pub notifiers: Vec<Arc<dyn Notifier>>,
}

impl Collaborators {
    /// Builds the production adapters described by the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built or a setting a
    /// chosen adapter needs is missing.
    pub fn from_config(config: &RunConfig) -> Result<Self> {
        let timeout = config.application.request_timeout_seconds;

        let source: Arc<dyn OpportunitySource> = Arc::new(SamClient::new(&config.sam, timeout)?);
        let sinks = create_sinks(config)?;

        let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();
        if config.email.enabled {
            notifiers.push(Arc::new(MailgunNotifier::new(&config.email, timeout)?));
        }

        Ok(Self {
            source,
            object_store: sinks.object_store,
            warehouse: sinks.warehouse,
            notifiers,
        })
    }
}

/// Per-invocation inputs that are not configuration
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Start of the posted-date range (`MM/DD/YYYY`)
    pub posted_from: Option<String>,

    /// End of the posted-date range (`MM/DD/YYYY`)
    pub posted_to: Option<String>,
}

/// Drives one run from configuration to exit status
pub struct RunOrchestrator {
    config: RunConfig,
    fetcher: FetchCoordinator,
    persister: Persister,
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl RunOrchestrator {
    /// Create a new orchestrator
    pub fn new(config: RunConfig, collaborators: Collaborators) -> Self {
        let fetcher = FetchCoordinator::new(collaborators.source, config.sam.page_limit);
        let persister = Persister::new(
            collaborators.object_store,
            collaborators.warehouse,
            config.storage.work_dir.clone(),
            config.storage.prefix.clone(),
        );

        Self {
            config,
            fetcher,
            persister,
            notifiers: collaborators.notifiers,
        }
    }

    /// Execute the run
    ///
    /// Never returns an error: every outcome, fatal or not, is recorded in
    /// the returned [`RunSummary`], whose [`RunSummary::exit_code`] is the
    /// process exit status.
    ///
    /// # Arguments
    ///
    /// * `request` - Optional date bounds
    /// * `run_id` - Identifier attached to the summary
    /// * `now` - Local time of the run; yesterday is derived from it
    pub async fn run(&self, request: &RunRequest, run_id: &str, now: NaiveDateTime) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::new(run_id);

        tracing::info!(run_id = %run_id, state = %summary.state, "Run started");

        // CONFIGURING
        if let Err(e) = self.config.validate() {
            return fail(summary, FatalKind::Configuration, e, started);
        }
        let Some(api_key) = self
            .config
            .sam
            .api_key
            .as_ref()
            .filter(|key| !is_blank_secret(Some(key)))
        else {
            return fail(
                summary,
                FatalKind::Configuration,
                "SAM_API_KEY not set".to_string(),
                started,
            );
        };
        let org_codes = self.config.sam.org_codes();

        // FETCHING
        transition(&mut summary, RunState::Fetching);
        let outcome = match self
            .fetcher
            .fetch(
                api_key,
                &org_codes,
                request.posted_from.as_deref(),
                request.posted_to.as_deref(),
                now.date(),
            )
            .await
        {
            Ok(outcome) => outcome,
            // The key was checked while configuring; anything else is a fetch warning
            Err(e) => {
                tracing::warn!(error = %e, "Fetch failed, continuing with no contracts");
                summary.add_warning(WarningKind::Fetch, e.to_string());
                FetchOutcome {
                    records: Vec::new(),
                    range: DateRange::resolve(
                        request.posted_from.as_deref(),
                        request.posted_to.as_deref(),
                        now.date(),
                    ),
                    failures: Vec::new(),
                    duplicates_skipped: 0,
                    missing_id_skipped: 0,
                }
            }
        };

        summary.fetched = outcome.records.len();
        summary.range = Some(outcome.range.clone());
        for failure in &outcome.failures {
            summary.failed_org_codes.push(failure.org_code.to_string());
            summary.add_warning(
                WarningKind::Fetch,
                format!("organization {}: {}", failure.org_code, failure.error),
            );
        }

        // NORMALIZING
        transition(&mut summary, RunState::Normalizing);
        let batch = FetchBatch::new(normalize_all(&outcome.records), outcome.range);
        summary.normalized = batch.len();
        tracing::info!(count = batch.len(), "Normalized contracts");

        // PERSISTING
        transition(&mut summary, RunState::Persisting);
        let persisted = match self.persister.persist(&batch, now).await {
            Ok(persisted) => persisted,
            Err(e) => return fail(summary, FatalKind::Persistence, e.to_string(), started),
        };

        summary.object_uri = Some(persisted.object_uri.clone());
        summary.artifact_bytes = Some(persisted.artifact.bytes);
        summary.warehouse_rows = persisted.warehouse.rows();
        if let WarehouseOutcome::Failed(message) = &persisted.warehouse {
            summary.add_warning(WarningKind::Warehouse, message.clone());
        }
        if let Some(message) = &persisted.cleanup_error {
            summary.add_warning(WarningKind::Cleanup, message.clone());
        }

        // NOTIFYING
        if self.notifiers.is_empty() {
            tracing::info!("Notifications disabled");
        } else {
            transition(&mut summary, RunState::Notifying);
            let report = NotificationReport {
                contracts: &batch.contracts,
                range: &batch.range,
                data_location: &persisted.object_uri,
            };

            for notifier in &self.notifiers {
                match notifier.notify(&report).await {
                    Ok(()) => {
                        summary.notifications_sent += 1;
                        tracing::info!(channel = notifier.name(), "Notification sent");
                    }
                    Err(e) => {
                        tracing::warn!(channel = notifier.name(), error = %e, "Notification failed");
                        summary.add_warning(
                            WarningKind::Notification,
                            format!("{}: {}", notifier.name(), e),
                        );
                    }
                }
            }
        }

        transition(&mut summary, RunState::Done);
        summary.duration = started.elapsed();
        summary.log_summary();
        summary
    }
}

/// Summary for a run whose configuration could not be resolved
///
/// Used when loading fails before an orchestrator can be built; the run goes
/// straight from `CONFIGURING` to `FAILED`.
pub fn configuration_failure(run_id: &str, message: impl Into<String>) -> RunSummary {
    let summary = RunSummary::new(run_id);
    fail(summary, FatalKind::Configuration, message.into(), Instant::now())
}

fn transition(summary: &mut RunSummary, next: RunState) {
    if !summary.state.can_transition_to(next) {
        tracing::warn!(from = %summary.state, to = %next, "Unexpected state transition");
    }
    crate::log_state_transition!(summary.state, next);
    summary.state = next;
}

fn fail(
    mut summary: RunSummary,
    kind: FatalKind,
    message: String,
    started: Instant,
) -> RunSummary {
    crate::log_fatal!(message);
    transition(&mut summary, RunState::Failed);
    summary.fatal = Some((kind, message));
    summary.duration = started.elapsed();
    summary.log_summary();
    summary
}
