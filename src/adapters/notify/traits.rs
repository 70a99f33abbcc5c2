//! Notification channel trait

use crate::domain::{DateRange, NormalizedContract, Result};
use async_trait::async_trait;

/// What a notifier is told about a finished run
#[derive(Debug, Clone, Copy)]
pub struct NotificationReport<'a> {
    /// Contracts fetched in this run, in fetch order
    pub contracts: &'a [NormalizedContract],

    /// Posted-date range the contracts were fetched for
    pub range: &'a DateRange,

    /// Where the durable copy was written (object URI)
    pub data_location: &'a str,
}

/// A channel that announces run results
///
/// Notification failures never change a run's outcome; callers log them and
/// move on.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends one notification for the report
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::FetcherError::Notification`] if the message
    /// was not accepted.
    async fn notify(&self, report: &NotificationReport<'_>) -> Result<()>;

    /// Channel name, used in logs
    fn name(&self) -> &str;
}
