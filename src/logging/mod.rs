//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Timestamped stdout output, text or JSON
//! - Configurable log levels with `RUST_LOG` override
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use contract_fetcher::config::{LogFormat, LoggingConfig};
//! use contract_fetcher::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", LogFormat::Text, &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Job started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a run state transition
///
/// # Example
///
/// ```no_run
/// use contract_fetcher::log_state_transition;
/// use contract_fetcher::core::run::RunState;
///
/// log_state_transition!(RunState::Configuring, RunState::Fetching);
/// ```
#[macro_export]
macro_rules! log_state_transition {
    ($from:expr, $to:expr) => {
        tracing::info!(
            from = %$from,
            to = %$to,
            "State transition: {} -> {}",
            $from,
            $to
        );
    };
}

/// Log a fatal failure with the `FATAL:` prefix
///
/// # Example
///
/// ```no_run
/// use contract_fetcher::log_fatal;
///
/// log_fatal!("GCS_BUCKET_NAME not set");
/// ```
#[macro_export]
macro_rules! log_fatal {
    ($message:expr) => {
        tracing::error!("FATAL: {}", $message);
    };
}
