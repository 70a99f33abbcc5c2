//! Run notifications
//!
//! The [`Notifier`] seam, the summary email renderer, and the Mailgun
//! transport.

pub mod mailgun;
pub mod render;
pub mod traits;

pub use mailgun::MailgunNotifier;
pub use traits::{NotificationReport, Notifier};
