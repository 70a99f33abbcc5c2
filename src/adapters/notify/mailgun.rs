//! Mailgun email notifier
//!
//! Posts a url-encoded form to `{base_url}/{domain}/messages` with basic
//! auth (`api`, key), carrying both a plain-text and an HTML body.

use super::render;
use super::traits::{NotificationReport, Notifier};
use crate::adapters::http::{build_client, error_body};
use crate::config::{EmailConfig, SecretString};
use crate::domain::{FetcherError, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;

/// Sends the run summary through the Mailgun messages API
pub struct MailgunNotifier {
    base_url: String,
    domain: String,
    api_key: SecretString,
    recipient: String,
    client: Client,
}

impl MailgunNotifier {
    /// Creates a notifier from complete email settings
    ///
    /// # Errors
    ///
    /// Returns [`FetcherError::Configuration`] if the key, domain or
    /// recipient is missing, or the HTTP client cannot be built.
    pub fn new(config: &EmailConfig, timeout_seconds: u64) -> Result<Self> {
        let missing = |name: &str| FetcherError::Configuration(format!("{name} not set"));

        let api_key = config
            .mailgun_api_key
            .clone()
            .ok_or_else(|| missing("MAILGUN_API_KEY"))?;
        let domain = config
            .mailgun_domain
            .clone()
            .ok_or_else(|| missing("MAILGUN_DOMAIN"))?;
        let recipient = config
            .recipient
            .clone()
            .ok_or_else(|| missing("NOTIFICATION_EMAIL"))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            domain,
            api_key,
            recipient,
            client: build_client(timeout_seconds)?,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.base_url, self.domain)
    }

    fn sender(&self) -> String {
        format!("SAM Contract Fetcher <noreply@{}>", self.domain)
    }
}

#[async_trait]
impl Notifier for MailgunNotifier {
    async fn notify(&self, report: &NotificationReport<'_>) -> Result<()> {
        let subject = render::subject(report);
        let text = render::text_body(report);
        let html = render::html_body(report).into_string();
        let from = self.sender();

        let form = [
            ("from", from.as_str()),
            ("to", self.recipient.as_str()),
            ("subject", subject.as_str()),
            ("text", text.as_str()),
            ("html", html.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(self.api_key.expose_secret().as_ref()))
            .form(&form)
            .send()
            .await
            .map_err(|e| FetcherError::Notification(format!("Mailgun request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(FetcherError::Notification(format!(
                "Mailgun returned {status}: {body}"
            )));
        }

        tracing::debug!(recipient = %self.recipient, subject = %subject, "Email accepted by Mailgun");
        Ok(())
    }

    fn name(&self) -> &str {
        "mailgun"
    }
}
