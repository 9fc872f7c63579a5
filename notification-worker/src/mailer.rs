//! Mail delivery over the provider's HTTP API.

use crate::config::MailSettings;
use crate::error::{Result, WorkerError};

pub struct MailClient {
    http: reqwest::Client,
    api_base: String,
    domain: String,
    api_key: String,
    from_name: String,
}

impl MailClient {
    pub fn new(settings: &MailSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            domain: settings.domain.clone(),
            api_key: settings.api_key.clone(),
            from_name: settings.from_name.clone(),
        }
    }

    /// Send one message. The provider call is synchronous from the
    /// worker's point of view; retry policy lives with the caller.
    pub async fn send(&self, to: &str, subject: &str, text: &str, html: &str) -> Result<()> {
        let url = format!("{}/v3/{}/messages", self.api_base, self.domain);
        let from = format!("{} <postmaster@{}>", self.from_name, self.domain);

        let response = self
            .http
            .post(&url)
            .basic_auth("api", Some(&self.api_key))
            .form(&[
                ("from", from.as_str()),
                ("to", to),
                ("subject", subject),
                ("text", text),
                ("html", html),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkerError::MailRejected { status, body });
        }

        tracing::info!(to, subject, "Email delivered to mail API");
        Ok(())
    }
}
