//! Configuration management for the notification worker.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub redis_url: String,
    pub queue_key: String,
    pub metrics_port: u16,
    pub mail: MailSettings,
    pub retry: RetrySettings,
}

impl Settings {
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
        }

        Ok(Settings {
            redis_url: env::var("REDIS_URL").context("REDIS_URL must be set")?,
            queue_key: env::var("WORKER_QUEUE")
                .unwrap_or_else(|_| "stockroom:jobs:notifications".to_string()),
            metrics_port: env::var("WORKER_METRICS_PORT")
                .unwrap_or_else(|_| "9091".to_string())
                .parse()
                .context("Invalid WORKER_METRICS_PORT")?,
            mail: MailSettings::from_env()?,
            retry: RetrySettings::from_env()?,
        })
    }
}

/// Mail-delivery HTTP API settings (Mailgun-style provider).
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub api_base: String,
    pub domain: String,
    pub api_key: String,
    pub from_name: String,
}

impl MailSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_base: env::var("MAIL_API_BASE")
                .unwrap_or_else(|_| "https://api.mailgun.net".to_string()),
            domain: env::var("MAILGUN_DOMAIN").context("MAILGUN_DOMAIN must be set")?,
            api_key: env::var("MAILGUN_API_KEY").context("MAILGUN_API_KEY must be set")?,
            from_name: env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "Stockroom".to_string()),
        })
    }
}

/// Retry policy settings for job execution.
#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub max_attempts: usize,
    pub initial_delay_ms: u64,
    pub max_delay_secs: u64,
}

impl RetrySettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            max_attempts: env::var("WORKER_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid WORKER_MAX_ATTEMPTS")?,
            initial_delay_ms: env::var("WORKER_RETRY_INITIAL_MS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .context("Invalid WORKER_RETRY_INITIAL_MS")?,
            max_delay_secs: env::var("WORKER_RETRY_MAX_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid WORKER_RETRY_MAX_SECS")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_settings_defaults() {
        let settings = RetrySettings::from_env().unwrap();
        assert_eq!(settings.max_attempts, 5);
        assert_eq!(settings.initial_delay_ms, 500);
        assert_eq!(settings.max_delay_secs, 30);
    }
}
