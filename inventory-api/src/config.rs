//! Configuration management for the inventory API.
//!
//! Loads settings from environment variables, with a `.env` file picked up
//! in development builds.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub redis: RedisSettings,
    pub jwt: JwtSettings,
    pub server: ServerSettings,
    pub breach: BreachCheckSettings,
    pub queue: QueueSettings,
}

impl Settings {
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
        }

        Ok(Settings {
            database: DatabaseSettings::from_env()?,
            redis: RedisSettings::from_env()?,
            jwt: JwtSettings::from_env()?,
            server: ServerSettings::from_env()?,
            breach: BreachCheckSettings::from_env()?,
            queue: QueueSettings::from_env(),
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
        })
    }
}

/// Redis settings (revocation registry and job queue broker)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisSettings {
    pub url: String,
}

impl RedisSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("REDIS_URL").context("REDIS_URL must be set")?,
        })
    }
}

/// JWT signing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
}

impl JwtSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_ttl_secs: env::var("JWT_ACCESS_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .context("Invalid JWT_ACCESS_TTL_SECS")?,
            refresh_ttl_secs: env::var("JWT_REFRESH_TTL_SECS")
                .unwrap_or_else(|_| "2592000".to_string())
                .parse()
                .context("Invalid JWT_REFRESH_TTL_SECS")?,
        })
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }
}

/// Password breach-check settings (k-anonymity range API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreachCheckSettings {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl BreachCheckSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: env::var("BREACH_API_URL")
                .unwrap_or_else(|_| "https://api.pwnedpasswords.com".to_string()),
            timeout_secs: env::var("BREACH_CHECK_TIMEOUT_SECS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("Invalid BREACH_CHECK_TIMEOUT_SECS")?,
        })
    }
}

/// Job queue settings (producer side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSettings {
    pub key: String,
}

impl QueueSettings {
    fn from_env() -> Self {
        Self {
            key: env::var("WORKER_QUEUE")
                .unwrap_or_else(|_| "stockroom:jobs:notifications".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_settings_from_env() {
        env::set_var("JWT_SECRET", "test-secret-key");
        env::set_var("JWT_ACCESS_TTL_SECS", "900");

        let settings = JwtSettings::from_env().unwrap();

        assert_eq!(settings.secret, "test-secret-key");
        assert_eq!(settings.access_ttl_secs, 900);
        assert_eq!(settings.refresh_ttl_secs, 2592000); // Default

        env::remove_var("JWT_SECRET");
        env::remove_var("JWT_ACCESS_TTL_SECS");
    }

    #[test]
    fn test_breach_settings_defaults() {
        let settings = BreachCheckSettings::from_env().unwrap();
        assert_eq!(settings.api_url, "https://api.pwnedpasswords.com");
        assert_eq!(settings.timeout_secs, 3);
    }

    #[test]
    fn test_queue_settings_default_key() {
        let settings = QueueSettings::from_env();
        assert_eq!(settings.key, "stockroom:jobs:notifications");
    }
}
