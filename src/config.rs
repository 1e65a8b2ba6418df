//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;
use url::Url;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `NOTIFICATION_WEBHOOK_URL` (optional): endpoint receiving signed transfer notifications
/// - `NOTIFICATION_WEBHOOK_SECRET` (optional): HMAC key, required when the URL is set
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default)]
    pub notification_webhook_url: Option<String>,

    #[serde(default)]
    pub notification_webhook_secret: Option<String>,
}

/// Webhook destination after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: Url,
    pub secret: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] envy::Error),

    #[error("NOTIFICATION_WEBHOOK_URL is not a valid URL: {0}")]
    InvalidWebhookUrl(#[from] url::ParseError),

    #[error("NOTIFICATION_WEBHOOK_URL must use http or https, got {0}")]
    UnsupportedWebhookScheme(String),

    #[error("NOTIFICATION_WEBHOOK_SECRET is required when NOTIFICATION_WEBHOOK_URL is set")]
    MissingWebhookSecret,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(envy::from_env::<Config>()?)
    }

    /// The webhook destination, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL cannot be parsed or is not http(s)
    /// - The URL is set without a secret
    pub fn webhook(&self) -> Result<Option<WebhookConfig>, ConfigError> {
        let Some(raw_url) = self.notification_webhook_url.as_deref() else {
            return Ok(None);
        };

        let url = Url::parse(raw_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedWebhookScheme(
                url.scheme().to_string(),
            ));
        }

        let secret = self
            .notification_webhook_secret
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingWebhookSecret)?;

        Ok(Some(WebhookConfig { url, secret }))
    }
}
