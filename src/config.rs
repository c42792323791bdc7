//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local use.

use crate::models::DistanceUnit;
use std::env;
use std::fmt;

/// Default site the client talks to.
pub const DEFAULT_SITE_URL: &str = "https://runkeeper.com";

/// Client configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    /// Account email used on the login form
    pub email: String,
    /// Account password used on the login form
    pub password: String,
    /// Base URL of the site (no trailing slash)
    pub site_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Unit used when filling the distance field of the upload form
    pub distance_unit: DistanceUnit,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            email: "runner@example.com".to_string(),
            password: "test_password".to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            request_timeout_secs: 30,
            distance_unit: DistanceUnit::Kilometers,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("site_url", &self.site_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("distance_unit", &self.distance_unit)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let distance_unit = match env::var("RUNKEEPER_DISTANCE_UNIT") {
            Ok(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("RUNKEEPER_DISTANCE_UNIT", v))?,
            Err(_) => DistanceUnit::Kilometers,
        };

        Ok(Self {
            email: env::var("RUNKEEPER_EMAIL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("RUNKEEPER_EMAIL"))?,
            password: env::var("RUNKEEPER_PASSWORD")
                .map_err(|_| ConfigError::Missing("RUNKEEPER_PASSWORD"))?,
            site_url: env::var("RUNKEEPER_SITE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_SITE_URL.to_string()),
            request_timeout_secs: env::var("RUNKEEPER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            distance_unit,
        })
    }

    /// Config pointing at another site, e.g. a local mock server.
    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
