//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STORE_API_URL` - Base URL of the remote document store
//!
//! ## Optional
//! - `CARTWHEEL_SESSION_FILE` - Path of the durable session slot
//!   (default: `cartwheel-session.json` in the system temp directory)
//! - `CARTWHEEL_POLL_INTERVAL_SECS` - Suspension watch interval
//!   (default: 5)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default suspension-watch interval, matching the deployed behavior.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote store (serves `/users` and `/products`).
    pub api_base_url: Url,
    /// Where the session cache persists the current user snapshot.
    pub session_file: PathBuf,
    /// How often the suspension watch re-fetches the active user.
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Build a config with defaults for everything but the store URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_base_url` is not a
    /// valid URL.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        let api_base_url = Url::parse(api_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STORE_API_URL".to_owned(), e.to_string())
        })?;
        Ok(Self {
            api_base_url,
            session_file: std::env::temp_dir().join("cartwheel-session.json"),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `STORE_API_URL` is unset,
    /// or `ConfigError::InvalidEnvVar` if a variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = std::env::var("STORE_API_URL")
            .map_err(|_| ConfigError::MissingEnvVar("STORE_API_URL".to_owned()))?;
        let mut config = Self::new(&base)?;

        if let Ok(path) = std::env::var("CARTWHEEL_SESSION_FILE") {
            config.session_file = PathBuf::from(path);
        }

        if let Ok(secs) = std::env::var("CARTWHEEL_POLL_INTERVAL_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ConfigError::InvalidEnvVar(
                    "CARTWHEEL_POLL_INTERVAL_SECS".to_owned(),
                    format!("expected an integer number of seconds, got {secs:?}"),
                )
            })?;
            config.poll_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// The store base URL with no trailing slash, for endpoint building.
    #[must_use]
    pub fn endpoint_base(&self) -> String {
        self.api_base_url.as_str().trim_end_matches('/').to_owned()
    }
}
