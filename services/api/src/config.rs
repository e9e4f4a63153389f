//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

const DEFAULT_DEEPGRAM_URL: &str = "https://api.deepgram.com";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "Deepgram API key not found. Set DEEPGRAM_API_KEY in a .env file or export it \
         in your shell. Get an API key at https://console.deepgram.com"
    )]
    MissingApiKey,
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: Level,
    pub deepgram_api_key: String,
    pub deepgram_api_url: String,
    pub deepgram_timeout: Duration,
    /// Explicit signing secret. When unset a random one is generated and page
    /// nonces are not enforced.
    pub session_secret: Option<String>,
    pub frontend_dist: PathBuf,
    pub metadata_path: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    /// Variables already present in the environment take precedence.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, applying defaults for
    /// unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // --- Load Server Settings ---
        let host = or_default("HOST", "0.0.0.0");
        let port = or_default("PORT", "8081")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), e.to_string()))?;

        let log_level_str = or_default("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Upstream Provider Settings ---
        let deepgram_api_key = lookup("DEEPGRAM_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let deepgram_api_url = or_default("DEEPGRAM_API_URL", DEFAULT_DEEPGRAM_URL);
        let deepgram_timeout = or_default("DEEPGRAM_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidValue("DEEPGRAM_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        // --- Load Session and Asset Settings ---
        let session_secret = lookup("SESSION_SECRET").filter(|secret| !secret.is_empty());

        let frontend_dist = PathBuf::from(or_default("FRONTEND_DIST", "./frontend/dist"));
        let metadata_path = PathBuf::from(or_default("METADATA_PATH", "./deepgram.toml"));

        Ok(Self {
            host,
            port,
            log_level,
            deepgram_api_key,
            deepgram_api_url,
            deepgram_timeout,
            session_secret,
            frontend_dist,
            metadata_path,
        })
    }

    /// The `host:port` pair the server listens on.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether page nonces are enforced when issuing sessions.
    pub fn requires_nonce(&self) -> bool {
        self.session_secret.is_some()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("deepgram_api_url", &self.deepgram_api_url)
            .field("deepgram_timeout", &self.deepgram_timeout)
            .field("session_secret", &self.session_secret.as_ref().map(|_| "<redacted>"))
            .field("frontend_dist", &self.frontend_dist)
            .field("metadata_path", &self.metadata_path)
            .finish_non_exhaustive()
    }
}
