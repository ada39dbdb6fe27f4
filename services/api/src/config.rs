//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub data_dir: PathBuf,
    pub log_level: Level,
    pub openai_api_key: String,
    pub summary_model: String,
    pub analysis_model: String,
    pub chat_model: String,
    pub guidance_model: String,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Storage Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load API Keys ---
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;

        // --- Load Adapter-specific Settings ---
        let summary_model =
            std::env::var("SUMMARY_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let analysis_model =
            std::env::var("ANALYSIS_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let guidance_model =
            std::env::var("GUIDANCE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        // --- Load Retry Policy Settings ---
        let retry_attempts = parse_env_or("RETRY_ATTEMPTS", 3u32)?;
        let retry_delay_ms = parse_env_or("RETRY_DELAY_MS", 1000u64)?;

        Ok(Self {
            bind_address,
            data_dir,
            log_level,
            openai_api_key,
            summary_model,
            analysis_model,
            chat_model,
            guidance_model,
            retry_attempts,
            retry_delay: Duration::from_millis(retry_delay_ms),
        })
    }
}

/// Parses an optional numeric environment variable, falling back to a default.
fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw.parse::<T>().map_err(|_| {
            ConfigError::InvalidValue(var.to_string(), format!("'{}' is not a valid number", raw))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test covers both cases because the process environment is shared
    // across test threads.
    #[test]
    fn api_key_is_required_and_defaults_apply() {
        // Pin the one variable commonly set by the environment.
        std::env::set_var("RUST_LOG", "INFO");

        std::env::remove_var("OPENAI_API_KEY");
        let err = Config::from_env().expect_err("config must reject a missing API key");
        assert!(matches!(err, ConfigError::MissingVar(var) if var == "OPENAI_API_KEY"));

        std::env::set_var("OPENAI_API_KEY", "test-key");
        let config = Config::from_env().expect("config should load with defaults");
        assert_eq!(config.openai_api_key, "test-key");
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_millis(1000));
        assert_eq!(config.summary_model, "gpt-4o");
    }
}
