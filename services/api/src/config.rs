//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub cors_origin: String,
    pub recovery_question_count: usize,
    pub recovery_token_secret: Option<String>,
    pub recovery_token_ttl_secs: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_url: None,
            log_level: Level::INFO,
            cors_origin: "http://localhost:3000".to_string(),
            recovery_question_count: 3,
            recovery_token_secret: None,
            recovery_token_ttl_secs: 600,
        }
    }
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Load Server and Database Settings ---
        let bind_address = match lookup("BIND_ADDRESS") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
            })?,
            None => defaults.bind_address,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let log_level = match lookup("RUST_LOG") {
            Some(raw) => raw.parse::<Level>().map_err(|_| {
                ConfigError::InvalidValue(
                    "RUST_LOG".to_string(),
                    format!("'{}' is not a valid log level", raw),
                )
            })?,
            None => defaults.log_level,
        };

        let cors_origin = lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        // --- Load Recovery Settings ---
        let recovery_question_count = match lookup("RECOVERY_QUESTION_COUNT") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if (1..=6).contains(&n) => n,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "RECOVERY_QUESTION_COUNT".to_string(),
                        format!("'{}' is not a number from 1 to 6", raw),
                    ))
                }
            },
            None => defaults.recovery_question_count,
        };

        let recovery_token_secret =
            lookup("RECOVERY_TOKEN_SECRET").filter(|secret| !secret.is_empty());

        let recovery_token_ttl_secs = match lookup("RECOVERY_TOKEN_TTL_SECS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "RECOVERY_TOKEN_TTL_SECS".to_string(),
                        format!("'{}' is not a positive number of seconds", raw),
                    ))
                }
            },
            None => defaults.recovery_token_ttl_secs,
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            cors_origin,
            recovery_question_count,
            recovery_token_secret,
            recovery_token_ttl_secs,
        })
    }
}
