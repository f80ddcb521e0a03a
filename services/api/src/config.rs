//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::HeaderValue;
use chrono::Duration;
use std::net::SocketAddr;
use tracing::Level;

/// Longest accepted `AUTH_TOKEN_TTL_DAYS`.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

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
    /// `None` runs the API against the in-memory database.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub log_level: Level,
    /// The single browser origin allowed to call the API.
    pub cors_origin: HeaderValue,
    pub token_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5000)),
            database_url: None,
            db_max_connections: 5,
            log_level: Level::INFO,
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            token_ttl: Duration::days(30),
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

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Server and Database Settings ---
        let bind_address = match var("BIND_ADDRESS") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
            })?,
            None => defaults.bind_address,
        };

        let database_url = var("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let db_max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string(), e.to_string())
            })?,
            None => defaults.db_max_connections,
        };

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- HTTP and Auth Settings ---
        let cors_origin = match var("CORS_ORIGIN") {
            Some(raw) => HeaderValue::from_str(&raw).map_err(|e| {
                ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string())
            })?,
            None => defaults.cors_origin,
        };

        let token_ttl = match var("AUTH_TOKEN_TTL_DAYS") {
            Some(raw) => {
                let days = raw.parse::<i64>().map_err(|e| {
                    ConfigError::InvalidValue("AUTH_TOKEN_TTL_DAYS".to_string(), e.to_string())
                })?;
                if !(1..=MAX_TOKEN_TTL_DAYS).contains(&days) {
                    return Err(ConfigError::InvalidValue(
                        "AUTH_TOKEN_TTL_DAYS".to_string(),
                        format!("must be between 1 and {} days", MAX_TOKEN_TTL_DAYS),
                    ));
                }
                Duration::days(days)
            }
            None => defaults.token_ttl,
        };

        Ok(Self {
            bind_address,
            database_url,
            db_max_connections,
            log_level,
            cors_origin,
            token_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_address.port(), 5000);
        assert!(config.database_url.is_none());
        assert_eq!(config.token_ttl, Duration::days(30));
        assert_eq!(config.cors_origin, "http://localhost:3000");
    }

    #[test]
    fn invalid_values_are_reported_by_name() {
        let err = Config::from_lookup(lookup(&[("BIND_ADDRESS", "nope")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "BIND_ADDRESS"));

        let err = Config::from_lookup(lookup(&[("AUTH_TOKEN_TTL_DAYS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "AUTH_TOKEN_TTL_DAYS"));

        let err = Config::from_lookup(lookup(&[("RUST_LOG", "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "RUST_LOG"));
    }

    #[test]
    fn token_ttl_has_an_upper_bound() {
        let config = Config::from_lookup(lookup(&[("AUTH_TOKEN_TTL_DAYS", "3650")])).unwrap();
        assert_eq!(config.token_ttl, Duration::days(MAX_TOKEN_TTL_DAYS));

        for raw in ["3651", "1000000000"] {
            let err = Config::from_lookup(lookup(&[("AUTH_TOKEN_TTL_DAYS", raw)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref v, _) if v == "AUTH_TOKEN_TTL_DAYS"));
        }
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap();
        assert!(config.database_url.is_none());
    }
}
