//! crates/greenlife_client/src/config.rs
//!
//! Where the storefront finds the API.

use std::time::Duration;

use crate::error::ClientError;

/// Used when `GREENLIFE_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout. `None` waits as long as the connection does.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads `GREENLIFE_API_URL` and `GREENLIFE_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(var: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match var("GREENLIFE_API_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => Self::new(url.trim()),
            None => Self::default(),
        };
        if let Some(raw) = var("GREENLIFE_API_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|e| {
                ClientError::Config(format!("GREENLIFE_API_TIMEOUT_SECS: {}", e))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
