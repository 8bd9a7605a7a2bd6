//! Raw TOML configuration data types
//!
//! These structs mirror the config file layout. Every section is optional and
//! falls back to the built-in defaults.

use crate::stack_exchange::{ClientSettings, DEFAULT_BASE_URL, DEFAULT_SITE, DEFAULT_TIMEOUT};
use crate::throttle::{
    DEFAULT_BACKOFF, DEFAULT_CEILING, DEFAULT_MAX_LOCAL_WAIT_ATTEMPTS, DEFAULT_RETRIES,
    DEFAULT_WINDOW, RateLimiter, RetryPolicy,
};
use serde::{Deserialize, Serialize};
use stackgate_domain::OutputFormat;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Complete configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api: FileApiConfig,
    pub rate_limit: FileRateLimitConfig,
    pub output: FileOutputConfig,
    pub logging: FileLoggingConfig,
}

/// `[api]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// API root, overridable for mirrors and tests
    pub base_url: String,
    /// Stack Exchange site parameter
    pub site: String,
    /// Application key (raises the daily quota)
    #[serde(deserialize_with = "credential::deserialize")]
    pub api_key: Option<String>,
    /// OAuth access token
    #[serde(deserialize_with = "credential::deserialize")]
    pub access_token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            site: DEFAULT_SITE.to_string(),
            api_key: None,
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Credentials read as text even when the environment parser saw a number
/// or a boolean.
mod credential {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => {
                let msg = format!("expected a credential string, found {}", other);
                Err(serde::de::Error::custom(msg))
            }
        }
    }
}

/// `[rate_limit]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRateLimitConfig {
    pub max_requests_per_window: usize,
    pub window_ms: u64,
    /// Pause before every retry and every admission re-check
    pub retry_after_ms: u64,
    /// Retries after upstream throttling
    pub retries: u32,
    pub max_local_wait_attempts: u32,
}

impl Default for FileRateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests_per_window: DEFAULT_CEILING,
            window_ms: DEFAULT_WINDOW.as_millis() as u64,
            retry_after_ms: DEFAULT_BACKOFF.as_millis() as u64,
            retries: DEFAULT_RETRIES,
            max_local_wait_attempts: DEFAULT_MAX_LOCAL_WAIT_ATTEMPTS,
        }
    }
}

/// `[output]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Format used when a tool call or `--format` leaves it unset
    pub format: OutputFormat,
}

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for a daily rolling log file; stderr only when unset
    pub directory: Option<PathBuf>,
}

impl FileConfig {
    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.site.trim().is_empty() {
            return Err(ConfigError::Invalid("api.site cannot be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeout_secs cannot be 0".into()));
        }
        if self.rate_limit.max_requests_per_window == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.max_requests_per_window cannot be 0".into(),
            ));
        }
        if self.rate_limit.window_ms == 0 {
            return Err(ConfigError::Invalid("rate_limit.window_ms cannot be 0".into()));
        }
        Ok(())
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api.base_url.clone(),
            site: self.api.site.clone(),
            api_key: non_blank(&self.api.api_key),
            access_token: non_blank(&self.api.access_token),
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.rate_limit.retries,
            max_local_wait_attempts: self.rate_limit.max_local_wait_attempts,
            backoff: Duration::from_millis(self.rate_limit.retry_after_ms),
        }
    }

    /// Build the process-wide limiter described by `[rate_limit]`
    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(
            self.rate_limit.max_requests_per_window,
            Duration::from_millis(self.rate_limit.window_ms),
        )
    }
}

// An exported-but-empty variable means "unset"
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
