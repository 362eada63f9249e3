//! Transport configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, an
//! optional JSON file, and `RESTIT_*` environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`SessionConfig::user_agent`].
pub const ENV_USER_AGENT: &str = "RESTIT_USER_AGENT";
/// Environment variable overriding [`SessionConfig::timeout_ms`].
pub const ENV_TIMEOUT_MS: &str = "RESTIT_TIMEOUT_MS";
/// Environment variable overriding [`SessionConfig::max_redirects`].
pub const ENV_MAX_REDIRECTS: &str = "RESTIT_MAX_REDIRECTS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error while reading the configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for this schema.
    #[error("invalid configuration file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment variable holds an unusable value.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// The variable name.
        key: &'static str,
        /// The raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Settings for the HTTP transport used by every case of a tester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Whole-exchange deadline. No deadline when unset.
    pub timeout_ms: Option<u64>,
    /// Maximum number of redirects followed.
    pub max_redirects: usize,
    /// Headers sent with every request, e.g. an `Authorization` token.
    pub default_headers: Vec<(String, String)>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("RESTit/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: None,
            max_redirects: 10,
            default_headers: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a `RESTIT_*` variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Reads a JSON configuration file, then applies the environment.
    ///
    /// Fields missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// `RESTIT_*` variable cannot be parsed.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read(path).await?;
        let config: Self = serde_json::from_slice(&content)?;
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by variable name.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric override cannot be parsed.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            self.user_agent = user_agent;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = Some(parse_number(ENV_TIMEOUT_MS, value)?);
        }
        if let Some(value) = lookup(ENV_MAX_REDIRECTS) {
            self.max_redirects = parse_number(ENV_MAX_REDIRECTS, value)?;
        }
        Ok(self)
    }
}

fn parse_number<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
            value,
        })
}
