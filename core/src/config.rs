//! Client configuration, established once at startup.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for `init`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base address every request path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds, applied by the network transport.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `SOCIAL_API_BASE_URL` | API base address |
    /// | `SOCIAL_API_TIMEOUT_SECS` | Request timeout in seconds, at least 1 |
    ///
    /// Unset variables fall back to the defaults; a set but malformed
    /// timeout is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = match std::env::var("SOCIAL_API_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout_secs(&raw)?,
            Err(_) => default_timeout(),
        };
        Ok(Self {
            base_url: std::env::var("SOCIAL_API_BASE_URL").unwrap_or_else(|_| default_base_url()),
            timeout_secs,
        })
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Request timeout. Zero is rejected since it would fail every request.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("must be at least 1 second".to_string()));
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }

    /// Check the base address and return it without trailing slashes.
    pub fn normalized_base_url(&self) -> Result<String, ConfigError> {
        normalize_base_url(&self.base_url)
    }
}

/// Parse a timeout in whole seconds; zero and non-numbers are rejected.
pub fn parse_timeout_secs(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidTimeout("must be at least 1 second".to_string())),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::InvalidTimeout(format!("{raw:?}: {e}"))),
    }
}

/// Validate a base address and trim its trailing slashes.
///
/// The result is non-empty and parses as an absolute URL.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyBaseUrl);
    }
    url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl(format!("{trimmed}: {e}")))?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"https://api.example.com"}"#).unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = ClientConfig::new("https://api.example.com/api//");
        assert_eq!(
            config.normalized_base_url().unwrap(),
            "https://api.example.com/api"
        );
    }

    #[test]
    fn empty_base_is_rejected() {
        assert_eq!(normalize_base_url(""), Err(ConfigError::EmptyBaseUrl));
        assert_eq!(normalize_base_url("  / "), Err(ConfigError::EmptyBaseUrl));
    }

    #[test]
    fn relative_base_is_rejected() {
        let err = normalize_base_url("api/v1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn timeout_parsing() {
        assert_eq!(parse_timeout_secs("45"), Ok(45));
        assert_eq!(parse_timeout_secs(" 5 "), Ok(5));
        assert!(matches!(parse_timeout_secs("0"), Err(ConfigError::InvalidTimeout(_))));
        assert!(matches!(parse_timeout_secs("soon"), Err(ConfigError::InvalidTimeout(_))));
        assert!(matches!(parse_timeout_secs("-3"), Err(ConfigError::InvalidTimeout(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ClientConfig::new("https://api.example.com").with_timeout_secs(0);
        assert!(matches!(config.timeout(), Err(ConfigError::InvalidTimeout(_))));
        assert_eq!(
            config.with_timeout_secs(7).timeout(),
            Ok(Duration::from_secs(7))
        );
    }
}
