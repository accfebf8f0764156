//! Client configuration.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "FLOWDAPT_BASE_URL";
/// Environment variable overriding the user agent.
pub const ENV_USER_AGENT: &str = "FLOWDAPT_USER_AGENT";
/// Environment variable overriding the timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "FLOWDAPT_TIMEOUT_SECS";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "FLOWDAPT_API_KEY";

/// Default `User-Agent`, `flowdapt-rust-sdk/<crate version>`.
pub fn default_user_agent() -> String {
    format!("flowdapt-rust-sdk/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration for a Flowdapt client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server base URL; API paths are resolved against it.
    pub base_url: String,
    /// Value of the `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
    /// API key sent as a Bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Build a configuration from `FLOWDAPT_*` environment variables,
    /// falling back to defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `FLOWDAPT_TIMEOUT_SECS` is not an
    /// integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = user_agent;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::Config(format!(
                    "{} must be whole seconds, got '{}'",
                    ENV_TIMEOUT_SECS, secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(api_key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
            config.api_key = Some(api_key);
        }

        Ok(config)
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidUrl`] if the base URL is not http(s)
    /// - [`ClientError::Config`] if the timeout is zero or the user agent
    ///   is empty
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::Config("timeout must be non-zero".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ClientError::Config(
                "user agent must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
        }
    }
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(config.user_agent.starts_with("flowdapt-rust-sdk/"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://flowdapt.example.com"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_API_KEY, "secret"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base_url, "https://flowdapt.example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.user_agent, default_user_agent());
    }

    #[test]
    fn test_from_lookup_bad_timeout() {
        let result = ClientConfig::from_lookup(|k| {
            (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = ClientConfig::new("localhost:8080");
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_serde_timeout_in_seconds() {
        let config = ClientConfig::new("http://h:1").with_timeout(Duration::from_secs(12));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout"], 12);

        let back: ClientConfig =
            serde_json::from_value(serde_json::json!({ "base_url": "http://h:1" })).unwrap();
        assert_eq!(back.timeout, DEFAULT_TIMEOUT);
        assert_eq!(back.user_agent, default_user_agent());
    }
}
