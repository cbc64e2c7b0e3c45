//! Client Configuration
//!
//! Backend location and auth body encoding, resolved at build time.

use thiserror::Error;
use url::Url;

/// Used when `TASKFLOW_API_BASE_URL` is not set at build time.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid API base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// How credentials are sent to `/auth/login` and `/auth/register`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthBodyFormat {
    #[default]
    Json,
    Form,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    pub auth_body: AuthBodyFormat,
}

impl ClientConfig {
    /// Validate and normalize a base URL (absolute http(s), no trailing slash).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let parsed = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme `{}`", parsed.scheme())));
        }

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            auth_body: AuthBodyFormat::default(),
        })
    }

    /// Read `TASKFLOW_API_BASE_URL` and `TASKFLOW_AUTH_FORM` as baked in at compile time.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = option_env!("TASKFLOW_API_BASE_URL").unwrap_or(DEFAULT_BASE_URL);
        let mut config = Self::new(base_url)?;
        if matches!(option_env!("TASKFLOW_AUTH_FORM"), Some("1") | Some("true")) {
            config.auth_body = AuthBodyFormat::Form;
        }
        Ok(config)
    }

    pub fn with_auth_body(mut self, auth_body: AuthBodyFormat) -> Self {
        self.auth_body = auth_body;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint path such as `/tasks` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_body: AuthBodyFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("https://api.example.com/v1/").unwrap();
        assert_eq!(config.base_url(), "https://api.example.com/v1");
        assert_eq!(config.endpoint("/tasks"), "https://api.example.com/v1/tasks");
        assert_eq!(config.endpoint("tasks"), "https://api.example.com/v1/tasks");
    }

    #[test]
    fn test_rejects_relative_and_non_http() {
        assert!(matches!(
            ClientConfig::new("/api/v1"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::new("ftp://example.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_default_points_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.auth_body, AuthBodyFormat::Json);
        assert_eq!(ClientConfig::new(DEFAULT_BASE_URL).unwrap(), config);
    }
}
