//! Client configuration.
//!
//! A `ClientConfig` is frozen once handed to `ApiClient::new`. The only
//! default-value policy lives in `ClientOptions::into_config`, used by the
//! `create_client` factory: an omitted timeout becomes `DEFAULT_TIMEOUT`.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::ApiError;

/// Timeout applied by the factory when the caller gives none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Base URL used by `from_env` when `API_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const BASE_URL_ENV: &str = "API_BASE_URL";
pub const TIMEOUT_MS_ENV: &str = "API_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every endpoint path. Used verbatim: a trailing slash here
    /// produces a double slash in the final URL.
    pub base_url: String,
    /// Per-request deadline. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Extra headers merged over the default `Content-Type`.
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            headers: BTreeMap::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Read `API_BASE_URL` and `API_TIMEOUT_MS` from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = lookup(BASE_URL_ENV)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match lookup(TIMEOUT_MS_ENV) {
            Some(raw) => {
                let millis: u64 = raw.trim().parse().map_err(|_| {
                    ApiError::Config(format!("{TIMEOUT_MS_ENV} is not a number: {raw:?}"))
                })?;
                Duration::from_millis(millis)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url,
            timeout: Some(timeout),
            headers: BTreeMap::new(),
        })
    }
}

/// Partial configuration accepted by `create_client`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub timeout: Option<Duration>,
    pub headers: BTreeMap<String, String>,
}

impl ClientOptions {
    pub fn into_config(self, base_url: impl Into<String>) -> ClientConfig {
        ClientConfig {
            base_url: base_url.into(),
            timeout: Some(self.timeout.unwrap_or(DEFAULT_TIMEOUT)),
            headers: self.headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_fill_in_default_timeout() {
        let config = ClientOptions::default().into_config("http://localhost:8000");
        assert_eq!(config.timeout, Some(Duration::from_millis(10_000)));
        assert!(config.headers.is_empty());
    }

    #[test]
    fn options_keep_explicit_timeout_and_headers() {
        let mut options = ClientOptions {
            timeout: Some(Duration::from_secs(2)),
            ..Default::default()
        };
        options.headers.insert("X-Trace".to_string(), "abc".to_string());
        let config = options.into_config("http://api.example.com");
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.headers.get("X-Trace").map(String::as_str), Some("abc"));
    }

    #[test]
    fn new_config_has_no_timeout() {
        let config = ClientConfig::new("http://localhost:8000/");
        assert_eq!(config.base_url, "http://localhost:8000/");
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn env_defaults_when_unset() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn env_overrides() {
        let config = ClientConfig::from_lookup(|key| match key {
            BASE_URL_ENV => Some("https://api.example.com".to_string()),
            TIMEOUT_MS_ENV => Some("2500".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn env_rejects_non_numeric_timeout() {
        let err = ClientConfig::from_lookup(|key| {
            (key == TIMEOUT_MS_ENV).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    // The only test in the crate that touches the real process environment.
    #[test]
    fn from_env_reads_process_environment() {
        std::env::set_var(BASE_URL_ENV, "http://127.0.0.1:18080");
        std::env::set_var(TIMEOUT_MS_ENV, "750");

        let config = ClientConfig::from_env();
        let client = crate::client::create_client_from_env();

        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(TIMEOUT_MS_ENV);

        let config = config.unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:18080");
        assert_eq!(config.timeout, Some(Duration::from_millis(750)));
        assert_eq!(client.unwrap().config(), &config);
    }
}
