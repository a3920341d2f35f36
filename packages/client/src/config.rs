//! Client configuration, set once and handed to [`PeerApiClient::new`].
//!
//! [`PeerApiClient::new`]: crate::PeerApiClient::new

use std::time::Duration;

use reqwest::Url;

use crate::error::ClientError;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/peer";

/// Where and how to reach a peer node.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `PEER_API_BASE` | `http://localhost:8080/peer` | Base URL of the peer API |
/// | `PEER_API_TIMEOUT_SECS` | (absent = no timeout) | Per-request timeout |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to, without a trailing `/`.
    pub base_url: String,

    /// Per-request timeout. `None` lets a hung request wait indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for `base_url` with no timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Populate config from environment variables, applying defaults where absent.
    ///
    /// An unparseable `PEER_API_TIMEOUT_SECS` is treated as absent.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("PEER_API_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let timeout = std::env::var("PEER_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);

        Self {
            timeout,
            ..Self::new(base_url)
        }
    }

    /// Check that the base URL is an absolute `http` or `https` URL.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ClientError::Config(format!(
                "unsupported scheme {other:?} in base URL {:?}",
                self.base_url
            ))),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("http://127.0.0.1:8081/peer/");
        assert_eq!(config.base_url, "http://127.0.0.1:8081/peer");
    }

    #[test]
    fn default_points_at_localhost() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_relative_url() {
        let err = ClientConfig::new("localhost/peer").validate().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = ClientConfig::new("ftp://example.com/peer").validate().unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }

    // The only test that touches these variables; cases run in sequence so
    // they do not race each other.
    #[test]
    fn from_env_defaults_overrides_and_bad_timeout() {
        std::env::remove_var("PEER_API_BASE");
        std::env::remove_var("PEER_API_TIMEOUT_SECS");
        assert_eq!(ClientConfig::from_env(), ClientConfig::default());

        std::env::set_var("PEER_API_BASE", "http://10.0.0.2:8081/peer/");
        std::env::set_var("PEER_API_TIMEOUT_SECS", "7");
        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, "http://10.0.0.2:8081/peer");
        assert_eq!(config.timeout, Some(Duration::from_secs(7)));

        std::env::set_var("PEER_API_TIMEOUT_SECS", "soon");
        assert!(ClientConfig::from_env().timeout.is_none());

        std::env::remove_var("PEER_API_BASE");
        std::env::remove_var("PEER_API_TIMEOUT_SECS");
    }

    #[test]
    fn timeout_builder() {
        let config = ClientConfig::new("https://node.example.com/peer")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
    }
}
