//! HTTP client for the YouTube Data API
//!
//! Sends authenticated GET requests and turns non-success responses into
//! [`RelayError::Upstream`] using Google's error envelope. Requests are
//! made once; failures are never retried.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{RelayError, Result};
use crate::url::{DEFAULT_API_BASE_URL, build_api_url};

const USER_AGENT: &str = concat!("ytrelay/", env!("CARGO_PKG_VERSION"));

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Data API (default: `https://www.googleapis.com/youtube/v3`)
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Builds the underlying `reqwest` client for this configuration
    ///
    /// The result can be shared by many [`YoutubeClient`]s so requests
    /// reuse pooled connections.
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(RelayError::Http)
    }
}

/// Google API error envelope: `{"error": {"code", "message", "errors": [...]}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

/// Authenticated client for one caller's API key
///
/// Cheap to construct: the connection pool lives in the shared
/// `reqwest::Client`.
#[derive(Clone)]
pub struct YoutubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for YoutubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl YoutubeClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// - `InvalidInput` if the API key is empty
    /// - `Http` if the HTTP client cannot be initialized
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, &ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(api_key: impl Into<String>, config: &ClientConfig) -> Result<Self> {
        let http = config.build_http_client()?;
        Self::with_http_client(http, config.base_url.clone(), api_key)
    }

    /// Create a client on top of an existing `reqwest::Client`
    ///
    /// # Errors
    /// Returns `InvalidInput` if the API key is empty or whitespace only
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(RelayError::InvalidInput(
                "API key cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    /// Fetch a Data API endpoint and return the raw JSON body
    ///
    /// # Arguments
    /// * `endpoint` - Resource name (e.g., "search", "commentThreads")
    /// * `params` - Query parameters; the API key is appended automatically
    ///
    /// # Errors
    /// - `Http` - Network errors or timeouts
    /// - `Upstream` - YouTube returned a non-success status
    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
        let url = build_api_url(&self.base_url, endpoint);
        tracing::debug!(endpoint, ?params, "YouTube API request");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| RelayError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Http(e.without_url()))?;

        if status.is_success() {
            return Ok(body);
        }

        let error = upstream_error(status, &body);
        tracing::debug!(endpoint, %status, "YouTube API error: {}", error);
        Err(error)
    }
}

/// Builds an `Upstream` error from a non-success response
fn upstream_error(status: reqwest::StatusCode, body: &str) -> RelayError {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    };

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let reason = envelope
                .error
                .errors
                .into_iter()
                .find_map(|detail| detail.reason);
            let message = if envelope.error.message.is_empty() {
                fallback()
            } else {
                envelope.error.message
            };
            RelayError::Upstream {
                status: status.as_u16(),
                message,
                reason,
            }
        }
        Err(_) => RelayError::Upstream {
            status: status.as_u16(),
            message: fallback(),
            reason: None,
        },
    }
}
