//! Error types for the YouTube relay
//!
//! Separates failures reported by the YouTube API itself from local
//! validation errors and transport problems, so callers can map each
//! kind to its own response.

use thiserror::Error;

/// Error type for all relay operations
#[derive(Error, Debug)]
pub enum RelayError {
    /// Caller-supplied input was rejected before contacting YouTube
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// YouTube answered with a non-success status
    #[error("YouTube API error ({status}): {message}")]
    Upstream {
        /// HTTP status returned by the API
        status: u16,
        /// Human-readable message from the error envelope
        message: String,
        /// Machine-readable reason (e.g. "commentsDisabled", "quotaExceeded")
        reason: Option<String>,
    },

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl RelayError {
    /// Returns true for the 403 YouTube sends when a video has comments turned off
    ///
    /// A 403 without any machine-readable reason is treated the same way.
    pub fn is_comments_disabled(&self) -> bool {
        match self {
            RelayError::Upstream {
                status: 403,
                reason,
                ..
            } => matches!(reason.as_deref(), None | Some("commentsDisabled")),
            _ => false,
        }
    }

    /// Upstream status code, if this error came from the API
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            RelayError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
