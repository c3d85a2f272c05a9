//! HTTP error responses
//!
//! Every failure leaves the server as `{"error": "<message>"}`. Internal
//! details are logged, never sent to the caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ytrelay_core::RelayError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a 400 error with the provided message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Creates a 404 error with the provided message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Creates a 500 error with the provided message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(error: RelayError) -> Self {
        match error {
            RelayError::InvalidInput(message) => Self::bad_request(message),
            RelayError::Upstream {
                status, message, ..
            } => {
                // Keep YouTube's status when it is a real error code
                let code = StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                tracing::warn!(status, "YouTube API rejected request: {}", message);
                Self {
                    status: code,
                    message: format!("YouTube API error ({}): {}", status, message),
                }
            }
            RelayError::Http(e) => {
                tracing::error!("Request to YouTube failed: {}", e);
                Self::internal("Unexpected error: could not reach the YouTube API")
            }
            RelayError::Parse(detail) => {
                tracing::error!("Unreadable YouTube response: {}", detail);
                Self::internal("Unexpected error: unreadable response from the YouTube API")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
