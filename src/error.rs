//! Relay error types with HTTP status code mapping.
//!
//! [`RelayError`] is the central error type for the relay's REST surface.
//! Each variant maps to a specific HTTP status code and structured JSON
//! error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All relay error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "plugin not connected"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Relay-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category      | HTTP Status                  |
/// |-----------|---------------|------------------------------|
/// | 1000–1999 | Validation    | 400 Bad Request              |
/// | 2000–2999 | Connectivity  | 502 / 503 / 504              |
/// | 3000–3999 | Server        | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// No bridge client is connected.
    #[error("plugin not connected")]
    NotConnected,

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested content type is not one of `text`, `html`, `base64`.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// The client answered a waited-for command with an `error` status.
    #[error("client rejected command {id}: {message}")]
    ClientRejected {
        /// Command identifier.
        id: String,
        /// Message reported by the client.
        message: String,
    },

    /// The client did not answer a waited-for command in time.
    #[error("no reply for command {id} within {timeout_secs}s")]
    ReplyTimeout {
        /// Command identifier.
        id: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::UnsupportedContentType(_) => 1002,
            Self::NotConnected => 2001,
            Self::ClientRejected { .. } => 2002,
            Self::ReplyTimeout { .. } => 2003,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::UnsupportedContentType(_) => StatusCode::BAD_REQUEST,
            Self::NotConnected => StatusCode::SERVICE_UNAVAILABLE,
            Self::ClientRejected { .. } => StatusCode::BAD_GATEWAY,
            Self::ReplyTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        tracing::warn!(status = status.as_u16(), code, error = %self, "request failed");

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_connected_maps_to_503() {
        let err = RelayError::NotConnected;
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn validation_errors_map_to_400() {
        assert_eq!(
            RelayError::InvalidRequest("content is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::UnsupportedContentType("pdf".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn into_response_carries_status() {
        let response = RelayError::ReplyTimeout {
            id: "abc".into(),
            timeout_secs: 5,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
