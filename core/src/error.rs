//! Error types for the dispatcher.
//!
//! # Design
//! Every failure is a tagged variant so callers can branch on the kind of
//! failure instead of parsing message text. `Display` still produces the
//! single human-readable message the backend contract promises: the server's
//! `detail` verbatim for application errors, and `HTTP error! status: <code>`
//! when the error body carries no usable detail.

use crate::types::ErrorDetail;

/// Errors returned by `ApiClient`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response whose body carried a `detail` message.
    #[error("{detail}")]
    Api {
        status: u16,
        detail: String,
        error_code: Option<String>,
    },

    /// Non-2xx response with an empty, non-JSON, or detail-less body.
    #[error("HTTP error! status: {status}")]
    Http { status: u16, body: String },

    /// The request never produced a response: DNS, connect, timeout, or an
    /// unusable URL.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A 2xx response body did not decode into the expected type.
    #[error("failed to decode response body: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// A configured header name or value is not valid on the wire.
    #[error("invalid header: {name}")]
    InvalidHeader { name: String },

    /// Client configuration could not be assembled.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status for failures that got as far as a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the server answered with an error status.
    pub fn is_application(&self) -> bool {
        matches!(self, ApiError::Api { .. } | ApiError::Http { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// True when the configured timeout elapsed before a response arrived.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(err) if err.is_timeout())
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Collapse into the `{ detail, status_code }` wire shape.
    pub fn to_detail(&self) -> ErrorDetail {
        ErrorDetail {
            detail: self.to_string(),
            status_code: self.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_detail_verbatim() {
        let err = ApiError::Api {
            status: 404,
            detail: "Not found".to_string(),
            error_code: None,
        };
        assert_eq!(err.to_string(), "Not found");
        assert!(err.is_application());
        assert!(err.is_not_found());
    }

    #[test]
    fn http_error_mentions_status() {
        let err = ApiError::Http {
            status: 500,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert_eq!(err.status_code(), Some(500));
        assert!(!err.is_transport());
    }

    #[test]
    fn to_detail_carries_status() {
        let err = ApiError::Api {
            status: 422,
            detail: "prompt must not be empty".to_string(),
            error_code: Some("validation".to_string()),
        };
        assert_eq!(
            err.to_detail(),
            ErrorDetail {
                detail: "prompt must not be empty".to_string(),
                status_code: Some(422),
            }
        );
    }

    #[test]
    fn config_error_has_no_status() {
        let err = ApiError::Config("API_TIMEOUT_MS is not a number".to_string());
        assert_eq!(err.status_code(), None);
        assert_eq!(err.to_detail().status_code, None);
        assert!(!err.is_application());
    }
}
