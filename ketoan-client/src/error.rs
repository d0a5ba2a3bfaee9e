//! Client error types

use http::StatusCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connection refused, TLS, body decode)
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Authentication required (401)
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Authenticated but not permitted (403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected by validation (400/422), or invalid client-side input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Token refresh failed; the local session has been cleared
    #[error("Session terminated: {0}")]
    SessionTerminated(#[source] Box<ClientError>),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Durable session storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(err)
        }
    }
}

impl ClientError {
    /// Map a non-success status and its body text to an error.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = error_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status this error was produced from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for 401 and for a terminated session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized(_) | ClientError::SessionTerminated(_)
        )
    }
}

/// Extract `message` (or `error`) from a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            ClientError::from_status(StatusCode::UNAUTHORIZED, ""),
            ClientError::Unauthorized(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::FORBIDDEN, ""),
            ClientError::Forbidden(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::UNPROCESSABLE_ENTITY, ""),
            ClientError::Validation(_)
        ));
        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn message_taken_from_json_body() {
        let err = ClientError::from_status(
            StatusCode::NOT_FOUND,
            r#"{"success": false, "message": "Không tìm thấy hộ kinh doanh"}"#,
        );
        match err {
            ClientError::NotFound(msg) => assert_eq!(msg, "Không tìm thấy hộ kinh doanh"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn plain_body_falls_back_to_reason() {
        let err = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>");
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");
    }

    #[test]
    fn terminated_session_is_auth_failure() {
        let err = ClientError::SessionTerminated(Box::new(ClientError::Unauthorized("x".into())));
        assert!(err.is_auth_failure());
        assert!(!ClientError::Forbidden("x".into()).is_auth_failure());
    }
}
