use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape the backend uses for all failure responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data.
    /// Cuts on a char boundary so multibyte bodies cannot panic.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    /// Pull the server's `message` field out of a JSON error body,
    /// falling back to the (truncated) raw body.
    fn extract_message(body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            if let Some(message) = parsed.message {
                if !message.is_empty() {
                    return message;
                }
            }
        }
        Self::truncate_body(body)
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::extract_message(body);
        match status.as_u16() {
            400 | 422 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    /// Message suitable for showing to the user in a toast.
    /// Prefers what the server said; network-level failures get the
    /// generic fallback since their messages are not user-friendly.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::AccessDenied(msg)
            | ApiError::NotFound(msg)
            | ApiError::ServerError(msg) => {
                if msg.is_empty() {
                    crate::notice::GENERIC_FAILURE.to_string()
                } else {
                    msg.clone()
                }
            }
            ApiError::Unauthorized => "Session expired, please log in again.".to_string(),
            ApiError::NetworkError(_) | ApiError::InvalidResponse(_) => {
                crate::notice::GENERIC_FAILURE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_extracts_server_message() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message": "league is referenced by existing matches"}"#,
        );
        match err {
            ApiError::ServerError(msg) => {
                assert_eq!(msg, "league is referenced by existing matches");
            }
            other => panic!("expected ServerError, got {:?}", other),
        }
    }

    #[test]
    fn test_from_status_falls_back_to_raw_body() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "not json at all");
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "not json at all"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"message": "no such team"}"#);
        assert_eq!(err.user_message(), "no such team");
    }

    #[test]
    fn test_user_message_generic_for_empty_body() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.user_message(), crate::notice::GENERIC_FAILURE);
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(600);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::ServerError(msg) => assert!(msg.contains("truncated")),
            other => panic!("expected ServerError, got {:?}", other),
        }
    }

    #[test]
    fn test_truncate_respects_multibyte_boundary() {
        // A two-byte char straddles the cut point; the cut must back up
        // to the previous boundary instead of panicking.
        let body = format!("{}ééé", "x".repeat(499));
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::ServerError(msg) => {
                assert!(msg.contains("truncated"));
                assert!(msg.contains(&format!("{} total bytes", body.len())));
            }
            other => panic!("expected ServerError, got {:?}", other),
        }
    }
}
