//! Error types for backend calls

use thiserror::Error;

/// Result type alias for backend calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that can occur while talking to the reservation backend
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Request to {url} failed: {source}")]
    Transport {
        /// Target URL
        url: String,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status
    #[error("Backend returned {status} for {url}: {message}")]
    Status {
        /// Target URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode response from {url}: {message}")]
    Decode {
        /// Target URL
        url: String,
        /// Decoder error message
        message: String,
    },

    /// No reservation with the given code (in-memory service only)
    #[error("Reservation not found: {code}")]
    NotFound {
        /// The requested code
        code: String,
    },

    /// The HTTP client could not be constructed
    #[error("Invalid client configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },
}

impl ServiceError {
    /// Create a new status error
    #[must_use]
    pub fn status<U: Into<String>, M: Into<String>>(url: U, status: u16, message: M) -> Self {
        Self::Status {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    /// HTTP status code, when the backend answered at all
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// The most specific human-readable explanation available
    ///
    /// For error responses this is the backend's `message` field when the body
    /// is JSON (`{"message": "..."}` or `{"message": ["...", "..."]}`), else the
    /// raw body. Returns `None` when there is nothing beyond the status line.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Status { message, .. } => backend_message(message),
            Self::Transport { source, .. } => Some(source.to_string()),
            Self::Decode { message, .. } | Self::Configuration { message } => Some(message.clone()),
            Self::NotFound { code } => Some(format!("Reservation not found: {code}")),
        }
    }
}

fn backend_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let extracted = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("message")? {
            serde_json::Value::String(text) => Some(text.clone()),
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        });

    Some(extracted.unwrap_or_else(|| body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_error_display() {
        let error = ServiceError::status("http://api/reservate/9", 404, "Not Found");
        assert_eq!(
            error.to_string(),
            "Backend returned 404 for http://api/reservate/9: Not Found"
        );
        assert_eq!(error.status_code(), Some(404));
    }

    #[test]
    fn test_detail_prefers_json_message() {
        let error = ServiceError::status(
            "http://api/reservate/create",
            400,
            r#"{"statusCode":400,"message":"code must be unique"}"#,
        );
        assert_eq!(error.detail().as_deref(), Some("code must be unique"));
    }

    #[test]
    fn test_detail_joins_message_lists() {
        let error = ServiceError::status(
            "http://api/reservate/create",
            400,
            r#"{"message":["state is invalid","totalPrice must be a number"]}"#,
        );
        assert_eq!(
            error.detail().as_deref(),
            Some("state is invalid, totalPrice must be a number")
        );
    }

    #[test]
    fn test_detail_falls_back_to_raw_body() {
        let error = ServiceError::status("http://api/reservate", 502, "Bad Gateway");
        assert_eq!(error.detail().as_deref(), Some("Bad Gateway"));

        let empty = ServiceError::status("http://api/reservate", 500, "  ");
        assert_eq!(empty.detail(), None);
    }

    #[test]
    fn test_not_found_detail() {
        let error = ServiceError::NotFound {
            code: "77".to_string(),
        };
        assert_eq!(error.status_code(), Some(404));
        assert_eq!(error.detail().as_deref(), Some("Reservation not found: 77"));
    }
}
