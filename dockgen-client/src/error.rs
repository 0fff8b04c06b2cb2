//! Error types for the DockGen client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the DockGen client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The configured base URL cannot be turned into an endpoint URL
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The backend accepted the request but reported that it did not succeed
    #[error("Operation rejected: {0}")]
    Rejected(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if the backend endpoint was unreachable
    ///
    /// Only connection establishment failures count. Timeouts on an
    /// established connection, HTTP error statuses and bad payloads are
    /// treated as transient by callers.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::RequestFailed(e) if e.is_connect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_classification() {
        assert!(!ClientError::api_error(503, "busy").is_connectivity());
        assert!(!ClientError::ParseError("bad json".into()).is_connectivity());
        assert!(!ClientError::Rejected("no write access".into()).is_connectivity());
        assert!(!ClientError::InvalidUrl("cannot be a base".into()).is_connectivity());
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::api_error(502, "bad gateway");
        assert!(matches!(err, ClientError::ApiError { status: 502, .. }));
        assert_eq!(err.to_string(), "API error (status 502): bad gateway");
    }
}
