//! Error types for the Crest client.

use serde_json::Value;
use thiserror::Error;

/// A shared error type for the entire Crest client.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum CrestError {
    /// The backend answered with a non-success status code.
    ///
    /// `message` prefers a server-supplied `detail` or `message` field over
    /// the generic `"API error <status>: <reason>"` string. `payload` keeps
    /// the raw parsed body for callers that need to branch on it.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        payload: Option<Value>,
    },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable storage error (user cache)
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal error (should not happen in normal operation)
    #[error("internal error: {0}")]
    Internal(String),
}

impl CrestError {
    /// Creates an Api error without a captured payload.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            payload: None,
        }
    }

    /// Creates a Network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the HTTP status code, if this is an Api error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when the backend reported that the route or method does
    /// not exist (404 or 405).
    ///
    /// This predicate is the single gate for endpoint fallback: any other
    /// status, and any non-Api error, must propagate without a second attempt.
    pub fn is_route_missing(&self) -> bool {
        matches!(
            self,
            Self::Api {
                status: 404 | 405,
                ..
            }
        )
    }

    /// Check if this is a Network error.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<std::io::Error> for CrestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CrestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, CrestError>`.
pub type Result<T> = std::result::Result<T, CrestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_missing_statuses() {
        assert!(CrestError::api(404, "not found").is_route_missing());
        assert!(CrestError::api(405, "method not allowed").is_route_missing());
        for status in [400, 401, 403, 500, 503] {
            assert!(!CrestError::api(status, "nope").is_route_missing());
        }
        assert!(!CrestError::network("refused").is_route_missing());
    }

    #[test]
    fn test_api_display_is_the_message() {
        let err = CrestError::api(500, "database exploded");
        assert_eq!(err.to_string(), "database exploded");
    }
}
