//! Error types for the Quire core library.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for Quire.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Page manifest loading or validation error.
    #[error("Manifest error: {message}")]
    Manifest { message: String },

    /// Search session validation error.
    #[error("Session error: {message}")]
    Session { message: String },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new manifest error with a message.
    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
        }
    }

    /// Create a new session error with a message.
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error() {
        let err = CoreError::manifest("missing pages");
        assert!(err.to_string().contains("Manifest error"));
        assert!(err.to_string().contains("missing pages"));
    }

    #[test]
    fn test_session_error() {
        let err = CoreError::session("empty query");
        assert!(err.to_string().contains("Session error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(err.to_string().contains("JSON error"));
    }
}
