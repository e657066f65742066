//! Error types for catalog search operations

use thiserror::Error;

/// Search and prediction client errors
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network or HTTP transport error (includes timeouts)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Response body did not match the expected wire format
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Malformed(err.to_string())
    }
}

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
