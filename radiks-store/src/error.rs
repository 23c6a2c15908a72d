//! Error types for the store layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by storage and index backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend is not reachable or refuses service.
    #[error("{backend} is unavailable")]
    Unavailable { backend: &'static str },

    /// Transport failure talking to a remote backend.
    #[error("network error: {0}")]
    Network(String),

    /// The remote backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A stored document could not be parsed.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Unavailable { .. } | StoreError::Network(_) => true,
            StoreError::Http { status, .. } => *status >= 500 || *status == 429,
            StoreError::InvalidDocument(_) | StoreError::Serialization(_) => false,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Network(e.to_string())
    }
}

impl From<radiks_model::ModelError> for StoreError {
    fn from(e: radiks_model::ModelError) -> Self {
        StoreError::InvalidDocument(e.to_string())
    }
}
