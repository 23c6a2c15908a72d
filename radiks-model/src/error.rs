//! Error types for model value objects.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while validating schemas, documents or filters.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The schema definition itself is inconsistent.
    #[error("invalid schema for {model}: {reason}")]
    Schema { model: String, reason: String },

    /// An attribute value does not match its declared type.
    #[error("field `{field}` expects {expected}, got {actual}")]
    FieldType {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A persisted document is missing required keys or is malformed.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A document was materialized as the wrong model.
    #[error("document type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A filter could not be parsed.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
