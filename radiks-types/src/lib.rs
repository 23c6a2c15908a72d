//! Core type definitions for Radiks records.
//!
//! This crate defines the small, storage-agnostic types shared by every
//! other crate in the workspace:
//! - Record and signing-key identifiers
//! - Millisecond epoch timestamps with monotonic advancement
//!
//! Model-specific types (schemas, documents, filters) live in `radiks-model`.

mod ids;
mod timestamp;

pub use ids::{RecordId, SigningKeyId};
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
