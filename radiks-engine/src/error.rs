//! Error types for the record engine.

use radiks_crypto::CryptoError;
use radiks_model::ModelError;
use radiks_store::StoreError;
use radiks_types::RecordId;
use std::fmt;
use thiserror::Error;

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// The step of an operation at which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validate,
    Encrypt,
    Sign,
    Persist,
    Lookup,
    Verify,
    Decrypt,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Validate => "validate",
            Phase::Encrypt => "encrypt",
            Phase::Sign => "sign",
            Phase::Persist => "persist",
            Phase::Lookup => "lookup",
            Phase::Verify => "verify",
            Phase::Decrypt => "decrypt",
        };
        f.write_str(name)
    }
}

/// Errors raised by record lifecycle and query operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// `fetch` found no document for the record's id.
    #[error("{model} {id} not found")]
    NotFound { model: String, id: RecordId },

    /// An encrypted field could not be opened.
    #[error("failed to decrypt field `{field}`: {source}")]
    Decryption {
        field: String,
        #[source]
        source: CryptoError,
    },

    /// An encrypted field could not be sealed.
    #[error("failed to encrypt field `{field}`: {source}")]
    Encryption {
        field: String,
        #[source]
        source: CryptoError,
    },

    /// No signing key is available for the acting user or group.
    #[error("no signing key available{}", group_suffix(.group))]
    NoSigningKey { group: Option<String> },

    /// The acting user holds no keys for a record's user group.
    #[error("no keys for user group `{group}`")]
    MissingKey { group: String, phase: Phase },

    /// A stored signature does not verify.
    #[error("signature verification failed for {id}: {reason}")]
    Verification { id: RecordId, reason: String },

    /// A storage or index backend failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// Attributes or a document failed model validation.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The model's `before_save` hook refused the write.
    #[error("save rejected: {0}")]
    Rejected(String),

    /// The record has been destroyed.
    #[error("record {0} has been destroyed")]
    Destroyed(RecordId),

    /// The record holds sealed ciphertexts rather than plaintext.
    #[error("record {0} is sealed; decrypt it first")]
    Sealed(RecordId),

    /// A persist was attempted without a signature for the current state.
    #[error("record {0} is not signed for its current state")]
    Unsigned(RecordId),

    /// Engine configuration could not be read.
    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

impl RecordError {
    /// Names the step that failed.
    pub fn phase(&self) -> Phase {
        match self {
            RecordError::NotFound { .. } => Phase::Lookup,
            RecordError::Decryption { .. } => Phase::Decrypt,
            RecordError::Encryption { .. } => Phase::Encrypt,
            RecordError::NoSigningKey { .. } | RecordError::Unsigned(_) => Phase::Sign,
            RecordError::MissingKey { phase, .. } => *phase,
            RecordError::Verification { .. } => Phase::Verify,
            RecordError::Persistence(_) => Phase::Persist,
            RecordError::Model(_)
            | RecordError::Rejected(_)
            | RecordError::Destroyed(_)
            | RecordError::Sealed(_)
            | RecordError::ConfigIo(_)
            | RecordError::ConfigParse(_)
            | RecordError::ConfigWrite(_) => Phase::Validate,
        }
    }

    /// Whether this is the absence outcome of a fetch.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::NotFound { .. })
    }
}

fn group_suffix(group: &Option<String>) -> String {
    match group {
        Some(g) => format!(" for user group `{g}`"),
        None => String::new(),
    }
}
