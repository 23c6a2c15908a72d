//! Abstract backend interfaces.

use crate::error::StoreResult;
use async_trait::async_trait;
use radiks_crypto::VerifyingKey;
use radiks_model::{Document, Filter};
use radiks_types::{RecordId, SigningKeyId};

/// Raw persist/retrieve/delete of documents keyed by `_id`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name used in logs and errors.
    fn backend_name(&self) -> &'static str;

    /// Writes `doc`, replacing any document with the same `_id`.
    async fn put(&self, doc: &Document) -> StoreResult<()>;

    /// Returns the document stored under `id`, or `None`.
    async fn get(&self, id: &RecordId) -> StoreResult<Option<Document>>;

    /// Removes the document under `id`. Deleting an absent id succeeds.
    async fn delete(&self, id: &RecordId) -> StoreResult<()>;
}

/// Filtered lookups against the index.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Returns matching documents in the index's native order, with the
    /// filter's offset and limit applied.
    async fn query(&self, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// Counts matching documents, ignoring offset and limit.
    async fn count(&self, filter: &Filter) -> StoreResult<usize>;
}

/// The user's file storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `bytes` at `path` and returns the public URL of the file.
    async fn put_file(&self, path: &str, bytes: Vec<u8>) -> StoreResult<String>;

    /// Removes the file at `path`. Removing an absent file succeeds.
    async fn delete_file(&self, path: &str) -> StoreResult<()>;
}

/// Resolves signing-key ids to public keys for verification.
#[async_trait]
pub trait SigningKeyRegistry: Send + Sync {
    async fn resolve(&self, id: &SigningKeyId) -> StoreResult<Option<VerifyingKey>>;
}
