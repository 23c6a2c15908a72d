//! In-process backends.
//!
//! All state lives behind `tokio::sync::RwLock`. Each backend can be
//! switched offline with `set_available(false)`, after which every call
//! fails with [`StoreError::Unavailable`].

use crate::error::{StoreError, StoreResult};
use crate::traits::{BlobStore, DocumentStore, QueryService, SigningKeyRegistry};
use async_trait::async_trait;
use radiks_crypto::VerifyingKey;
use radiks_model::{Document, Filter};
use radiks_types::{RecordId, SigningKeyId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Document store and query service over an insertion-ordered list.
///
/// Re-saving a document replaces it in place, so native order is the
/// order of first save.
pub struct MemoryIndex {
    docs: RwLock<Vec<Document>>,
    available: AtomicBool,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggles simulated availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    /// Snapshot of all stored documents in native order.
    pub async fn documents(&self) -> Vec<Document> {
        self.docs.read().await.clone()
    }

    fn check(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable {
                backend: self.backend_name(),
            })
        }
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryIndex {
    fn backend_name(&self) -> &'static str {
        "memory-index"
    }

    async fn put(&self, doc: &Document) -> StoreResult<()> {
        self.check()?;
        let mut docs = self.docs.write().await;
        match docs.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => *existing = doc.clone(),
            None => docs.push(doc.clone()),
        }
        debug!(id = %doc.id, model = %doc.model_type, "indexed document");
        Ok(())
    }

    async fn get(&self, id: &RecordId) -> StoreResult<Option<Document>> {
        self.check()?;
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|d| &d.id == id).cloned())
    }

    async fn delete(&self, id: &RecordId) -> StoreResult<()> {
        self.check()?;
        let mut docs = self.docs.write().await;
        docs.retain(|d| &d.id != id);
        Ok(())
    }
}

#[async_trait]
impl QueryService for MemoryIndex {
    async fn query(&self, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.check()?;
        let docs = self.docs.read().await;
        let matched: Vec<Document> = docs.iter().filter(|d| filter.matches(d)).cloned().collect();
        Ok(filter.paginate(matched))
    }

    async fn count(&self, filter: &Filter) -> StoreResult<usize> {
        self.check()?;
        let docs = self.docs.read().await;
        Ok(docs.iter().filter(|d| filter.matches(d)).count())
    }
}

/// File storage that keeps blobs in memory and counts deletions.
pub struct MemoryBlobStore {
    base_url: String,
    files: RwLock<BTreeMap<String, Vec<u8>>>,
    deleted: RwLock<Vec<String>>,
    deletions: AtomicUsize,
    available: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::with_base_url("memory://blobs")
    }

    /// Uses `base_url` as the prefix of returned file URLs.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            files: RwLock::new(BTreeMap::new()),
            deleted: RwLock::new(Vec::new()),
            deletions: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// Toggles simulated availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns the bytes stored at `path`.
    pub async fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.read().await.get(path).cloned()
    }

    /// Paths currently stored.
    pub async fn paths(&self) -> Vec<String> {
        self.files.read().await.keys().cloned().collect()
    }

    /// How many times `delete_file` succeeded.
    pub fn deletion_count(&self) -> usize {
        self.deletions.load(Ordering::SeqCst)
    }

    /// Paths passed to `delete_file`, in call order.
    pub async fn deleted_paths(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }

    fn check(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable {
                backend: "memory-blob-store",
            })
        }
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_file(&self, path: &str, bytes: Vec<u8>) -> StoreResult<String> {
        self.check()?;
        self.files.write().await.insert(path.to_string(), bytes);
        Ok(format!("{}/{}", self.base_url, path))
    }

    async fn delete_file(&self, path: &str) -> StoreResult<()> {
        self.check()?;
        self.files.write().await.remove(path);
        self.deleted.write().await.push(path.to_string());
        self.deletions.fetch_add(1, Ordering::SeqCst);
        debug!(path, "deleted blob");
        Ok(())
    }
}

/// Signing-key registry backed by a map.
#[derive(Default)]
pub struct MemoryKeyRegistry {
    keys: RwLock<HashMap<SigningKeyId, VerifyingKey>>,
}

impl MemoryKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `key` under `id`, replacing any previous key.
    pub async fn register(&self, id: SigningKeyId, key: VerifyingKey) {
        self.keys.write().await.insert(id, key);
    }

    /// Withdraws the key under `id`.
    pub async fn revoke(&self, id: &SigningKeyId) -> Option<VerifyingKey> {
        self.keys.write().await.remove(id)
    }
}

#[async_trait]
impl SigningKeyRegistry for MemoryKeyRegistry {
    async fn resolve(&self, id: &SigningKeyId) -> StoreResult<Option<VerifyingKey>> {
        Ok(self.keys.read().await.get(id).copied())
    }
}
