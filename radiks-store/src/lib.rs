//! Persistence seams for Radiks records.
//!
//! The record engine talks to four external collaborators through the
//! traits in [`traits`]:
//! - [`DocumentStore`]: upsert, get and delete documents by `_id`
//! - [`QueryService`]: list and count documents matching a [`Filter`](radiks_model::Filter)
//! - [`BlobStore`]: the user's file storage, written on save and cleaned on destroy
//! - [`SigningKeyRegistry`]: resolves a signing-key id to its public key
//!
//! [`memory`] provides in-process implementations; [`http`] provides a
//! client for a radiks-server style index.

mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use http::{RemoteIndex, RemoteIndexConfig};
pub use memory::{MemoryBlobStore, MemoryIndex, MemoryKeyRegistry};
pub use traits::{BlobStore, DocumentStore, QueryService, SigningKeyRegistry};
