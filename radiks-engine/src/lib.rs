//! Client-side record engine for Radiks.
//!
//! A [`RecordStore`] saves, fetches, destroys and queries [`Record`]s of a
//! [`Model`]. On save, encrypted fields are sealed under the acting user's
//! key, `updatedAt` is advanced and the record is signed over
//! `"{id}-{updatedAt}"`. On read, signatures are verified against the
//! [`SigningKeyRegistry`](radiks_store::SigningKeyRegistry) and encrypted
//! fields are opened again.
//!
//! The acting user is always passed explicitly as a [`UserContext`].

pub mod config;
pub mod context;
pub mod encryption;
mod error;
mod lifecycle;
pub mod model;
mod query;
pub mod record;
pub mod signing;

pub use config::EngineConfig;
pub use context::{ActiveSigningKey, GroupKeys, UserContext};
pub use error::{Phase, RecordError, RecordResult};
pub use lifecycle::{FetchOptions, RecordStore};
pub use model::Model;
pub use record::{PayloadForm, Record, RecordState};
