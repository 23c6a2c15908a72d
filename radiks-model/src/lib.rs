//! Record model value objects for Radiks.
//!
//! Defines the types every other layer agrees on:
//! - [`ModelSchema`]: a record type's fields and which of them are encrypted
//! - [`Document`]: the persisted, tagged JSON shape of a saved record
//! - [`Filter`]: equality / `$or` match criteria sent to the index service
//!
//! These types carry no keys and perform no I/O. The record engine seals
//! and signs documents; the store crate persists and queries them.

mod document;
mod error;
mod filter;
mod schema;

pub use document::{Document, keys};
pub use error::{ModelError, ModelResult};
pub use filter::Filter;
pub use schema::{FieldClass, FieldSpec, FieldType, ModelSchema};
