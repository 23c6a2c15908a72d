//! Field-level sealing of encrypted attributes.
//!
//! Each declared encrypted field that is present and non-null is serialized
//! to canonical JSON, encrypted with the associated data `"{id}/{field}"`
//! and replaced by its base64 ciphertext. Plaintext and undeclared fields
//! pass through unchanged.

use crate::error::{RecordError, RecordResult};
use radiks_crypto::{CryptoError, SymmetricKey, decrypt_string, encrypt_string};
use radiks_model::ModelSchema;
use radiks_types::RecordId;
use serde_json::{Map, Value};

/// Returns `attrs` with every encrypted field sealed under `key`.
pub fn seal_fields(
    schema: &ModelSchema,
    id: &RecordId,
    attrs: &Map<String, Value>,
    key: &SymmetricKey,
) -> RecordResult<Map<String, Value>> {
    let mut sealed = attrs.clone();
    for spec in schema.encrypted_fields() {
        let Some(value) = attrs.get(&spec.name).filter(|v| !v.is_null()) else {
            continue;
        };
        let fail = |source: CryptoError| RecordError::Encryption {
            field: spec.name.clone(),
            source,
        };
        let plaintext = serde_json::to_string(&canonicalize(value)).map_err(|e| fail(e.into()))?;
        let ciphertext =
            encrypt_string(key, &plaintext, field_aad(id, &spec.name).as_bytes()).map_err(fail)?;
        sealed.insert(spec.name.clone(), Value::String(ciphertext));
    }
    Ok(sealed)
}

/// Inverse of [`seal_fields`].
pub fn open_fields(
    schema: &ModelSchema,
    id: &RecordId,
    fields: &Map<String, Value>,
    key: &SymmetricKey,
) -> RecordResult<Map<String, Value>> {
    let mut opened = fields.clone();
    for spec in schema.encrypted_fields() {
        let Some(value) = fields.get(&spec.name).filter(|v| !v.is_null()) else {
            continue;
        };
        let fail = |source: CryptoError| RecordError::Decryption {
            field: spec.name.clone(),
            source,
        };
        let Value::String(ciphertext) = value else {
            return Err(fail(CryptoError::Decryption(
                "ciphertext must be a base64 string".into(),
            )));
        };
        let plaintext =
            decrypt_string(key, ciphertext, field_aad(id, &spec.name).as_bytes()).map_err(fail)?;
        let restored: Value = serde_json::from_str(&plaintext).map_err(|e| fail(e.into()))?;
        opened.insert(spec.name.clone(), restored);
    }
    Ok(opened)
}

fn field_aad(id: &RecordId, field: &str) -> String {
    format!("{id}/{field}")
}

/// Rebuilds objects with keys in sorted order at every depth.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
