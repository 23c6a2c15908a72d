//! Shared test helpers for store tests.

#![allow(dead_code)]

use radiks_model::Document;
use radiks_types::{RecordId, SigningKeyId, Timestamp};
use serde_json::{Value, json};

/// Builds a saved-looking document with the given plaintext fields.
pub fn doc(id: &str, fields: Value) -> Document {
    let Value::Object(fields) = fields else {
        panic!("fields must be an object");
    };
    Document {
        id: RecordId::parse(id).unwrap(),
        model_type: "TestModel".into(),
        created_at: Some(Timestamp::from_millis(1_546_300_800_000)),
        updated_at: Timestamp::from_millis(1_546_300_800_000),
        signing_key_id: SigningKeyId::parse("personal").unwrap(),
        signature: "00".repeat(64),
        user_group_id: None,
        fields,
    }
}

/// A document as the index server would return it.
pub fn doc_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "radiksType": "TestModel",
        "createdAt": 1_546_300_800_000_i64,
        "updatedAt": 1_546_300_800_000_i64,
        "signingKeyId": "personal",
        "radiksSignature": "00".repeat(64),
        "name": name
    })
}
