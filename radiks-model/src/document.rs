//! The persisted document shape.
//!
//! A saved record travels as one flat JSON object:
//!
//! ```json
//! { "_id": "…", "radiksType": "TestModel", "createdAt": 1546300800000,
//!   "updatedAt": 1546300800000, "signingKeyId": "…", "radiksSignature": "…",
//!   "name": "tester", "description": "<base64 ciphertext>" }
//! ```
//!
//! `radiksType` tags which model the document belongs to. Encrypted fields
//! keep their key and hold the base64 ciphertext string as value.

use crate::error::{ModelError, ModelResult};
use radiks_types::{RecordId, SigningKeyId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved top-level document keys.
pub mod keys {
    pub const ID: &str = "_id";
    pub const MODEL_TYPE: &str = "radiksType";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const SIGNING_KEY_ID: &str = "signingKeyId";
    pub const SIGNATURE: &str = "radiksSignature";
    pub const USER_GROUP_ID: &str = "userGroupId";

    /// Keys with meaning in the flattened filter form.
    pub const LIMIT: &str = "limit";
    pub const OFFSET: &str = "offset";
    pub const OR: &str = "$or";

    pub const DOCUMENT_KEYS: [&str; 7] = [
        ID,
        MODEL_TYPE,
        CREATED_AT,
        UPDATED_AT,
        SIGNING_KEY_ID,
        SIGNATURE,
        USER_GROUP_ID,
    ];

    /// Whether a user attribute may not use this name.
    pub fn is_reserved(name: &str) -> bool {
        DOCUMENT_KEYS.contains(&name) || matches!(name, LIMIT | OFFSET | OR)
    }
}

/// A saved record as stored by the index service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "radiksType")]
    pub model_type: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
    #[serde(rename = "signingKeyId")]
    pub signing_key_id: SigningKeyId,
    #[serde(rename = "radiksSignature")]
    pub signature: String,
    #[serde(rename = "userGroupId", default, skip_serializing_if = "Option::is_none")]
    pub user_group_id: Option<String>,
    /// Plaintext values and sealed ciphertexts, keyed by field name.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Parses a document from its JSON form, requiring every mandatory key.
    pub fn from_value(value: Value) -> ModelResult<Self> {
        if !value.is_object() {
            return Err(ModelError::InvalidDocument(
                "document must be a JSON object".into(),
            ));
        }
        serde_json::from_value(value).map_err(|e| ModelError::InvalidDocument(e.to_string()))
    }

    /// Parses a document from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> ModelResult<Self> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| ModelError::InvalidDocument(e.to_string()))?;
        Self::from_value(value)
    }

    /// Renders the flat JSON object form.
    pub fn to_value(&self) -> ModelResult<Value> {
        self.check_fields()?;
        Ok(serde_json::to_value(self)?)
    }

    /// Renders the JSON bytes written to blob storage.
    pub fn to_vec(&self) -> ModelResult<Vec<u8>> {
        self.check_fields()?;
        Ok(serde_json::to_vec(self)?)
    }

    /// Fails with [`ModelError::TypeMismatch`] unless this document belongs to `model`.
    pub fn expect_type(&self, model: &str) -> ModelResult<()> {
        if self.model_type != model {
            return Err(ModelError::TypeMismatch {
                expected: model.to_string(),
                actual: self.model_type.clone(),
            });
        }
        Ok(())
    }

    /// Blob-storage path of this document: `{radiksType}/{_id}`.
    pub fn blob_path(&self) -> String {
        format!("{}/{}", self.model_type, self.id)
    }

    /// Returns a field value by name, including reserved keys.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            keys::ID => Some(Value::String(self.id.to_string())),
            keys::MODEL_TYPE => Some(Value::String(self.model_type.clone())),
            keys::CREATED_AT => self.created_at.map(|t| Value::from(t.as_millis())),
            keys::UPDATED_AT => Some(Value::from(self.updated_at.as_millis())),
            keys::SIGNING_KEY_ID => Some(Value::String(self.signing_key_id.to_string())),
            keys::SIGNATURE => Some(Value::String(self.signature.clone())),
            keys::USER_GROUP_ID => self.user_group_id.clone().map(Value::String),
            other => self.fields.get(other).cloned(),
        }
    }

    fn check_fields(&self) -> ModelResult<()> {
        if let Some(key) = self.fields.keys().find(|k| keys::DOCUMENT_KEYS.contains(&k.as_str())) {
            return Err(ModelError::InvalidDocument(format!(
                "field map shadows reserved key `{key}`"
            )));
        }
        Ok(())
    }
}
