//! In-memory record instances.

use crate::error::{RecordError, RecordResult};
use crate::model::Model;
use crate::signing;
use radiks_model::{Document, ModelError, keys};
use radiks_types::{RecordId, SigningKeyId, Timestamp};
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Where a record is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// Created in memory, never persisted.
    Unsaved,
    /// Persisted at least once.
    Saved,
    /// Destroyed; no further operations are accepted.
    Deleted,
}

/// Whether encrypted attributes hold plaintext or ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadForm {
    Plain,
    /// Loaded without decryption; encrypted attributes hold base64 ciphertext.
    Sealed,
}

/// A record of model `M`.
///
/// Mutating attributes or the timestamp clears the signed flag; a record is
/// only persisted after it has been signed for its current state.
pub struct Record<M: Model> {
    id: RecordId,
    attrs: Map<String, Value>,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
    signing_key_id: Option<SigningKeyId>,
    signature: Option<String>,
    user_group_id: Option<String>,
    state: RecordState,
    form: PayloadForm,
    signed: bool,
    /// A write reached the index without a confirmed outcome.
    persist_attempted: bool,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Record<M> {
    /// A new unsaved record with a generated id and the schema's defaults.
    pub fn new(attrs: Map<String, Value>) -> Self {
        Self::with_id(RecordId::new(), attrs)
    }

    /// A new unsaved record under a caller-chosen id.
    ///
    /// Reserved attribute names are rejected when the record is saved or sealed.
    pub fn with_id(id: RecordId, mut attrs: Map<String, Value>) -> Self {
        M::schema().apply_defaults(&mut attrs);
        Self {
            id,
            attrs,
            created_at: None,
            updated_at: None,
            signing_key_id: None,
            signature: None,
            user_group_id: None,
            state: RecordState::Unsaved,
            form: PayloadForm::Plain,
            signed: false,
            persist_attempted: false,
            _model: PhantomData,
        }
    }

    /// Builds a new record from a JSON object of attributes.
    pub fn from_json(value: Value) -> RecordResult<Self> {
        let Value::Object(attrs) = value else {
            return Err(ModelError::InvalidDocument("attributes must be a JSON object".into()).into());
        };
        if let Some(key) = attrs.keys().find(|k| keys::is_reserved(k)) {
            return Err(reserved(key));
        }
        Ok(Self::new(attrs))
    }

    /// Places the record in a user group whose keys seal and sign it.
    #[must_use]
    pub fn in_group(mut self, group_id: &str) -> Self {
        self.user_group_id = Some(group_id.to_string());
        self.signed = false;
        self
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    pub fn signing_key_id(&self) -> Option<&SigningKeyId> {
        self.signing_key_id.as_ref()
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn user_group_id(&self) -> Option<&str> {
        self.user_group_id.as_deref()
    }

    pub fn state(&self) -> RecordState {
        self.state
    }

    pub fn form(&self) -> PayloadForm {
        self.form
    }

    /// Whether the current signature covers the current state.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == RecordState::Deleted
    }

    /// The message a signature over this record covers.
    pub fn signable_message(&self) -> String {
        signing::signable_message(&self.id, self.updated_at)
    }

    /// Sets one attribute.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> RecordResult<()> {
        self.ensure_mutable()?;
        if keys::is_reserved(name) {
            return Err(reserved(name));
        }
        self.attrs.insert(name.to_string(), value.into());
        self.signed = false;
        Ok(())
    }

    /// Sets several attributes at once.
    pub fn update(&mut self, attrs: Map<String, Value>) -> RecordResult<()> {
        self.ensure_mutable()?;
        if let Some(key) = attrs.keys().find(|k| keys::is_reserved(k)) {
            return Err(reserved(key));
        }
        self.attrs.extend(attrs);
        self.signed = false;
        Ok(())
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove(&mut self, name: &str) -> RecordResult<Option<Value>> {
        self.ensure_mutable()?;
        let previous = self.attrs.remove(name);
        if previous.is_some() {
            self.signed = false;
        }
        Ok(previous)
    }

    /// Advances `updatedAt` without persisting.
    ///
    /// The previous signature keeps verifying for the previous message only.
    pub fn touch(&mut self) -> RecordResult<()> {
        self.ensure_live()?;
        self.updated_at = Some(Timestamp::next_after(self.updated_at));
        self.signed = false;
        Ok(())
    }

    pub(crate) fn ensure_live(&self) -> RecordResult<()> {
        if self.is_destroyed() {
            return Err(RecordError::Destroyed(self.id.clone()));
        }
        Ok(())
    }

    fn ensure_mutable(&self) -> RecordResult<()> {
        self.ensure_live()?;
        if self.form == PayloadForm::Sealed {
            return Err(RecordError::Sealed(self.id.clone()));
        }
        Ok(())
    }

    /// Advances timestamps for a save; `createdAt` is set only once.
    pub(crate) fn stamp(&mut self) {
        let now = Timestamp::next_after(self.updated_at);
        self.updated_at = Some(now);
        self.created_at.get_or_insert(now);
        self.signed = false;
    }

    pub(crate) fn set_signature(&mut self, key_id: SigningKeyId, signature: String) {
        self.signing_key_id = Some(key_id);
        self.signature = Some(signature);
        self.signed = true;
    }

    pub(crate) fn set_plain_attrs(&mut self, attrs: Map<String, Value>) {
        self.attrs = attrs;
        self.form = PayloadForm::Plain;
    }

    pub(crate) fn mark_persist_attempted(&mut self) {
        self.persist_attempted = true;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.state = RecordState::Saved;
        self.persist_attempted = false;
    }

    /// Whether the index may hold a document for this record.
    pub(crate) fn may_be_stored(&self) -> bool {
        self.state == RecordState::Saved || self.persist_attempted
    }

    /// Rejects attribute names that collide with document or filter keys.
    pub(crate) fn check_attr_keys(&self) -> RecordResult<()> {
        match self.attrs.keys().find(|k| keys::is_reserved(k)) {
            Some(key) => Err(reserved(key)),
            None => Ok(()),
        }
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.state = RecordState::Deleted;
    }

    /// Assembles the persisted document with already-sealed `fields`.
    pub(crate) fn to_document(&self, fields: Map<String, Value>) -> RecordResult<Document> {
        let unsigned = || RecordError::Unsigned(self.id.clone());
        if !self.signed {
            return Err(unsigned());
        }
        Ok(Document {
            id: self.id.clone(),
            model_type: M::schema().model_name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at.ok_or_else(unsigned)?,
            signing_key_id: self.signing_key_id.clone().ok_or_else(unsigned)?,
            signature: self.signature.clone().ok_or_else(unsigned)?,
            user_group_id: self.user_group_id.clone(),
            fields,
        })
    }

    /// Materializes a stored document; the signature is taken as valid.
    pub(crate) fn from_document(doc: Document, attrs: Map<String, Value>, form: PayloadForm) -> Self {
        Self {
            id: doc.id,
            attrs,
            created_at: doc.created_at,
            updated_at: Some(doc.updated_at),
            signing_key_id: Some(doc.signing_key_id),
            signature: Some(doc.signature),
            user_group_id: doc.user_group_id,
            state: RecordState::Saved,
            form,
            signed: true,
            persist_attempted: false,
            _model: PhantomData,
        }
    }
}

impl<M: Model> Clone for Record<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            attrs: self.attrs.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            signing_key_id: self.signing_key_id.clone(),
            signature: self.signature.clone(),
            user_group_id: self.user_group_id.clone(),
            state: self.state,
            form: self.form,
            signed: self.signed,
            persist_attempted: self.persist_attempted,
            _model: PhantomData,
        }
    }
}

impl<M: Model> std::fmt::Debug for Record<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("model", &M::schema().model_name)
            .field("id", &self.id)
            .field("state", &self.state)
            .field("form", &self.form)
            .field("signed", &self.signed)
            .field("updated_at", &self.updated_at)
            .field("attrs", &self.attrs.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn reserved(name: &str) -> RecordError {
    ModelError::InvalidDocument(format!("`{name}` is a reserved document key")).into()
}
