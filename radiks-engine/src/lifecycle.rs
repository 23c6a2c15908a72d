//! Save, fetch and destroy of individual records.

use crate::config::EngineConfig;
use crate::context::UserContext;
use crate::encryption::{open_fields, seal_fields};
use crate::error::{Phase, RecordError, RecordResult};
use crate::model::Model;
use crate::record::{PayloadForm, Record};
use crate::signing;
use radiks_model::Document;
use radiks_store::{BlobStore, DocumentStore, QueryService, RemoteIndex, SigningKeyRegistry};
use radiks_types::RecordId;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Per-read switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Open encrypted fields. When false, records keep their ciphertexts.
    pub decrypt: bool,
    /// Verify the stored signature. Ignored when the engine config disables
    /// verification.
    pub verify: bool,
}

impl FetchOptions {
    /// Neither verify nor decrypt.
    pub fn raw() -> Self {
        Self {
            decrypt: false,
            verify: false,
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            decrypt: true,
            verify: true,
        }
    }
}

/// Orchestrates encryption, signing and persistence of records.
pub struct RecordStore {
    pub(crate) documents: Arc<dyn DocumentStore>,
    pub(crate) queries: Arc<dyn QueryService>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) keys: Arc<dyn SigningKeyRegistry>,
    pub(crate) config: EngineConfig,
}

impl RecordStore {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        queries: Arc<dyn QueryService>,
        blobs: Arc<dyn BlobStore>,
        keys: Arc<dyn SigningKeyRegistry>,
    ) -> Self {
        Self {
            documents,
            queries,
            blobs,
            keys,
            config: EngineConfig::default(),
        }
    }

    /// Uses one backend as both document store and query service.
    pub fn with_index<I>(index: Arc<I>, blobs: Arc<dyn BlobStore>, keys: Arc<dyn SigningKeyRegistry>) -> Self
    where
        I: DocumentStore + QueryService + 'static,
    {
        let documents: Arc<dyn DocumentStore> = index.clone();
        let queries: Arc<dyn QueryService> = index;
        Self::new(documents, queries, blobs, keys)
    }

    /// Connects to the remote index named in `config`, which also serves
    /// as the signing-key registry.
    pub fn connect(config: EngineConfig, blobs: Arc<dyn BlobStore>) -> RecordResult<Self> {
        let index = Arc::new(RemoteIndex::new(config.index.clone())?);
        let keys: Arc<dyn SigningKeyRegistry> = index.clone();
        Ok(Self::with_index(index, blobs, keys).with_config(config))
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read options derived from the engine config.
    pub fn default_fetch_options(&self) -> FetchOptions {
        FetchOptions {
            decrypt: self.config.decrypt_by_default,
            verify: true,
        }
    }

    /// Signs `record` for its current state without persisting it.
    pub fn sign<M: Model>(&self, ctx: &UserContext, record: &mut Record<M>) -> RecordResult<()> {
        record.ensure_live()?;
        signing::sign_record(ctx, record)
    }

    /// The attribute map as it would be persisted, with encrypted fields sealed.
    pub fn encrypted<M: Model>(
        &self,
        ctx: &UserContext,
        record: &Record<M>,
    ) -> RecordResult<Map<String, Value>> {
        record.ensure_live()?;
        if record.form() == PayloadForm::Sealed {
            return Ok(record.attrs().clone());
        }
        let key = ctx.encryption_key_for(record.user_group_id(), Phase::Encrypt)?;
        record.check_attr_keys()?;
        seal_fields(M::schema(), record.id(), record.attrs(), key)
    }

    /// Opens the encrypted fields of a record loaded without decryption.
    pub fn decrypt<M: Model>(&self, ctx: &UserContext, record: &mut Record<M>) -> RecordResult<()> {
        record.ensure_live()?;
        if record.form() == PayloadForm::Plain {
            return Ok(());
        }
        let key = ctx.encryption_key_for(record.user_group_id(), Phase::Decrypt)?;
        let attrs = open_fields(M::schema(), record.id(), record.attrs(), key)?;
        record.set_plain_attrs(attrs);
        Ok(())
    }

    /// Seals, stamps, signs and persists `record`.
    ///
    /// Keys are resolved before anything is mutated, so a missing key leaves
    /// the record untouched and nothing persisted. A backend failure leaves
    /// the new timestamp and signature on the record while its state stays
    /// as it was; saving again is an idempotent upsert.
    pub async fn save<M: Model>(&self, ctx: &UserContext, record: &mut Record<M>) -> RecordResult<()> {
        record.ensure_live()?;
        if record.form() == PayloadForm::Sealed {
            return Err(RecordError::Sealed(record.id().clone()));
        }

        let schema = M::schema();
        schema.validate_definition()?;
        M::before_save(record).map_err(RecordError::Rejected)?;
        record.check_attr_keys()?;
        schema.validate_attrs(record.attrs())?;

        let group = record.user_group_id();
        ctx.signing_key_for(group)?;
        let key = ctx.encryption_key_for(group, Phase::Encrypt)?;
        let sealed = seal_fields(schema, record.id(), record.attrs(), key)?;

        record.stamp();
        signing::sign_record(ctx, record)?;
        if !record.is_signed() {
            return Err(RecordError::Unsigned(record.id().clone()));
        }
        let doc = record.to_document(sealed)?;

        let url = self.blobs.put_file(&doc.blob_path(), doc.to_vec()?).await?;
        record.mark_persist_attempted();
        self.documents.put(&doc).await?;
        record.mark_saved();

        debug!(
            model = %schema.model_name,
            id = %doc.id,
            updated_at = %doc.updated_at,
            %url,
            "saved record"
        );
        Ok(())
    }

    /// Replaces `record` with its currently stored version.
    ///
    /// Fails with [`RecordError::NotFound`] when nothing is stored under its id.
    pub async fn fetch<M: Model>(
        &self,
        ctx: &UserContext,
        record: &mut Record<M>,
        opts: FetchOptions,
    ) -> RecordResult<()> {
        record.ensure_live()?;
        let doc = self
            .documents
            .get(record.id())
            .await?
            .ok_or_else(|| RecordError::NotFound {
                model: M::schema().model_name.clone(),
                id: record.id().clone(),
            })?;
        doc.expect_type(&M::schema().model_name)?;
        *record = self.materialize(ctx, doc, opts).await?;
        Ok(())
    }

    /// Looks up a record by id. Absence, including a document of another
    /// model under the same id, is `Ok(None)`.
    pub async fn find_by_id<M: Model>(
        &self,
        ctx: &UserContext,
        id: &RecordId,
        opts: FetchOptions,
    ) -> RecordResult<Option<Record<M>>> {
        let Some(doc) = self.documents.get(id).await? else {
            debug!(%id, "record not found");
            return Ok(None);
        };
        if doc.model_type != M::schema().model_name {
            debug!(%id, stored = %doc.model_type, "id belongs to another model");
            return Ok(None);
        }
        Ok(Some(self.materialize(ctx, doc, opts).await?))
    }

    /// Removes the stored document, then deletes the record's blob once.
    ///
    /// The index delete also runs after a save whose index write failed,
    /// since the backend may have committed it. For a record that never
    /// reached the index, only the blob deletion runs.
    pub async fn destroy<M: Model>(&self, record: &mut Record<M>) -> RecordResult<()> {
        record.ensure_live()?;
        if record.may_be_stored() {
            self.documents.delete(record.id()).await?;
        }
        let path = format!("{}/{}", M::schema().model_name, record.id());
        self.blobs.delete_file(&path).await?;
        record.mark_deleted();
        info!(model = %M::schema().model_name, id = %record.id(), "destroyed record");
        Ok(())
    }

    /// Verifies and opens a stored document into a record.
    pub(crate) async fn materialize<M: Model>(
        &self,
        ctx: &UserContext,
        doc: Document,
        opts: FetchOptions,
    ) -> RecordResult<Record<M>> {
        M::schema().validate_definition()?;
        if opts.verify && self.config.verify_signatures {
            signing::verify_document(&doc, self.keys.as_ref()).await?;
        }

        let (attrs, form) = if opts.decrypt {
            let key = ctx.encryption_key_for(doc.user_group_id.as_deref(), Phase::Decrypt)?;
            (open_fields(M::schema(), &doc.id, &doc.fields, key)?, PayloadForm::Plain)
        } else {
            (doc.fields.clone(), PayloadForm::Sealed)
        };

        let mut record = Record::from_document(doc, attrs, form);
        M::after_fetch(&mut record);
        Ok(record)
    }
}
