//! Shared test helpers for engine tests.

#![allow(dead_code)]

use radiks_engine::{Model, Record, RecordStore, UserContext};
use radiks_model::{FieldSpec, FieldType, ModelSchema};
use radiks_store::{MemoryBlobStore, MemoryIndex, MemoryKeyRegistry};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Once};

static TRACING: Once = Once::new();

/// Installs a test subscriber honouring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// `name` and `tags` are plaintext; `description`, `metadata` and `age` are sealed.
pub struct TestModel;

impl Model for TestModel {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: LazyLock<ModelSchema> = LazyLock::new(|| {
            ModelSchema::new("TestModel")
                .field(FieldSpec::plaintext("name", FieldType::String))
                .field(FieldSpec::encrypted("description", FieldType::String))
                .field(FieldSpec::plaintext("tags", FieldType::Array))
                .field(FieldSpec::encrypted("metadata", FieldType::Object))
                .field(FieldSpec::encrypted("age", FieldType::Number))
        });
        &SCHEMA
    }
}

/// A second model sharing the index with [`TestModel`].
pub struct OtherModel;

impl Model for OtherModel {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: LazyLock<ModelSchema> = LazyLock::new(|| {
            ModelSchema::new("OtherModel").field(FieldSpec::plaintext("name", FieldType::String))
        });
        &SCHEMA
    }
}

pub static BEFORE_SAVE_CALLS: AtomicUsize = AtomicUsize::new(0);
pub static AFTER_FETCH_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Rejects saves with `name == "forbidden"` and derives `slug` on save.
pub struct HookedModel;

impl Model for HookedModel {
    fn schema() -> &'static ModelSchema {
        static SCHEMA: LazyLock<ModelSchema> = LazyLock::new(|| {
            ModelSchema::new("HookedModel")
                .field(FieldSpec::plaintext("name", FieldType::String))
                .field(FieldSpec::plaintext("slug", FieldType::String))
                .default_value("slug", json!(""))
        });
        &SCHEMA
    }

    fn before_save(record: &mut Record<Self>) -> Result<(), String> {
        BEFORE_SAVE_CALLS.fetch_add(1, Ordering::SeqCst);
        let name = record
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if name == "forbidden" {
            return Err("name is forbidden".into());
        }
        record
            .set("slug", name.to_lowercase().replace(' ', "-"))
            .map_err(|e| e.to_string())
    }

    fn after_fetch(record: &mut Record<Self>) {
        let _ = record;
        AFTER_FETCH_CALLS.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory backends wired into a store, plus one provisioned user.
pub struct Harness {
    pub index: Arc<MemoryIndex>,
    pub blobs: Arc<MemoryBlobStore>,
    pub keys: Arc<MemoryKeyRegistry>,
    pub store: RecordStore,
    pub ctx: UserContext,
}

pub async fn harness() -> Harness {
    init_tracing();
    let index = Arc::new(MemoryIndex::new());
    let blobs = Arc::new(MemoryBlobStore::new());
    let keys = Arc::new(MemoryKeyRegistry::new());
    let store = RecordStore::with_index(index.clone(), blobs.clone(), keys.clone());
    let ctx = UserContext::generate("tester");
    register_user(&keys, &ctx).await;
    Harness {
        index,
        blobs,
        keys,
        store,
        ctx,
    }
}

/// Publishes the user's personal verifying key.
pub async fn register_user(keys: &MemoryKeyRegistry, ctx: &UserContext) {
    let active = ctx.signing_key.as_ref().expect("user has a signing key");
    keys.register(active.id.clone(), active.key_pair.verifying_key)
        .await;
}

/// The record used throughout the lifecycle tests.
pub fn sample_record() -> Record<TestModel> {
    Record::from_json(json!({
        "name": "tester",
        "description": "a secret description",
        "tags": ["alpha", "beta"],
        "metadata": {"nested": {"b": 2, "a": [1, 2, 3]}, "flag": true},
        "age": 42.5
    }))
    .unwrap()
}
