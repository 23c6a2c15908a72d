use crate::record::Record;
use radiks_model::ModelSchema;

/// A record type stored through a [`RecordStore`](crate::RecordStore).
///
/// Implementors are marker types: the schema is static and the hooks
/// receive the record being processed.
///
/// ```ignore
/// struct Note;
///
/// impl Model for Note {
///     fn schema() -> &'static ModelSchema {
///         static SCHEMA: LazyLock<ModelSchema> = LazyLock::new(|| {
///             ModelSchema::new("Note")
///                 .field(FieldSpec::plaintext("title", FieldType::String))
///                 .field(FieldSpec::encrypted("body", FieldType::String))
///         });
///         &SCHEMA
///     }
/// }
/// ```
pub trait Model: Sized + Send + Sync + 'static {
    /// The field layout of this record type.
    fn schema() -> &'static ModelSchema;

    /// Runs before a record is validated, sealed and signed.
    /// Return `Err(message)` to reject the save.
    fn before_save(record: &mut Record<Self>) -> Result<(), String> {
        let _ = record;
        Ok(())
    }

    /// Runs after a record has been loaded from the index.
    fn after_fetch(record: &mut Record<Self>) {
        let _ = record;
    }
}
