//! Record signatures.
//!
//! A signature covers `"{id}-{updatedAt}"` only; it attests to identity and
//! mutation time, not to field contents.

use crate::context::UserContext;
use crate::error::{RecordError, RecordResult};
use crate::model::Model;
use crate::record::Record;
use radiks_crypto::Signature;
use radiks_model::Document;
use radiks_store::SigningKeyRegistry;
use radiks_types::{RecordId, Timestamp};
use tracing::debug;

/// The canonical signed message: `"{id}-{updatedAt}"`, or `"{id}"` before
/// the first timestamp exists.
pub fn signable_message(id: &RecordId, updated_at: Option<Timestamp>) -> String {
    match updated_at {
        Some(ts) => format!("{id}-{ts}"),
        None => id.to_string(),
    }
}

/// Verifies a hex signature over `message`. Malformed input verifies as `false`.
pub fn verify(message: &str, public_key_hex: &str, signature_hex: &str) -> bool {
    radiks_crypto::verify_hex(message, public_key_hex, signature_hex)
}

/// Signs `record` for its current state with the key of its user group,
/// or the personal key, and records which key was used.
pub fn sign_record<M: Model>(ctx: &UserContext, record: &mut Record<M>) -> RecordResult<()> {
    let key = ctx.signing_key_for(record.user_group_id())?;
    let message = record.signable_message();
    let signature = key.key_pair.signing_key.sign(message.as_bytes());
    debug!(id = %record.id(), key = %key.id, "signed record");
    record.set_signature(key.id.clone(), signature.to_hex());
    Ok(())
}

/// Checks a stored document's signature against the registry.
pub async fn verify_document(
    doc: &Document,
    registry: &dyn SigningKeyRegistry,
) -> RecordResult<()> {
    let fail = |reason: String| RecordError::Verification {
        id: doc.id.clone(),
        reason,
    };

    let key = registry
        .resolve(&doc.signing_key_id)
        .await?
        .ok_or_else(|| fail(format!("unknown signing key {}", doc.signing_key_id)))?;
    let signature =
        Signature::from_hex(&doc.signature).map_err(|_| fail("malformed signature".into()))?;
    let message = signable_message(&doc.id, Some(doc.updated_at));
    key.verify(message.as_bytes(), &signature)
        .map_err(|_| fail("signature does not match".into()))
}
