//! The acting user and the keys they hold.

use crate::error::{Phase, RecordError, RecordResult};
use radiks_crypto::{KeyPair, SymmetricKey};
use radiks_types::SigningKeyId;
use std::collections::HashMap;

/// A signing keypair together with the id it is published under.
#[derive(Debug, Clone)]
pub struct ActiveSigningKey {
    pub id: SigningKeyId,
    pub key_pair: KeyPair,
}

impl ActiveSigningKey {
    pub fn new(id: SigningKeyId, key_pair: KeyPair) -> Self {
        Self { id, key_pair }
    }

    /// A fresh random keypair under a fresh id.
    pub fn generate() -> Self {
        Self::new(SigningKeyId::new(), KeyPair::generate())
    }
}

/// Keys shared by the members of a user group.
#[derive(Debug, Clone)]
pub struct GroupKeys {
    pub signing_key: Option<ActiveSigningKey>,
    pub encryption_key: SymmetricKey,
}

/// Identity and key material of the user performing an operation.
///
/// Records without a `userGroupId` use the personal keys; records with one
/// use that group's keys.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub username: String,
    pub encryption_key: SymmetricKey,
    pub signing_key: Option<ActiveSigningKey>,
    groups: HashMap<String, GroupKeys>,
}

impl UserContext {
    /// A user with an encryption key but no signing key yet.
    pub fn new(username: &str, encryption_key: SymmetricKey) -> Self {
        Self {
            username: username.to_string(),
            encryption_key,
            signing_key: None,
            groups: HashMap::new(),
        }
    }

    /// A user with freshly generated personal keys.
    pub fn generate(username: &str) -> Self {
        Self::new(username, SymmetricKey::generate()).with_signing_key(ActiveSigningKey::generate())
    }

    #[must_use]
    pub fn with_signing_key(mut self, key: ActiveSigningKey) -> Self {
        self.signing_key = Some(key);
        self
    }

    #[must_use]
    pub fn with_group(mut self, group_id: &str, keys: GroupKeys) -> Self {
        self.groups.insert(group_id.to_string(), keys);
        self
    }

    /// Grants or replaces membership keys for `group_id`.
    pub fn join_group(&mut self, group_id: &str, keys: GroupKeys) {
        self.groups.insert(group_id.to_string(), keys);
    }

    pub fn group(&self, group_id: &str) -> Option<&GroupKeys> {
        self.groups.get(group_id)
    }

    /// Id of the personal signing key, if provisioned.
    pub fn signing_key_id(&self) -> Option<&SigningKeyId> {
        self.signing_key.as_ref().map(|k| &k.id)
    }

    /// The signing key for a record in `group`, or the personal one.
    pub fn signing_key_for(&self, group: Option<&str>) -> RecordResult<&ActiveSigningKey> {
        let key = match group {
            Some(g) => self.groups.get(g).and_then(|keys| keys.signing_key.as_ref()),
            None => self.signing_key.as_ref(),
        };
        key.ok_or_else(|| RecordError::NoSigningKey {
            group: group.map(str::to_string),
        })
    }

    /// The encryption key for a record in `group`, or the personal one.
    pub fn encryption_key_for(
        &self,
        group: Option<&str>,
        phase: Phase,
    ) -> RecordResult<&SymmetricKey> {
        match group {
            None => Ok(&self.encryption_key),
            Some(g) => self
                .groups
                .get(g)
                .map(|keys| &keys.encryption_key)
                .ok_or_else(|| RecordError::MissingKey {
                    group: g.to_string(),
                    phase,
                }),
        }
    }
}
