//! Identifier types used throughout the Radiks workspace.
//!
//! Generated identifiers use UUID v7, which embeds a timestamp for natural
//! ordering. Identifiers received from a backend are accepted as arbitrary
//! non-empty strings, since other clients may mint them differently.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

fn validate(kind: &str, s: &str) -> Result<(), Error> {
    if s.is_empty() {
        return Err(Error::InvalidId(format!("{kind} must not be empty")));
    }
    if s.chars().any(|c| c.is_control() || c == '/') {
        return Err(Error::InvalidId(format!(
            "{kind} contains a control character or '/': {s:?}"
        )));
    }
    Ok(())
}

/// Unique identifier for a record. Assigned at creation, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new time-ordered record ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Creates a record ID from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Parses a record ID from a string.
    pub fn parse(s: &str) -> Result<Self, Error> {
        validate("record id", s)?;
        Ok(Self(s.to_string()))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate("record id", &value)?;
        Ok(Self(value))
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// Identifier of a signing key. Records hold it as a reference, never the key itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SigningKeyId(String);

impl SigningKeyId {
    /// Creates a new signing key ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Parses a signing key ID from a string.
    pub fn parse(s: &str) -> Result<Self, Error> {
        validate("signing key id", s)?;
        Ok(Self(s.to_string()))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SigningKeyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SigningKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SigningKeyId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SigningKeyId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate("signing key id", &value)?;
        Ok(Self(value))
    }
}

impl From<SigningKeyId> for String {
    fn from(id: SigningKeyId) -> Self {
        id.0
    }
}
