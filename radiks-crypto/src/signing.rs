//! Ed25519 signing and verification for record signatures.
//!
//! Public keys and signatures travel as lowercase hex strings inside
//! persisted documents and key registries.

use ed25519_dalek::{
    Signature as DalekSignature, Signer as _, SigningKey as DalekSigningKey, Verifier as _,
    VerifyingKey as DalekVerifyingKey,
};
use rand::rngs::OsRng;

use crate::error::{CryptoError, CryptoResult};

/// Size of an Ed25519 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of an Ed25519 signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Ed25519 signing key (secret).
#[derive(Clone)]
pub struct SigningKey(DalekSigningKey);

/// Ed25519 verifying key (public).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyingKey(DalekVerifyingKey);

/// Ed25519 signature bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature(DalekSignature);

/// A keypair for signing and verification.
#[derive(Clone)]
pub struct KeyPair {
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generates a new random Ed25519 keypair.
    pub fn generate() -> Self {
        let signing = DalekSigningKey::generate(&mut OsRng);
        let verifying = signing.verifying_key();
        Self {
            signing_key: SigningKey(signing),
            verifying_key: VerifyingKey(verifying),
        }
    }

    /// Rebuilds a keypair from a 32-byte secret.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(bytes);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("signing_key", &"[REDACTED]")
            .field("verifying_key", &self.verifying_key.to_hex())
            .finish()
    }
}

impl SigningKey {
    /// Creates a signing key from raw 32-byte secret.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(DalekSigningKey::from_bytes(bytes))
    }

    /// Returns the raw 32-byte secret key.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Signs a message and returns the signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.0.sign(message))
    }

    /// Returns the corresponding verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }
}

impl VerifyingKey {
    /// Creates a verifying key from raw 32-byte public key.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_SIZE]) -> CryptoResult<Self> {
        DalekVerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    /// Parses a verifying key from its hex encoding.
    pub fn from_hex(encoded: &str) -> CryptoResult<Self> {
        let bytes = hex::decode(encoded)
            .map_err(|e| CryptoError::InvalidEncoding(format!("public key is not hex: {e}")))?;
        let array: [u8; PUBLIC_KEY_SIZE] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: PUBLIC_KEY_SIZE,
                    actual: bytes.len(),
                })?;
        Self::from_bytes(&array)
    }

    /// Returns the raw 32-byte public key.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0.to_bytes()
    }

    /// Returns the hex encoding of the public key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Verifies a signature against a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> CryptoResult<()> {
        self.0
            .verify(message, &signature.0)
            .map_err(|_| CryptoError::InvalidSignature)
    }
}

impl Signature {
    /// Creates a signature from raw 64-byte value.
    pub fn from_bytes(bytes: &[u8; SIGNATURE_SIZE]) -> Self {
        Self(DalekSignature::from_bytes(bytes))
    }

    /// Parses a signature from its hex encoding.
    pub fn from_hex(encoded: &str) -> CryptoResult<Self> {
        let bytes = hex::decode(encoded).map_err(|_| CryptoError::InvalidSignature)?;
        let array: [u8; SIGNATURE_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidSignature)?;
        Ok(Self::from_bytes(&array))
    }

    /// Returns the raw 64-byte signature.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        self.0.to_bytes()
    }

    /// Returns the hex encoding of the signature.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

/// Verifies a hex signature over `message` with a hex public key.
///
/// Never fails: malformed keys or signatures verify as `false`.
pub fn verify_hex(message: &str, public_key_hex: &str, signature_hex: &str) -> bool {
    let Ok(key) = VerifyingKey::from_hex(public_key_hex) else {
        return false;
    };
    let Ok(signature) = Signature::from_hex(signature_hex) else {
        return false;
    };
    key.verify(message.as_bytes(), &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_roundtrip() {
        let kp = KeyPair::generate();
        let msg = b"record-1-1546300800000";
        let sig = kp.signing_key.sign(msg);
        assert!(kp.verifying_key.verify(msg, &sig).is_ok());
    }

    #[test]
    fn wrong_message_fails() {
        let kp = KeyPair::generate();
        let sig = kp.signing_key.sign(b"correct");
        assert!(kp.verifying_key.verify(b"wrong", &sig).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = KeyPair::generate();
        let kp2 = KeyPair::generate();
        let sig = kp1.signing_key.sign(b"message");
        assert!(kp2.verifying_key.verify(b"message", &sig).is_err());
    }

    #[test]
    fn key_bytes_roundtrip() {
        let kp = KeyPair::generate();
        let secret = kp.signing_key.to_bytes();
        let public = kp.verifying_key.to_bytes();

        let sk = SigningKey::from_bytes(&secret);
        let vk = VerifyingKey::from_bytes(&public).unwrap();

        let sig = sk.sign(b"test");
        assert!(vk.verify(b"test", &sig).is_ok());
    }

    #[test]
    fn hex_roundtrip() {
        let kp = KeyPair::generate();
        let sig = kp.signing_key.sign(b"data");
        let restored_key = VerifyingKey::from_hex(&kp.verifying_key.to_hex()).unwrap();
        let restored_sig = Signature::from_hex(&sig.to_hex()).unwrap();
        assert!(restored_key.verify(b"data", &restored_sig).is_ok());
    }

    #[test]
    fn keypair_from_secret_matches() {
        let kp = KeyPair::generate();
        let rebuilt = KeyPair::from_secret_bytes(&kp.signing_key.to_bytes());
        assert_eq!(rebuilt.verifying_key, kp.verifying_key);
    }

    #[test]
    fn verify_hex_accepts_valid() {
        let kp = KeyPair::generate();
        let sig = kp.signing_key.sign(b"abc-1");
        assert!(verify_hex("abc-1", &kp.verifying_key.to_hex(), &sig.to_hex()));
    }

    #[test]
    fn verify_hex_rejects_garbage_without_panicking() {
        let kp = KeyPair::generate();
        let public = kp.verifying_key.to_hex();
        assert!(!verify_hex("abc-1", &public, "not-hex"));
        assert!(!verify_hex("abc-1", &public, "abcd"));
        assert!(!verify_hex("abc-1", "zz", &"00".repeat(64)));
        assert!(!verify_hex("abc-1", &public, &"00".repeat(64)));
    }

    #[test]
    fn debug_redacts_secret() {
        let kp = KeyPair::generate();
        let debug = format!("{kp:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&hex::encode(kp.signing_key.to_bytes())));
    }
}
