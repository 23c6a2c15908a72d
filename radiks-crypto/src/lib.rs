//! Cryptographic primitives for Radiks records.
//!
//! - [`cipher`]: ChaCha20-Poly1305 authenticated encryption of field payloads
//! - [`key`]: symmetric keys with zeroization on drop
//! - [`signing`]: Ed25519 keypairs, signatures and hex wire encoding
//!
//! The record engine builds field sealing and record signing on top of
//! these; nothing here knows about schemas or documents.

pub mod cipher;
mod error;
pub mod key;
pub mod signing;

pub use cipher::{
    EncryptedData, NONCE_SIZE, TAG_SIZE, decrypt, decrypt_string, encrypt, encrypt_string,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{SymmetricKey, KEY_SIZE};
pub use signing::{verify_hex, KeyPair, Signature, SigningKey, VerifyingKey};
