//! Per-note X25519 key pairs.
//!
//! A fresh pair is generated for every note and again for every edit —
//! pairs are never reused across notes or across writes of the same note.
//! Keys cross process boundaries as standard base64 of the raw 32 bytes.

use crate::error::KeyEncodingError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use crypto_box::{PublicKey, SecretKey};
use rand::RngCore;

/// Raw byte length of both key halves.
pub const KEY_SIZE: usize = 32;

/// X25519 key pair for one note revision.
///
/// The secret key implements `ZeroizeOnDrop` automatically (from crypto_box).
pub struct NoteKeyPair {
    pub secret: SecretKey,
    pub public: PublicKey,
}

impl NoteKeyPair {
    /// Generates a fresh pair from the OS RNG.
    ///
    /// Entropy starvation panics inside the RNG; the process cannot proceed
    /// safely without randomness, so that is the intended behavior.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self::from_secret_bytes(bytes)
    }

    /// Reconstructs a pair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        let secret = SecretKey::from(bytes);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Returns the public key as a raw 32-byte array.
    pub fn public_bytes(&self) -> [u8; KEY_SIZE] {
        *self.public.as_bytes()
    }

    /// Returns the secret key as a raw 32-byte array.
    pub fn secret_bytes(&self) -> [u8; KEY_SIZE] {
        self.secret.to_bytes()
    }

    /// Secret half as standard base64, the form persisted in note records.
    pub fn secret_b64(&self) -> String {
        BASE64.encode(self.secret_bytes())
    }

    /// Public half as standard base64.
    pub fn public_b64(&self) -> String {
        BASE64.encode(self.public_bytes())
    }
}

/// Decodes a base64 key string into raw bytes, validating the length.
pub fn decode_key_b64(encoded: &str) -> Result<[u8; KEY_SIZE], KeyEncodingError> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| KeyEncodingError::Base64(e.to_string()))?;
    if bytes.len() != KEY_SIZE {
        return Err(KeyEncodingError::Length {
            expected: KEY_SIZE,
            actual: bytes.len(),
        });
    }
    let mut arr = [0u8; KEY_SIZE];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}
