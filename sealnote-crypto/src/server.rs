//! Server-wide symmetric layer.
//!
//! One authenticated cipher per process, keyed by a secret provisioned at
//! startup. This layer is content-agnostic: it encrypts opaque byte blobs,
//! whether that blob is a serialized envelope or anything else. Output is
//! `nonce(12) || ciphertext+tag`.

use crate::cipher::{NONCE_SIZE, TAG_SIZE};
use crate::error::CipherError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw byte length of the server secret.
pub const SERVER_KEY_SIZE: usize = 32;

/// The process-wide symmetric secret. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ServerSecret([u8; SERVER_KEY_SIZE]);

impl ServerSecret {
    pub fn from_bytes(bytes: [u8; SERVER_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Generates a fresh random secret (development fallback; production
    /// deployments provision one and keep it).
    pub fn generate() -> Self {
        let mut bytes = [0u8; SERVER_KEY_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// The secret as standard base64, the provisioning format.
    pub fn to_b64(&self) -> String {
        BASE64.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SERVER_KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for ServerSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ServerSecret(..)")
    }
}

/// Authenticated symmetric cipher over opaque blobs.
#[derive(Clone)]
pub struct ServerCipher {
    cipher: ChaCha20Poly1305,
}

impl ServerCipher {
    pub fn new(secret: &ServerSecret) -> Self {
        Self {
            cipher: ChaCha20Poly1305::new(Key::from_slice(secret.as_bytes())),
        }
    }

    /// Encrypts a blob under the server secret with a fresh random nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|e| CipherError::Encrypt(e.to_string()))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypts a blob produced by [`encrypt`](Self::encrypt). Tampered
    /// input, a wrong key, or a malformed structure all fail — corrupted
    /// plaintext is never returned.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        if data.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CipherError::Truncated);
        }
        let (nonce, ciphertext) = data.split_at(NONCE_SIZE);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CipherError::Decrypt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let cipher = ServerCipher::new(&ServerSecret::generate());
        let out = cipher.encrypt(b"opaque blob").unwrap();
        assert_eq!(cipher.decrypt(&out).unwrap(), b"opaque blob");
    }

    #[test]
    fn encrypting_twice_differs() {
        let cipher = ServerCipher::new(&ServerSecret::generate());
        let a = cipher.encrypt(b"same input").unwrap();
        let b = cipher.encrypt(b"same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails() {
        let cipher = ServerCipher::new(&ServerSecret::generate());
        let other = ServerCipher::new(&ServerSecret::generate());
        let out = cipher.encrypt(b"blob").unwrap();
        assert!(matches!(other.decrypt(&out), Err(CipherError::Decrypt)));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let cipher = ServerCipher::new(&ServerSecret::generate());
        let mut out = cipher.encrypt(b"blob").unwrap();
        let last = out.len() - 1;
        out[last] ^= 0x80;
        assert!(matches!(cipher.decrypt(&out), Err(CipherError::Decrypt)));
    }

    #[test]
    fn truncated_input_fails() {
        let cipher = ServerCipher::new(&ServerSecret::generate());
        assert!(matches!(cipher.decrypt(&[0u8; 8]), Err(CipherError::Truncated)));
    }

    #[test]
    fn secret_base64_roundtrip() {
        let secret = ServerSecret::generate();
        let b64 = secret.to_b64();
        let decoded = crate::keypair::decode_key_b64(&b64).unwrap();
        assert_eq!(&decoded, secret.as_bytes());
    }
}
