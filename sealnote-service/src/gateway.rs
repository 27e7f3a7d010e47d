//! The dual-layer encryption gateway.
//!
//! The only crypto-facing API the rest of the system calls. Writing wraps a
//! plaintext in the hybrid envelope under a per-note key pair, then encrypts
//! the envelope again under the server secret. Reading reverses the two
//! layers. Every write draws a fresh key pair — the returned private key is
//! the only way to read the new ciphertext back.

use crate::error::GatewayError;
use sealnote_crypto::{self as crypto, NoteKeyPair, ServerCipher, ServerSecret};

/// Output of one write: the stored ciphertext plus the rotated key pair in
/// its base64 wire form. The private key is a first-class return value;
/// losing it makes the ciphertext permanently unrecoverable.
#[derive(Debug, Clone)]
pub struct WriteLayer {
    pub ciphertext: Vec<u8>,
    pub private_key_b64: String,
    pub public_key_b64: String,
}

/// Composes the hybrid envelope and the server cipher.
#[derive(Clone)]
pub struct EncryptionGateway {
    server: ServerCipher,
}

impl EncryptionGateway {
    pub fn new(secret: &ServerSecret) -> Self {
        Self {
            server: ServerCipher::new(secret),
        }
    }

    /// Encrypts `plaintext` under a fresh key pair: envelope first, then the
    /// server layer. Returns the ciphertext and both key halves.
    pub fn write_layer(&self, plaintext: &str) -> Result<WriteLayer, GatewayError> {
        let pair = NoteKeyPair::generate();
        let ciphertext = self.write_layer_with(plaintext, &pair)?;
        Ok(WriteLayer {
            ciphertext,
            private_key_b64: pair.secret_b64(),
            public_key_b64: pair.public_b64(),
        })
    }

    /// Encrypts `plaintext` under a caller-held pair. Used when one rotation
    /// covers several fields of the same record (title + content share a
    /// single pair per write).
    pub fn write_layer_with(
        &self,
        plaintext: &str,
        pair: &NoteKeyPair,
    ) -> Result<Vec<u8>, GatewayError> {
        let envelope = crypto::seal(plaintext.as_bytes(), &pair.public)?;
        Ok(self.server.encrypt(&envelope)?)
    }

    /// Decrypts the server layer, then opens the envelope with the supplied
    /// private key. Each failure propagates with its layer's kind intact.
    pub fn read_layer(
        &self,
        ciphertext: &[u8],
        private_key_b64: &str,
    ) -> Result<String, GatewayError> {
        let envelope = self.server.decrypt(ciphertext)?;
        let secret_bytes = crypto::decode_key_b64(private_key_b64)?;
        let pair = NoteKeyPair::from_secret_bytes(secret_bytes);
        let plaintext = crypto::open(&envelope, &pair.secret)?;
        String::from_utf8(plaintext).map_err(|_| GatewayError::NotText)
    }
}
