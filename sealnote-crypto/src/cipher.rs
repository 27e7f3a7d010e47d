//! Session-key symmetric encryption for envelope payloads.
//!
//! Each sealed payload is a self-contained token:
//!
//! ```text
//! version(1) || issued_at seconds BE(8) || nonce(12) || ciphertext+tag
//! ```
//!
//! The header (version + timestamp + nonce) is authenticated as associated
//! data, so flipping any byte of it fails the Poly1305 tag check. The
//! timestamp records when the token was produced; this layer never rejects a
//! token for being old.

use chacha20poly1305::aead::{Aead, Error as AeadError, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw byte length of a one-time session key.
pub const SESSION_KEY_SIZE: usize = 32;
/// ChaCha20-Poly1305 nonce length.
pub const NONCE_SIZE: usize = 12;
/// Poly1305 authentication tag length.
pub const TAG_SIZE: usize = 16;

const TOKEN_VERSION: u8 = 1;
const HEADER_SIZE: usize = 1 + 8 + NONCE_SIZE;

/// One-time symmetric key, generated per seal operation and zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; SESSION_KEY_SIZE]);

impl SessionKey {
    /// Generates a fresh key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SESSION_KEY_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SESSION_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_SIZE] {
        &self.0
    }
}

/// Encrypts `plaintext` into a token under `key`, stamping `issued_at`
/// (UTC seconds) into the authenticated header.
pub fn seal_token(
    key: &SessionKey,
    plaintext: &[u8],
    issued_at: i64,
) -> Result<Vec<u8>, AeadError> {
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

    let mut header = Vec::with_capacity(HEADER_SIZE);
    header.push(TOKEN_VERSION);
    header.extend_from_slice(&issued_at.to_be_bytes());
    header.extend_from_slice(&nonce_bytes);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let ciphertext = cipher.encrypt(
        Nonce::from_slice(&nonce_bytes),
        Payload {
            msg: plaintext,
            aad: &header,
        },
    )?;

    let mut token = header;
    token.extend_from_slice(&ciphertext);
    Ok(token)
}

/// Decrypts a token produced by [`seal_token`]. Returns the plaintext and
/// the issued-at timestamp from the header. Fails on truncation, unknown
/// token version, or tag mismatch (tampered header or payload, wrong key).
pub fn open_token(
    key: &SessionKey,
    token: &[u8],
) -> Result<(Vec<u8>, i64), AeadError> {
    if token.len() < HEADER_SIZE + TAG_SIZE || token[0] != TOKEN_VERSION {
        return Err(AeadError);
    }

    let header = &token[..HEADER_SIZE];
    let mut ts_bytes = [0u8; 8];
    ts_bytes.copy_from_slice(&token[1..9]);
    let issued_at = i64::from_be_bytes(ts_bytes);
    let nonce = &token[9..HEADER_SIZE];

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let plaintext = cipher.decrypt(
        Nonce::from_slice(nonce),
        Payload {
            msg: &token[HEADER_SIZE..],
            aad: header,
        },
    )?;

    Ok((plaintext, issued_at))
}
