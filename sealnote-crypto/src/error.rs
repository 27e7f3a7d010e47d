//! Error types for the encryption layer.
//!
//! Each layer has its own error kind so callers can tell which layer refused
//! without seeing low-level cryptographic detail: [`CipherError`] for the
//! server layer, [`EnvelopeError`] for the hybrid envelope, and
//! [`KeyEncodingError`] for malformed key material supplied by a caller.
//! All three are recoverable — none of them should ever crash the process.

use thiserror::Error;

/// Failure sealing or opening a hybrid envelope.
///
/// Every open-path failure (malformed package, unknown version, bad base64,
/// wrong private key, tampered payload) collapses to this one kind. No
/// partial plaintext is ever returned alongside it.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: {0}")]
    Malformed(String),

    #[error("unsupported envelope version: {0:?}")]
    UnsupportedVersion(String),

    #[error("invalid base64 in envelope field {field}")]
    Encoding { field: &'static str },

    #[error("cannot unseal session key (wrong key or tampered envelope)")]
    Unseal,

    #[error("cannot decrypt payload (tampered or corrupted ciphertext)")]
    Decrypt,

    #[error("envelope seal failed: {0}")]
    Seal(String),
}

/// Failure in the server-wide symmetric layer.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("ciphertext too short for server layer")]
    Truncated,

    #[error("server-layer decryption failed (wrong key or tampered data)")]
    Decrypt,

    #[error("server-layer encryption failed: {0}")]
    Encrypt(String),
}

/// Malformed key material crossing the API boundary. A client input error,
/// not a server fault.
#[derive(Debug, Error)]
pub enum KeyEncodingError {
    #[error("invalid base64 key: {0}")]
    Base64(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    Length { expected: usize, actual: usize },
}
