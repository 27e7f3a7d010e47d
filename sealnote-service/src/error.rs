//! Service-level error types.
//!
//! Cryptographic and encoding failures are converted to typed results at the
//! gateway boundary — nothing below it leaks a raw cryptographic panic or an
//! untyped error upward. Storage failures pass through unchanged; the
//! service never retries them.

use sealnote_crypto::{CipherError, EnvelopeError, KeyEncodingError};
use sealnote_store::StoreError;
use thiserror::Error;

/// Failures crossing the encryption gateway. The inner kind is preserved so
/// callers can tell which layer refused, without any lower-level detail.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    KeyEncoding(#[from] KeyEncodingError),

    #[error("decrypted payload is not valid UTF-8")]
    NotText,
}

/// Errors surfaced by note/trash operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Missing or invalid process configuration. Fatal at startup — the process
/// must not begin serving with a broken secret.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("missing server secret: set {0}")]
    MissingSecret(&'static str),

    #[error("invalid server secret in {env}: {reason}")]
    InvalidSecret { env: &'static str, reason: String },

    #[error("invalid value in {env}: {reason}")]
    InvalidValue { env: &'static str, reason: String },
}
