//! Hybrid envelope encryption for note payloads.
//!
//! `seal` packages a plaintext for a single recipient public key: the
//! plaintext is encrypted under a one-time session key, and the session key
//! is sealed anonymously to the recipient with an ephemeral X25519 exchange +
//! XSalsa20-Poly1305. The recipient learns nothing about the sender — only
//! that the package was sealed to their key.
//!
//! The wire format is a versioned UTF-8 JSON object treated everywhere else
//! as an opaque byte string:
//!
//! ```json
//! {"version": "v1", "enc_key": "<base64>", "ciphertext": "<base64>"}
//! ```
//!
//! `enc_key` is `ephemeral_pk(32) || nonce(24) || boxed session key`;
//! `ciphertext` is a session token (see [`crate::cipher`]). Unknown extra
//! keys are ignored on read; missing keys and unknown versions are hard
//! failures before any cryptographic work happens.

use crate::cipher::{self, SessionKey, SESSION_KEY_SIZE};
use crate::error::EnvelopeError;
use crate::keypair::KEY_SIZE;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use crypto_box::aead::Aead;
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// The only envelope version this build produces or accepts.
pub const ENVELOPE_VERSION: &str = "v1";

const SEAL_NONCE_SIZE: usize = 24;

#[derive(Serialize, Deserialize)]
struct EnvelopeV1 {
    version: String,
    enc_key: String,
    ciphertext: String,
}

/// Seals `plaintext` to `recipient_pk`, returning the serialized envelope.
///
/// Every call draws a fresh session key, a fresh ephemeral key pair, and
/// fresh nonces, so sealing the same plaintext twice yields different bytes.
pub fn seal(plaintext: &[u8], recipient_pk: &PublicKey) -> Result<Vec<u8>, EnvelopeError> {
    let session_key = SessionKey::generate();

    let token = cipher::seal_token(&session_key, plaintext, Utc::now().timestamp())
        .map_err(|_| EnvelopeError::Seal("payload encryption failed".into()))?;

    let sealed_key = seal_session_key(&session_key, recipient_pk)?;

    let envelope = EnvelopeV1 {
        version: ENVELOPE_VERSION.to_string(),
        enc_key: BASE64.encode(sealed_key),
        ciphertext: BASE64.encode(token),
    };
    serde_json::to_vec(&envelope).map_err(|e| EnvelopeError::Seal(e.to_string()))
}

/// Opens a serialized envelope with the recipient's private key.
///
/// Failure points, in order: JSON parse, version gate, base64 decode,
/// session-key unseal (wrong key), payload decrypt (tampering). All surface
/// as [`EnvelopeError`]; none of them return partial plaintext.
pub fn open(package: &[u8], recipient_sk: &SecretKey) -> Result<Vec<u8>, EnvelopeError> {
    let envelope: EnvelopeV1 =
        serde_json::from_slice(package).map_err(|e| EnvelopeError::Malformed(e.to_string()))?;

    if envelope.version != ENVELOPE_VERSION {
        return Err(EnvelopeError::UnsupportedVersion(envelope.version));
    }

    let sealed_key = BASE64
        .decode(&envelope.enc_key)
        .map_err(|_| EnvelopeError::Encoding { field: "enc_key" })?;
    let token = BASE64
        .decode(&envelope.ciphertext)
        .map_err(|_| EnvelopeError::Encoding { field: "ciphertext" })?;

    let session_key = open_session_key(&sealed_key, recipient_sk)?;

    let (plaintext, _issued_at) =
        cipher::open_token(&session_key, &token).map_err(|_| EnvelopeError::Decrypt)?;
    Ok(plaintext)
}

/// Seals a session key to a recipient: ephemeral X25519 pair + XSalsa20-
/// Poly1305, packed as `ephemeral_pk || nonce || ciphertext`.
fn seal_session_key(
    session_key: &SessionKey,
    recipient_pk: &PublicKey,
) -> Result<Vec<u8>, EnvelopeError> {
    let mut ephemeral_bytes = [0u8; KEY_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut ephemeral_bytes);
    let ephemeral = SecretKey::from(ephemeral_bytes);
    let ephemeral_pk = ephemeral.public_key();

    let mut nonce_bytes = [0u8; SEAL_NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

    let salsa_box = SalsaBox::new(recipient_pk, &ephemeral);
    let boxed = salsa_box
        .encrypt(
            crypto_box::Nonce::from_slice(&nonce_bytes),
            session_key.as_bytes().as_slice(),
        )
        .map_err(|_| EnvelopeError::Seal("session key sealing failed".into()))?;

    let mut sealed = Vec::with_capacity(KEY_SIZE + SEAL_NONCE_SIZE + boxed.len());
    sealed.extend_from_slice(ephemeral_pk.as_bytes());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&boxed);
    Ok(sealed)
}

fn open_session_key(sealed: &[u8], recipient_sk: &SecretKey) -> Result<SessionKey, EnvelopeError> {
    if sealed.len() <= KEY_SIZE + SEAL_NONCE_SIZE {
        return Err(EnvelopeError::Malformed("sealed session key too short".into()));
    }

    let mut epk_bytes = [0u8; KEY_SIZE];
    epk_bytes.copy_from_slice(&sealed[..KEY_SIZE]);
    let ephemeral_pk = PublicKey::from(epk_bytes);
    let nonce = &sealed[KEY_SIZE..KEY_SIZE + SEAL_NONCE_SIZE];
    let boxed = &sealed[KEY_SIZE + SEAL_NONCE_SIZE..];

    let salsa_box = SalsaBox::new(&ephemeral_pk, recipient_sk);
    let key_bytes = salsa_box
        .decrypt(crypto_box::Nonce::from_slice(nonce), boxed)
        .map_err(|_| EnvelopeError::Unseal)?;

    if key_bytes.len() != SESSION_KEY_SIZE {
        return Err(EnvelopeError::Malformed("unsealed session key has wrong length".into()));
    }
    let mut arr = [0u8; SESSION_KEY_SIZE];
    arr.copy_from_slice(&key_bytes);
    Ok(SessionKey::from_bytes(arr))
}
