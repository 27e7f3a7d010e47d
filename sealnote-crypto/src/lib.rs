//! Encryption layer for SealNote.
//!
//! Provides the two-layer scheme note storage is built on:
//!
//! 1. **Hybrid envelope**: each note payload is encrypted under a one-time
//!    session key (ChaCha20-Poly1305), and the session key is sealed
//!    anonymously to a per-note X25519 public key. A fresh key pair is
//!    generated on every write, so editing a note rotates its keys.
//!
//! 2. **Server layer**: the serialized envelope is encrypted again under a
//!    single process-wide secret before it touches storage. Stored bytes are
//!    never a bare envelope and never plaintext.
//!
//! All operations here are synchronous, CPU-bound, and free of shared mutable
//! state — they can be called concurrently from any number of tasks.

pub mod cipher;
pub mod envelope;
mod error;
pub mod keypair;
pub mod server;

pub use cipher::{SessionKey, NONCE_SIZE, SESSION_KEY_SIZE, TAG_SIZE};
pub use envelope::{open, seal, ENVELOPE_VERSION};
pub use error::{CipherError, EnvelopeError, KeyEncodingError};
pub use keypair::{decode_key_b64, NoteKeyPair, KEY_SIZE};
pub use server::{ServerCipher, ServerSecret, SERVER_KEY_SIZE};
