//! Shared identifiers and record types for SealNote.
//!
//! Identifiers are newtypes so that a note id and an account id can never be
//! swapped at a call site. Records carry ciphertext only — the `title` and
//! `content` fields of a [`NoteRecord`] are always server-cipher output over
//! a serialized envelope, never plaintext.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric note identifier, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(pub i64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque account partition key. Every store call is scoped by one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub uuid::Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored note. Both ciphertext fields decrypt with the same escrowed
/// private key; the key pair is replaced wholesale on every edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: NoteId,
    pub account_id: AccountId,
    /// Server-cipher output over the sealed title envelope.
    pub title: Vec<u8>,
    /// Server-cipher output over the sealed content envelope.
    pub content: Vec<u8>,
    /// Escrowed per-note private key, standard base64.
    pub private_key_b64: String,
    /// Matching public key, standard base64. Kept for audit/display only.
    pub public_key_b64: String,
    /// Free-form comma/semicolon separated tag string, stored in plaintext.
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A trashed note: the [`NoteRecord`] snapshot at the moment of trashing,
/// plus the trash timestamp the expiry scheduler measures against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashRecord {
    pub id: NoteId,
    pub account_id: AccountId,
    pub title: Vec<u8>,
    pub content: Vec<u8>,
    pub private_key_b64: String,
    pub public_key_b64: String,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub trashed_at: DateTime<Utc>,
}

impl TrashRecord {
    /// Snapshots a note into the trash. Ciphertext and key material are
    /// transplanted unchanged — no re-encryption happens on trash or restore.
    pub fn from_note(note: NoteRecord, trashed_at: DateTime<Utc>) -> Self {
        Self {
            id: note.id,
            account_id: note.account_id,
            title: note.title,
            content: note.content,
            private_key_b64: note.private_key_b64,
            public_key_b64: note.public_key_b64,
            tags: note.tags,
            created_at: note.created_at,
            trashed_at,
        }
    }

    /// Converts a trash entry back into a live note (restore path).
    pub fn into_note(self) -> NoteRecord {
        NoteRecord {
            id: self.id,
            account_id: self.account_id,
            title: self.title,
            content: self.content,
            private_key_b64: self.private_key_b64,
            public_key_b64: self.public_key_b64,
            tags: self.tags,
            created_at: self.created_at,
        }
    }
}
