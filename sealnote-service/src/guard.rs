//! The consistency guard: match before decrypt.
//!
//! Every read path decrypts through this component. Before any ciphertext is
//! touched, the canonical record is re-fetched and the bytes about to be
//! decrypted — and the private-key reference supplied with them — are
//! compared against what is currently stored. A stale or forged
//! ciphertext/key pair that happens to be cryptographically valid for some
//! other record can otherwise decrypt unrelated content; the guard pins each
//! decrypt to the current, authoritative record state.
//!
//! Absence, mismatch, and decryption failure all collapse to
//! [`Guarded::NotFoundOrInvalid`]: callers cannot distinguish a missing
//! record from a wrong key from tampered ciphertext. The re-fetch-then-
//! compare is best-effort, not transactional — a concurrent edit between the
//! fetch and the decrypt can still race, which is an accepted boundary.

use crate::gateway::EncryptionGateway;
use sealnote_store::{NoteStore, StoreResult, TrashStore};
use sealnote_types::{AccountId, NoteId};
use std::sync::Arc;
use tracing::debug;

/// Outcome of a guarded read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    Found(T),
    NotFoundOrInvalid,
}

impl<T> Guarded<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Guarded::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Guarded::Found(value) => Some(value),
            Guarded::NotFoundOrInvalid => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Guarded<U> {
        match self {
            Guarded::Found(value) => Guarded::Found(f(value)),
            Guarded::NotFoundOrInvalid => Guarded::NotFoundOrInvalid,
        }
    }
}

/// Which ciphertext field of a record a guarded read targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Content,
}

/// The shared guarded-read entry point used by every read path.
#[derive(Clone)]
pub struct ConsistencyGuard {
    notes: Arc<dyn NoteStore>,
    trash: Arc<dyn TrashStore>,
    gateway: EncryptionGateway,
}

impl ConsistencyGuard {
    pub fn new(
        notes: Arc<dyn NoteStore>,
        trash: Arc<dyn TrashStore>,
        gateway: EncryptionGateway,
    ) -> Self {
        Self {
            notes,
            trash,
            gateway,
        }
    }

    /// Guarded decrypt of a live note's field. Storage failures propagate;
    /// everything else is `Found` or `NotFoundOrInvalid`.
    pub fn read_note_field(
        &self,
        id: NoteId,
        account: AccountId,
        field: NoteField,
        ciphertext: &[u8],
        private_key_b64: &str,
    ) -> StoreResult<Guarded<String>> {
        let Some(record) = self.notes.get(id, account)? else {
            return Ok(Guarded::NotFoundOrInvalid);
        };
        let stored = match field {
            NoteField::Title => &record.title,
            NoteField::Content => &record.content,
        };
        Ok(self.decrypt_if_matches(
            id,
            stored,
            &record.private_key_b64,
            ciphertext,
            private_key_b64,
        ))
    }

    /// Guarded decrypt of a trashed note's field.
    pub fn read_trash_field(
        &self,
        id: NoteId,
        account: AccountId,
        field: NoteField,
        ciphertext: &[u8],
        private_key_b64: &str,
    ) -> StoreResult<Guarded<String>> {
        let Some(record) = self.trash.get(id, account)? else {
            return Ok(Guarded::NotFoundOrInvalid);
        };
        let stored = match field {
            NoteField::Title => &record.title,
            NoteField::Content => &record.content,
        };
        Ok(self.decrypt_if_matches(
            id,
            stored,
            &record.private_key_b64,
            ciphertext,
            private_key_b64,
        ))
    }

    fn decrypt_if_matches(
        &self,
        id: NoteId,
        stored_ciphertext: &[u8],
        stored_key_b64: &str,
        ciphertext: &[u8],
        private_key_b64: &str,
    ) -> Guarded<String> {
        if stored_ciphertext != ciphertext || stored_key_b64 != private_key_b64 {
            debug!("guarded read refused for note {id}: ciphertext or key mismatch");
            return Guarded::NotFoundOrInvalid;
        }
        match self.gateway.read_layer(stored_ciphertext, stored_key_b64) {
            Ok(plaintext) => Guarded::Found(plaintext),
            Err(e) => {
                debug!("guarded read failed to decrypt note {id}: {e}");
                Guarded::NotFoundOrInvalid
            }
        }
    }
}
