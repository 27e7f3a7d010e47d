//! Store trait seams.
//!
//! Consumers depend on `Arc<dyn NoteStore>` / `Arc<dyn TrashStore>` — they
//! never see the engine. Every method is keyed by (note id, account id);
//! cross-account access is impossible through this boundary. Atomicity of a
//! single record's insert/update/delete is the implementation's
//! responsibility; callers never retry.

use crate::error::StoreResult;
use chrono::{DateTime, Utc};
use sealnote_types::{AccountId, NoteId, NoteRecord, TrashRecord};

/// Fields of a note record that exist before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub account_id: AccountId,
    pub title: Vec<u8>,
    pub content: Vec<u8>,
    pub private_key_b64: String,
    pub public_key_b64: String,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Replacement ciphertext + key material written by an edit. The whole set
/// changes together because the key pair rotates on every write.
#[derive(Debug, Clone)]
pub struct PayloadUpdate {
    pub title: Vec<u8>,
    pub content: Vec<u8>,
    pub private_key_b64: String,
    pub public_key_b64: String,
}

/// Live note records, scoped per account.
pub trait NoteStore: Send + Sync {
    /// Inserts a new note, assigning its id. Returns the stored record.
    fn insert(&self, new: NewNote) -> StoreResult<NoteRecord>;

    /// Re-inserts a record under its existing id (restore path).
    fn put(&self, record: NoteRecord) -> StoreResult<()>;

    fn get(&self, id: NoteId, account: AccountId) -> StoreResult<Option<NoteRecord>>;

    /// All notes for an account, oldest first.
    fn list(&self, account: AccountId) -> StoreResult<Vec<NoteRecord>>;

    /// Replaces ciphertext and key material. Returns the updated record, or
    /// `None` if the note does not exist for this account.
    fn update_payload(
        &self,
        id: NoteId,
        account: AccountId,
        update: PayloadUpdate,
    ) -> StoreResult<Option<NoteRecord>>;

    /// Removes a note. Returns whether a record was deleted.
    fn delete(&self, id: NoteId, account: AccountId) -> StoreResult<bool>;
}

/// Trashed note records, scoped per account.
pub trait TrashStore: Send + Sync {
    fn insert(&self, record: TrashRecord) -> StoreResult<()>;

    fn get(&self, id: NoteId, account: AccountId) -> StoreResult<Option<TrashRecord>>;

    /// All trashed notes for an account, oldest trash first.
    fn list(&self, account: AccountId) -> StoreResult<Vec<TrashRecord>>;

    /// Permanently removes a trashed note — a single atomic operation, the
    /// point of no return for the expiry sweep.
    fn delete(&self, id: NoteId, account: AccountId) -> StoreResult<bool>;

    /// Distinct accounts that currently have trashed notes. A point-in-time
    /// snapshot for the across-account sweep.
    fn account_ids(&self) -> StoreResult<Vec<AccountId>>;
}
