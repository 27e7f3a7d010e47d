//! Trash operations: soft delete, restore, permanent delete, trash views.

use crate::error::ServiceResult;
use crate::guard::{ConsistencyGuard, Guarded, NoteField};
use chrono::{DateTime, Utc};
use sealnote_store::{NoteStore, TrashStore};
use sealnote_types::{AccountId, NoteId, TrashRecord};
use std::sync::Arc;
use tracing::debug;

/// A fully decrypted trashed-note view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashedNote {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub trashed_at: DateTime<Utc>,
}

/// One row of a trash listing.
#[derive(Debug, Clone)]
pub struct TrashListing {
    pub id: NoteId,
    pub title: Guarded<String>,
    pub tags: Option<String>,
    pub trashed_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TrashService {
    notes: Arc<dyn NoteStore>,
    trash: Arc<dyn TrashStore>,
    guard: ConsistencyGuard,
}

impl TrashService {
    pub fn new(
        notes: Arc<dyn NoteStore>,
        trash: Arc<dyn TrashStore>,
        guard: ConsistencyGuard,
    ) -> Self {
        Self {
            notes,
            trash,
            guard,
        }
    }

    /// Moves a note to the trash. The snapshot carries the ciphertext and
    /// key material unchanged; nothing is re-encrypted. Returns whether a
    /// note was moved.
    pub fn trash_note(&self, id: NoteId, account: AccountId) -> ServiceResult<bool> {
        let Some(note) = self.notes.get(id, account)? else {
            return Ok(false);
        };
        self.trash
            .insert(TrashRecord::from_note(note, Utc::now()))?;
        self.notes.delete(id, account)?;
        debug!("trashed note {id} for account {account}");
        Ok(true)
    }

    /// Restores a trashed note under its original id. Returns whether a
    /// record was restored.
    pub fn restore(&self, id: NoteId, account: AccountId) -> ServiceResult<bool> {
        let Some(record) = self.trash.get(id, account)? else {
            return Ok(false);
        };
        self.notes.put(record.into_note())?;
        self.trash.delete(id, account)?;
        debug!("restored note {id} for account {account}");
        Ok(true)
    }

    /// Permanently deletes a trashed note, bypassing the retention window.
    pub fn delete_permanently(&self, id: NoteId, account: AccountId) -> ServiceResult<bool> {
        let deleted = self.trash.delete(id, account)?;
        if deleted {
            debug!("permanently deleted note {id} for account {account}");
        }
        Ok(deleted)
    }

    /// Guarded read of a trashed note.
    pub fn get(&self, id: NoteId, account: AccountId) -> ServiceResult<Guarded<TrashedNote>> {
        let Some(record) = self.trash.get(id, account)? else {
            return Ok(Guarded::NotFoundOrInvalid);
        };

        let title = self.guard.read_trash_field(
            id,
            account,
            NoteField::Title,
            &record.title,
            &record.private_key_b64,
        )?;
        let content = self.guard.read_trash_field(
            id,
            account,
            NoteField::Content,
            &record.content,
            &record.private_key_b64,
        )?;

        Ok(match (title, content) {
            (Guarded::Found(title), Guarded::Found(content)) => Guarded::Found(TrashedNote {
                id,
                title,
                content,
                tags: record.tags,
                created_at: record.created_at,
                trashed_at: record.trashed_at,
            }),
            _ => Guarded::NotFoundOrInvalid,
        })
    }

    /// Lists an account's trash with decrypted titles, oldest trash first.
    pub fn list(&self, account: AccountId) -> ServiceResult<Vec<TrashListing>> {
        let records = self.trash.list(account)?;
        let mut listings = Vec::with_capacity(records.len());
        for record in records {
            let title = self.guard.read_trash_field(
                record.id,
                account,
                NoteField::Title,
                &record.title,
                &record.private_key_b64,
            )?;
            listings.push(TrashListing {
                id: record.id,
                title,
                tags: record.tags,
                trashed_at: record.trashed_at,
            });
        }
        Ok(listings)
    }
}
