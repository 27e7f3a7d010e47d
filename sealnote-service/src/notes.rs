//! Live note operations: create, read, list, edit.

use crate::error::ServiceResult;
use crate::gateway::EncryptionGateway;
use crate::guard::{ConsistencyGuard, Guarded, NoteField};
use chrono::{DateTime, Utc};
use sealnote_crypto::NoteKeyPair;
use sealnote_store::{NewNote, NoteStore, PayloadUpdate};
use sealnote_types::{AccountId, NoteId};
use std::sync::Arc;
use tracing::debug;

/// Returned by `create`: the assigned id plus the key pair for the first
/// revision. The private key is escrowed in the record as well, but the
/// caller is the intended holder.
#[derive(Debug, Clone)]
pub struct CreatedNote {
    pub id: NoteId,
    pub private_key_b64: String,
    pub public_key_b64: String,
}

/// Returned by `edit`: the rotated key pair. The previous private key no
/// longer decrypts anything — whoever reads the note next needs these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatedKeys {
    pub private_key_b64: String,
    pub public_key_b64: String,
}

/// A fully decrypted note view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedNote {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One row of a note listing. The title decrypts per record; a record whose
/// title cannot be decrypted still appears, with `NotFoundOrInvalid`.
#[derive(Debug, Clone)]
pub struct NoteListing {
    pub id: NoteId,
    pub title: Guarded<String>,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteStore>,
    guard: ConsistencyGuard,
    gateway: EncryptionGateway,
}

impl NoteService {
    pub fn new(
        notes: Arc<dyn NoteStore>,
        guard: ConsistencyGuard,
        gateway: EncryptionGateway,
    ) -> Self {
        Self {
            notes,
            guard,
            gateway,
        }
    }

    /// Creates a note. Title and content are sealed under one fresh key pair,
    /// then server-encrypted; the stored bytes are never plaintext and never
    /// a bare envelope.
    pub fn create(
        &self,
        account: AccountId,
        title: &str,
        content: &str,
        tags: Option<String>,
    ) -> ServiceResult<CreatedNote> {
        let pair = NoteKeyPair::generate();
        let title_cipher = self.gateway.write_layer_with(title, &pair)?;
        let content_cipher = self.gateway.write_layer_with(content, &pair)?;

        let record = self.notes.insert(NewNote {
            account_id: account,
            title: title_cipher,
            content: content_cipher,
            private_key_b64: pair.secret_b64(),
            public_key_b64: pair.public_b64(),
            tags,
            created_at: Utc::now(),
        })?;
        debug!("created note {} for account {account}", record.id);

        Ok(CreatedNote {
            id: record.id,
            private_key_b64: record.private_key_b64,
            public_key_b64: record.public_key_b64,
        })
    }

    /// Guarded read of a whole note. Both fields must decrypt; otherwise the
    /// outcome is indistinguishable from absence.
    pub fn get(&self, id: NoteId, account: AccountId) -> ServiceResult<Guarded<DecryptedNote>> {
        let Some(record) = self.notes.get(id, account)? else {
            return Ok(Guarded::NotFoundOrInvalid);
        };

        let title = self.guard.read_note_field(
            id,
            account,
            NoteField::Title,
            &record.title,
            &record.private_key_b64,
        )?;
        let content = self.guard.read_note_field(
            id,
            account,
            NoteField::Content,
            &record.content,
            &record.private_key_b64,
        )?;

        Ok(match (title, content) {
            (Guarded::Found(title), Guarded::Found(content)) => Guarded::Found(DecryptedNote {
                id,
                title,
                content,
                tags: record.tags,
                created_at: record.created_at,
            }),
            _ => Guarded::NotFoundOrInvalid,
        })
    }

    /// Lists an account's notes with decrypted titles.
    pub fn list(&self, account: AccountId) -> ServiceResult<Vec<NoteListing>> {
        let records = self.notes.list(account)?;
        let mut listings = Vec::with_capacity(records.len());
        for record in records {
            let title = self.guard.read_note_field(
                record.id,
                account,
                NoteField::Title,
                &record.title,
                &record.private_key_b64,
            )?;
            listings.push(NoteListing {
                id: record.id,
                title,
                tags: record.tags,
                created_at: record.created_at,
            });
        }
        Ok(listings)
    }

    /// Edits a note's title and/or content.
    ///
    /// Every edit rotates the key pair: the untouched field is decrypted and
    /// re-sealed under the new pair alongside the new text, so the single
    /// escrowed private key keeps covering both fields. The previous private
    /// key becomes useless for this note.
    pub fn edit(
        &self,
        id: NoteId,
        account: AccountId,
        new_title: Option<&str>,
        new_content: Option<&str>,
    ) -> ServiceResult<Guarded<RotatedKeys>> {
        let Some(record) = self.notes.get(id, account)? else {
            return Ok(Guarded::NotFoundOrInvalid);
        };

        let title = match new_title {
            Some(text) => text.to_string(),
            None => {
                match self.guard.read_note_field(
                    id,
                    account,
                    NoteField::Title,
                    &record.title,
                    &record.private_key_b64,
                )? {
                    Guarded::Found(text) => text,
                    Guarded::NotFoundOrInvalid => return Ok(Guarded::NotFoundOrInvalid),
                }
            }
        };
        let content = match new_content {
            Some(text) => text.to_string(),
            None => {
                match self.guard.read_note_field(
                    id,
                    account,
                    NoteField::Content,
                    &record.content,
                    &record.private_key_b64,
                )? {
                    Guarded::Found(text) => text,
                    Guarded::NotFoundOrInvalid => return Ok(Guarded::NotFoundOrInvalid),
                }
            }
        };

        let pair = NoteKeyPair::generate();
        let update = PayloadUpdate {
            title: self.gateway.write_layer_with(&title, &pair)?,
            content: self.gateway.write_layer_with(&content, &pair)?,
            private_key_b64: pair.secret_b64(),
            public_key_b64: pair.public_b64(),
        };

        match self.notes.update_payload(id, account, update)? {
            Some(_) => {
                debug!("edited note {id} for account {account}, key pair rotated");
                Ok(Guarded::Found(RotatedKeys {
                    private_key_b64: pair.secret_b64(),
                    public_key_b64: pair.public_b64(),
                }))
            }
            // Deleted between fetch and update — same outcome as absence
            None => Ok(Guarded::NotFoundOrInvalid),
        }
    }
}
