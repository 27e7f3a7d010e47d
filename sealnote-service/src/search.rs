//! Substring search over notes and trash.
//!
//! Tags match without decryption; titles and contents are decrypted through
//! the guard per record. Records that fail to decrypt simply never match —
//! search output does not reveal whether a record was absent or unreadable.

use crate::error::ServiceResult;
use crate::filter::tags_to_list;
use crate::guard::{ConsistencyGuard, Guarded, NoteField};
use sealnote_store::{NoteStore, TrashStore};
use sealnote_types::{AccountId, NoteId};
use std::sync::Arc;

#[derive(Clone)]
pub struct SearchService {
    notes: Arc<dyn NoteStore>,
    trash: Arc<dyn TrashStore>,
    guard: ConsistencyGuard,
}

impl SearchService {
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

    /// Ids of live notes where `query` appears in the tags, the decrypted
    /// title, or the decrypted content (case-insensitive, partial match).
    pub fn search_notes(&self, account: AccountId, query: &str) -> ServiceResult<Vec<NoteId>> {
        let mut matches = Vec::new();
        for record in self.notes.list(account)? {
            if matches_tags(record.tags.as_deref(), query) {
                matches.push(record.id);
                continue;
            }

            let title = self.guard.read_note_field(
                record.id,
                account,
                NoteField::Title,
                &record.title,
                &record.private_key_b64,
            )?;
            if guarded_matches(&title, query) {
                matches.push(record.id);
                continue;
            }

            let content = self.guard.read_note_field(
                record.id,
                account,
                NoteField::Content,
                &record.content,
                &record.private_key_b64,
            )?;
            if guarded_matches(&content, query) {
                matches.push(record.id);
            }
        }
        Ok(matches)
    }

    /// Same matching rules over the account's trash.
    pub fn search_trash(&self, account: AccountId, query: &str) -> ServiceResult<Vec<NoteId>> {
        let mut matches = Vec::new();
        for record in self.trash.list(account)? {
            if matches_tags(record.tags.as_deref(), query) {
                matches.push(record.id);
                continue;
            }

            let title = self.guard.read_trash_field(
                record.id,
                account,
                NoteField::Title,
                &record.title,
                &record.private_key_b64,
            )?;
            if guarded_matches(&title, query) {
                matches.push(record.id);
                continue;
            }

            let content = self.guard.read_trash_field(
                record.id,
                account,
                NoteField::Content,
                &record.content,
                &record.private_key_b64,
            )?;
            if guarded_matches(&content, query) {
                matches.push(record.id);
            }
        }
        Ok(matches)
    }
}

fn matches_text(text: &str, query: &str) -> bool {
    text.to_lowercase().contains(&query.to_lowercase())
}

fn matches_tags(tags: Option<&str>, query: &str) -> bool {
    let query = query.to_lowercase();
    tags_to_list(tags).iter().any(|tag| tag.contains(&query))
}

fn guarded_matches(field: &Guarded<String>, query: &str) -> bool {
    match field {
        Guarded::Found(text) => matches_text(text, query),
        Guarded::NotFoundOrInvalid => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_case_insensitive_and_partial() {
        assert!(matches_text("Grocery List", "grocer"));
        assert!(!matches_text("Grocery List", "meeting"));
    }

    #[test]
    fn tag_matching_is_partial() {
        assert!(matches_tags(Some("work, planning"), "plan"));
        assert!(!matches_tags(None, "plan"));
    }
}
