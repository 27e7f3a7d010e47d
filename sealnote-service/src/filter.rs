//! Tag, title, and creation-date filtering over notes and trash.
//!
//! Tags and dates are stored in plaintext and match without decryption.
//! Title predicates decrypt through the guard, so a record whose title
//! cannot be decrypted never matches a title filter.

use crate::error::ServiceResult;
use crate::guard::{ConsistencyGuard, Guarded, NoteField};
use chrono::NaiveDate;
use sealnote_store::{NoteStore, TrashStore};
use sealnote_types::{AccountId, NoteId};
use std::sync::Arc;

/// Date format accepted from API callers, e.g. `07-08-26`.
pub const FILTER_DATE_FMT: &str = "%d-%m-%y";

/// Filter predicates. Empty filters match everything.
#[derive(Debug, Clone, Default)]
pub struct NotesFilter {
    /// Exact match against the decrypted title.
    pub title: Option<String>,
    /// Membership in the record's tag list (case-insensitive).
    pub tag: Option<String>,
    pub date_eq: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Splits a free-form tag string on commas, semicolons, and whitespace,
/// lowercasing each tag.
pub fn tags_to_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let normalized = raw.replace(';', ",");
    normalized
        .split(',')
        .flat_map(|part| part.split_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Parses a filter date in [`FILTER_DATE_FMT`]. Returns `None` on malformed
/// input — a bad date is a non-matching predicate, not an error.
pub fn parse_filter_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), FILTER_DATE_FMT).ok()
}

#[derive(Clone)]
pub struct FilterService {
    notes: Arc<dyn NoteStore>,
    trash: Arc<dyn TrashStore>,
    guard: ConsistencyGuard,
}

impl FilterService {
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

    /// Ids of the account's live notes matching every predicate.
    pub fn filter_notes(
        &self,
        account: AccountId,
        filter: &NotesFilter,
    ) -> ServiceResult<Vec<NoteId>> {
        let mut matches = Vec::new();
        for record in self.notes.list(account)? {
            if !tag_matches(record.tags.as_deref(), filter) {
                continue;
            }
            if !date_matches(record.created_at.date_naive(), filter) {
                continue;
            }
            if let Some(wanted) = &filter.title {
                let title = self.guard.read_note_field(
                    record.id,
                    account,
                    NoteField::Title,
                    &record.title,
                    &record.private_key_b64,
                )?;
                match title {
                    Guarded::Found(title) if &title == wanted => {}
                    _ => continue,
                }
            }
            matches.push(record.id);
        }
        Ok(matches)
    }

    /// Ids of the account's trashed notes matching every predicate.
    pub fn filter_trash(
        &self,
        account: AccountId,
        filter: &NotesFilter,
    ) -> ServiceResult<Vec<NoteId>> {
        let mut matches = Vec::new();
        for record in self.trash.list(account)? {
            if !tag_matches(record.tags.as_deref(), filter) {
                continue;
            }
            if !date_matches(record.created_at.date_naive(), filter) {
                continue;
            }
            if let Some(wanted) = &filter.title {
                let title = self.guard.read_trash_field(
                    record.id,
                    account,
                    NoteField::Title,
                    &record.title,
                    &record.private_key_b64,
                )?;
                match title {
                    Guarded::Found(title) if &title == wanted => {}
                    _ => continue,
                }
            }
            matches.push(record.id);
        }
        Ok(matches)
    }
}

fn tag_matches(tags: Option<&str>, filter: &NotesFilter) -> bool {
    match &filter.tag {
        None => true,
        Some(tag) => tags_to_list(tags).contains(&tag.to_lowercase()),
    }
}

fn date_matches(created: NaiveDate, filter: &NotesFilter) -> bool {
    if let Some(eq) = filter.date_eq {
        if created != eq {
            return false;
        }
    }
    if let Some(from) = filter.date_from {
        if created < from {
            return false;
        }
    }
    if let Some(to) = filter.date_to {
        if created > to {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_split_on_commas_semicolons_and_whitespace() {
        assert_eq!(
            tags_to_list(Some("Work, ideas; TODO later")),
            vec!["work", "ideas", "todo", "later"]
        );
        assert!(tags_to_list(None).is_empty());
        assert!(tags_to_list(Some("  ,; ")).is_empty());
    }

    #[test]
    fn filter_dates_parse_day_month_year() {
        assert_eq!(
            parse_filter_date("07-08-26"),
            NaiveDate::from_ymd_opt(2026, 8, 7)
        );
        assert_eq!(parse_filter_date("not-a-date"), None);
    }
}
