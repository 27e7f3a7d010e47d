//! Plaintext export of notes to `.txt` files.
//!
//! The file name comes from the decrypted title, stripped to filesystem-safe
//! characters; the file body is the decrypted content. Decryption goes
//! through the guard, so an unreadable note exports as `NotFoundOrInvalid`
//! rather than an error detailing why.

use crate::error::ServiceResult;
use crate::guard::{ConsistencyGuard, Guarded, NoteField};
use sealnote_store::NoteStore;
use sealnote_types::{AccountId, NoteId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A written export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub filename: String,
}

#[derive(Clone)]
pub struct ExportService {
    notes: Arc<dyn NoteStore>,
    guard: ConsistencyGuard,
}

impl ExportService {
    pub fn new(notes: Arc<dyn NoteStore>, guard: ConsistencyGuard) -> Self {
        Self { notes, guard }
    }

    /// Exports one note into `dir`, creating the directory if needed.
    pub fn export_note(
        &self,
        id: NoteId,
        account: AccountId,
        dir: &Path,
    ) -> ServiceResult<Guarded<ExportedFile>> {
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
        let (Guarded::Found(title), Guarded::Found(content)) = (title, content) else {
            return Ok(Guarded::NotFoundOrInvalid);
        };

        std::fs::create_dir_all(dir)?;
        let filename = format!("{}.txt", safe_filename(&title, id));
        let path = dir.join(&filename);
        std::fs::write(&path, content)?;
        debug!("exported note {id} to {}", path.display());

        Ok(Guarded::Found(ExportedFile { path, filename }))
    }

    /// Exports every readable note of an account. Notes that fail the guard
    /// are skipped, not errors.
    pub fn export_all(&self, account: AccountId, dir: &Path) -> ServiceResult<Vec<ExportedFile>> {
        let mut exported = Vec::new();
        for record in self.notes.list(account)? {
            if let Guarded::Found(file) = self.export_note(record.id, account, dir)? {
                exported.push(file);
            }
        }
        Ok(exported)
    }
}

/// Keeps alphanumerics, spaces, dashes, and underscores from a title;
/// falls back to `note_<id>` when nothing survives.
fn safe_filename(title: &str, id: NoteId) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        format!("note_{id}")
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(safe_filename("Groceries: milk/eggs", NoteId(3)), "Groceries milkeggs");
        assert_eq!(safe_filename("////", NoteId(3)), "note_3");
        assert_eq!(safe_filename("  plan B  ", NoteId(9)), "plan B");
    }
}
