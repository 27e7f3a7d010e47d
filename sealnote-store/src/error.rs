//! Error types for the store layer.

use sealnote_types::NoteId;
use thiserror::Error;

/// All errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("record {0} already exists")]
    Duplicate(NoteId),

    #[error("corrupt stored value: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
