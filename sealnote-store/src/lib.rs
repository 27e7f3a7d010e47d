//! Record stores for SealNote.
//!
//! Notes and trash live in separate tables; a logical note id exists in at
//! most one of them per account. The store is the only shared mutable
//! resource in the system — single-record atomicity lives here, and callers
//! never retry a failed storage operation.

mod error;
mod memory;
mod sqlite;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryNoteStore, MemoryTrashStore};
pub use sqlite::SqliteStore;
pub use traits::{NewNote, NoteStore, PayloadUpdate, TrashStore};
