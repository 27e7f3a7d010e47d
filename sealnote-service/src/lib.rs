//! Note operations for SealNote.
//!
//! Ties together the encryption layer and the record stores:
//!
//! - [`EncryptionGateway`] is the only crypto-facing API: hybrid envelope
//!   inside, server cipher outside, key rotation on every write.
//! - [`ConsistencyGuard`] is the single guarded-read entry point every
//!   decrypting path (get, list, search, filter, export, trash views) calls
//!   through.
//! - [`TrashExpiryScheduler`] permanently purges trashed notes older than
//!   the retention window, account by account, on a background loop.
//!
//! There is no ambient global state: [`ServiceConfig`] is built once at
//! startup and handed to the components that need it.

pub mod config;
mod error;
pub mod expiry;
pub mod export;
pub mod filter;
pub mod gateway;
pub mod guard;
pub mod notes;
pub mod search;
pub mod trash;

pub use config::{RunMode, ServiceConfig, SERVER_KEY_ENV};
pub use error::{ConfigurationError, GatewayError, ServiceError, ServiceResult};
pub use expiry::{ExpiryCommand, ExpiryHandle, TrashExpiryScheduler, TrashSweeper};
pub use export::{ExportService, ExportedFile};
pub use filter::{parse_filter_date, tags_to_list, FilterService, NotesFilter};
pub use gateway::{EncryptionGateway, WriteLayer};
pub use guard::{ConsistencyGuard, Guarded, NoteField};
pub use notes::{CreatedNote, DecryptedNote, NoteListing, NoteService, RotatedKeys};
pub use search::SearchService;
pub use trash::{TrashListing, TrashService, TrashedNote};
