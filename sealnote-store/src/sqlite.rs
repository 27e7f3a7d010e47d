//! SQLite-backed stores.
//!
//! Notes and trash share one connection and one database file. Ciphertext
//! lands in BLOB columns, key material in TEXT, timestamps as UTC millis.
//! Schema is created on open.

use crate::error::{StoreError, StoreResult};
use crate::traits::{NewNote, NoteStore, PayloadUpdate, TrashStore};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use sealnote_types::{AccountId, NoteId, NoteRecord, TrashRecord};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// SQLite store implementing both [`NoteStore`] and [`TrashStore`].
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens or creates the store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn initialize_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY,
            account_id TEXT NOT NULL,
            title BLOB NOT NULL,
            content BLOB NOT NULL,
            private_key_b64 TEXT NOT NULL,
            public_key_b64 TEXT NOT NULL,
            tags TEXT,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_notes_account ON notes(account_id);

        CREATE TABLE IF NOT EXISTS trash (
            id INTEGER NOT NULL,
            account_id TEXT NOT NULL,
            title BLOB NOT NULL,
            content BLOB NOT NULL,
            private_key_b64 TEXT NOT NULL,
            public_key_b64 TEXT NOT NULL,
            tags TEXT,
            created_at INTEGER NOT NULL,
            trashed_at INTEGER NOT NULL,
            PRIMARY KEY (id, account_id)
        );
        CREATE INDEX IF NOT EXISTS idx_trash_account ON trash(account_id);
        "#,
    )?;
    Ok(())
}

fn parse_account(raw: &str) -> StoreResult<AccountId> {
    raw.parse::<uuid::Uuid>()
        .map(AccountId)
        .map_err(|e| StoreError::Corrupt(format!("account id {raw:?}: {e}")))
}

fn parse_millis(millis: i64, column: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StoreError::Corrupt(format!("{column} out of range: {millis}")))
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

type NoteRow = (i64, String, Vec<u8>, Vec<u8>, String, String, Option<String>, i64);
type TrashRow = (i64, String, Vec<u8>, Vec<u8>, String, String, Option<String>, i64, i64);

fn note_from_row(row: NoteRow) -> StoreResult<NoteRecord> {
    let (id, account, title, content, private_key_b64, public_key_b64, tags, created) = row;
    Ok(NoteRecord {
        id: NoteId(id),
        account_id: parse_account(&account)?,
        title,
        content,
        private_key_b64,
        public_key_b64,
        tags,
        created_at: parse_millis(created, "created_at")?,
    })
}

fn trash_from_row(row: TrashRow) -> StoreResult<TrashRecord> {
    let (id, account, title, content, private_key_b64, public_key_b64, tags, created, trashed) =
        row;
    Ok(TrashRecord {
        id: NoteId(id),
        account_id: parse_account(&account)?,
        title,
        content,
        private_key_b64,
        public_key_b64,
        tags,
        created_at: parse_millis(created, "created_at")?,
        trashed_at: parse_millis(trashed, "trashed_at")?,
    })
}

impl NoteStore for SqliteStore {
    fn insert(&self, new: NewNote) -> StoreResult<NoteRecord> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO notes (account_id, title, content, private_key_b64, public_key_b64, tags, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                new.account_id.to_string(),
                new.title,
                new.content,
                new.private_key_b64,
                new.public_key_b64,
                new.tags,
                new.created_at.timestamp_millis(),
            ],
        )?;
        let id = NoteId(conn.last_insert_rowid());
        Ok(NoteRecord {
            id,
            account_id: new.account_id,
            title: new.title,
            content: new.content,
            private_key_b64: new.private_key_b64,
            public_key_b64: new.public_key_b64,
            tags: new.tags,
            created_at: new.created_at,
        })
    }

    fn put(&self, record: NoteRecord) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let result = conn.execute(
            "INSERT INTO notes (id, account_id, title, content, private_key_b64, public_key_b64, tags, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                record.id.0,
                record.account_id.to_string(),
                record.title,
                record.content,
                record.private_key_b64,
                record.public_key_b64,
                record.tags,
                record.created_at.timestamp_millis(),
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(StoreError::Duplicate(record.id)),
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, id: NoteId, account: AccountId) -> StoreResult<Option<NoteRecord>> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT id, account_id, title, content, private_key_b64, public_key_b64, tags, created_at
             FROM notes WHERE id = ? AND account_id = ?",
            params![id.0, account.to_string()],
            |row| {
                Ok((
                    row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?,
                    row.get(4)?, row.get(5)?, row.get(6)?, row.get(7)?,
                ))
            },
        );
        match result {
            Ok(row) => Ok(Some(note_from_row(row)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, account: AccountId) -> StoreResult<Vec<NoteRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, account_id, title, content, private_key_b64, public_key_b64, tags, created_at
             FROM notes WHERE account_id = ? ORDER BY id ASC",
        )?;
        let rows: Vec<NoteRow> = stmt
            .query_map(params![account.to_string()], |row| {
                Ok((
                    row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?,
                    row.get(4)?, row.get(5)?, row.get(6)?, row.get(7)?,
                ))
            })?
            .collect::<Result<_, _>>()?;

        rows.into_iter().map(note_from_row).collect()
    }

    fn update_payload(
        &self,
        id: NoteId,
        account: AccountId,
        update: PayloadUpdate,
    ) -> StoreResult<Option<NoteRecord>> {
        let affected = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE notes SET title = ?, content = ?, private_key_b64 = ?, public_key_b64 = ?
                 WHERE id = ? AND account_id = ?",
                params![
                    update.title,
                    update.content,
                    update.private_key_b64,
                    update.public_key_b64,
                    id.0,
                    account.to_string(),
                ],
            )?
        };
        if affected == 0 {
            return Ok(None);
        }
        NoteStore::get(self, id, account)
    }

    fn delete(&self, id: NoteId, account: AccountId) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "DELETE FROM notes WHERE id = ? AND account_id = ?",
            params![id.0, account.to_string()],
        )?;
        Ok(affected > 0)
    }
}

impl TrashStore for SqliteStore {
    fn insert(&self, record: TrashRecord) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let result = conn.execute(
            "INSERT INTO trash (id, account_id, title, content, private_key_b64, public_key_b64, tags, created_at, trashed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                record.id.0,
                record.account_id.to_string(),
                record.title,
                record.content,
                record.private_key_b64,
                record.public_key_b64,
                record.tags,
                record.created_at.timestamp_millis(),
                record.trashed_at.timestamp_millis(),
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(StoreError::Duplicate(record.id)),
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, id: NoteId, account: AccountId) -> StoreResult<Option<TrashRecord>> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT id, account_id, title, content, private_key_b64, public_key_b64, tags, created_at, trashed_at
             FROM trash WHERE id = ? AND account_id = ?",
            params![id.0, account.to_string()],
            |row| {
                Ok((
                    row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?,
                    row.get(5)?, row.get(6)?, row.get(7)?, row.get(8)?,
                ))
            },
        );
        match result {
            Ok(row) => Ok(Some(trash_from_row(row)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, account: AccountId) -> StoreResult<Vec<TrashRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, account_id, title, content, private_key_b64, public_key_b64, tags, created_at, trashed_at
             FROM trash WHERE account_id = ? ORDER BY trashed_at ASC, id ASC",
        )?;
        let rows: Vec<TrashRow> = stmt
            .query_map(params![account.to_string()], |row| {
                Ok((
                    row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?,
                    row.get(5)?, row.get(6)?, row.get(7)?, row.get(8)?,
                ))
            })?
            .collect::<Result<_, _>>()?;

        rows.into_iter().map(trash_from_row).collect()
    }

    fn delete(&self, id: NoteId, account: AccountId) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "DELETE FROM trash WHERE id = ? AND account_id = ?",
            params![id.0, account.to_string()],
        )?;
        Ok(affected > 0)
    }

    fn account_ids(&self) -> StoreResult<Vec<AccountId>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT DISTINCT account_id FROM trash ORDER BY account_id")?;
        let raw: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        raw.iter().map(|s| parse_account(s)).collect()
    }
}
