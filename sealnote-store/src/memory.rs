//! In-memory stores, used by tests and development setups.

use crate::error::{StoreError, StoreResult};
use crate::traits::{NewNote, NoteStore, PayloadUpdate, TrashStore};
use sealnote_types::{AccountId, NoteId, NoteRecord, TrashRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

/// In-memory note store backed by a `RwLock<HashMap>`.
pub struct MemoryNoteStore {
    records: RwLock<HashMap<(NoteId, AccountId), NoteRecord>>,
    next_id: AtomicI64,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore for MemoryNoteStore {
    fn insert(&self, new: NewNote) -> StoreResult<NoteRecord> {
        let id = NoteId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = NoteRecord {
            id,
            account_id: new.account_id,
            title: new.title,
            content: new.content,
            private_key_b64: new.private_key_b64,
            public_key_b64: new.public_key_b64,
            tags: new.tags,
            created_at: new.created_at,
        };
        self.records
            .write()
            .unwrap()
            .insert((id, new.account_id), record.clone());
        Ok(record)
    }

    fn put(&self, record: NoteRecord) -> StoreResult<()> {
        let key = (record.id, record.account_id);
        let mut records = self.records.write().unwrap();
        if records.contains_key(&key) {
            return Err(StoreError::Duplicate(record.id));
        }
        // Keep the id counter ahead of restored ids
        let floor = record.id.0 + 1;
        self.next_id.fetch_max(floor, Ordering::SeqCst);
        records.insert(key, record);
        Ok(())
    }

    fn get(&self, id: NoteId, account: AccountId) -> StoreResult<Option<NoteRecord>> {
        Ok(self.records.read().unwrap().get(&(id, account)).cloned())
    }

    fn list(&self, account: AccountId) -> StoreResult<Vec<NoteRecord>> {
        let mut notes: Vec<NoteRecord> = self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|n| n.account_id == account)
            .cloned()
            .collect();
        notes.sort_by_key(|n| n.id);
        Ok(notes)
    }

    fn update_payload(
        &self,
        id: NoteId,
        account: AccountId,
        update: PayloadUpdate,
    ) -> StoreResult<Option<NoteRecord>> {
        let mut records = self.records.write().unwrap();
        match records.get_mut(&(id, account)) {
            Some(record) => {
                record.title = update.title;
                record.content = update.content;
                record.private_key_b64 = update.private_key_b64;
                record.public_key_b64 = update.public_key_b64;
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, id: NoteId, account: AccountId) -> StoreResult<bool> {
        Ok(self.records.write().unwrap().remove(&(id, account)).is_some())
    }
}

/// In-memory trash store.
#[derive(Default)]
pub struct MemoryTrashStore {
    records: RwLock<HashMap<(NoteId, AccountId), TrashRecord>>,
}

impl MemoryTrashStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrashStore for MemoryTrashStore {
    fn insert(&self, record: TrashRecord) -> StoreResult<()> {
        let key = (record.id, record.account_id);
        let mut records = self.records.write().unwrap();
        if records.contains_key(&key) {
            return Err(StoreError::Duplicate(record.id));
        }
        records.insert(key, record);
        Ok(())
    }

    fn get(&self, id: NoteId, account: AccountId) -> StoreResult<Option<TrashRecord>> {
        Ok(self.records.read().unwrap().get(&(id, account)).cloned())
    }

    fn list(&self, account: AccountId) -> StoreResult<Vec<TrashRecord>> {
        let mut trashed: Vec<TrashRecord> = self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|t| t.account_id == account)
            .cloned()
            .collect();
        trashed.sort_by_key(|t| (t.trashed_at, t.id));
        Ok(trashed)
    }

    fn delete(&self, id: NoteId, account: AccountId) -> StoreResult<bool> {
        Ok(self.records.write().unwrap().remove(&(id, account)).is_some())
    }

    fn account_ids(&self) -> StoreResult<Vec<AccountId>> {
        let records = self.records.read().unwrap();
        let mut accounts: Vec<AccountId> = records.values().map(|t| t.account_id).collect();
        accounts.sort_by_key(|a| a.0);
        accounts.dedup();
        Ok(accounts)
    }
}
