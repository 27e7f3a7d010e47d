//! Store behavior tests, run against both the in-memory and SQLite engines.

use chrono::{Duration, Utc};
use sealnote_store::{
    MemoryNoteStore, MemoryTrashStore, NewNote, NoteStore, PayloadUpdate, SqliteStore,
    StoreError, TrashStore,
};
use sealnote_types::{AccountId, NoteId, TrashRecord};

fn new_note(account: AccountId, marker: u8) -> NewNote {
    NewNote {
        account_id: account,
        title: vec![marker; 4],
        content: vec![marker.wrapping_add(1); 8],
        private_key_b64: format!("priv-{marker}"),
        public_key_b64: format!("pub-{marker}"),
        tags: Some("alpha, beta".to_string()),
        created_at: Utc::now(),
    }
}

fn note_store_behaves(store: &dyn NoteStore) {
    let account = AccountId::new();
    let other_account = AccountId::new();

    let first = store.insert(new_note(account, 1)).unwrap();
    let second = store.insert(new_note(account, 2)).unwrap();
    assert_ne!(first.id, second.id);

    // Scoped fetch
    let fetched = store.get(first.id, account).unwrap().unwrap();
    assert_eq!(fetched, first);

    // Cross-account access is absence, not an error
    assert!(store.get(first.id, other_account).unwrap().is_none());
    assert!(store.list(other_account).unwrap().is_empty());

    let listed = store.list(account).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);

    // Payload update replaces ciphertext and both keys together
    let updated = store
        .update_payload(
            first.id,
            account,
            PayloadUpdate {
                title: vec![9; 4],
                content: vec![10; 8],
                private_key_b64: "priv-rotated".to_string(),
                public_key_b64: "pub-rotated".to_string(),
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, vec![9; 4]);
    assert_eq!(updated.private_key_b64, "priv-rotated");
    assert_eq!(updated.created_at.timestamp_millis(), first.created_at.timestamp_millis());

    // Updating a missing record reports None
    assert!(store
        .update_payload(
            NoteId(9999),
            account,
            PayloadUpdate {
                title: vec![],
                content: vec![],
                private_key_b64: String::new(),
                public_key_b64: String::new(),
            },
        )
        .unwrap()
        .is_none());

    assert!(store.delete(first.id, account).unwrap());
    assert!(!store.delete(first.id, account).unwrap());
    assert!(store.get(first.id, account).unwrap().is_none());

    // Restore path: re-insert under the old id
    let mut restored = updated.clone();
    restored.id = first.id;
    store.put(restored.clone()).unwrap();
    assert_eq!(store.get(first.id, account).unwrap().unwrap().id, first.id);

    // Re-inserting the same id is a duplicate
    assert!(matches!(
        store.put(restored),
        Err(StoreError::Duplicate(_))
    ));

    // New inserts never collide with a restored id
    let third = store.insert(new_note(account, 3)).unwrap();
    assert!(third.id > first.id);
}

fn trash_store_behaves(note_store: &dyn NoteStore, trash_store: &dyn TrashStore) {
    let account = AccountId::new();
    let other_account = AccountId::new();

    let note = note_store.insert(new_note(account, 5)).unwrap();
    let trashed_at = Utc::now();
    trash_store
        .insert(TrashRecord::from_note(note.clone(), trashed_at))
        .unwrap();

    let fetched = trash_store.get(note.id, account).unwrap().unwrap();
    assert_eq!(fetched.content, note.content);
    assert_eq!(fetched.trashed_at.timestamp_millis(), trashed_at.timestamp_millis());

    assert!(trash_store.get(note.id, other_account).unwrap().is_none());

    // Double-insert of the same (id, account) is rejected
    assert!(matches!(
        trash_store.insert(TrashRecord::from_note(note.clone(), trashed_at)),
        Err(StoreError::Duplicate(_))
    ));

    // Accounts snapshot contains exactly the accounts with trash
    let accounts = trash_store.account_ids().unwrap();
    assert!(accounts.contains(&account));
    assert!(!accounts.contains(&other_account));

    // Ordered by trash time
    let older = note_store.insert(new_note(account, 6)).unwrap();
    trash_store
        .insert(TrashRecord::from_note(older.clone(), trashed_at - Duration::days(2)))
        .unwrap();
    let listed = trash_store.list(account).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, older.id);

    assert!(trash_store.delete(note.id, account).unwrap());
    assert!(!trash_store.delete(note.id, account).unwrap());
}

#[test]
fn memory_note_store() {
    note_store_behaves(&MemoryNoteStore::new());
}

#[test]
fn memory_trash_store() {
    trash_store_behaves(&MemoryNoteStore::new(), &MemoryTrashStore::new());
}

#[test]
fn sqlite_note_store_in_memory() {
    note_store_behaves(&SqliteStore::open_in_memory().unwrap());
}

#[test]
fn sqlite_trash_store_in_memory() {
    let store = SqliteStore::open_in_memory().unwrap();
    trash_store_behaves(&store, &store);
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let account = AccountId::new();

    let id = {
        let store = SqliteStore::open(&path).unwrap();
        NoteStore::insert(&store, new_note(account, 7)).unwrap().id
    };

    let store = SqliteStore::open(&path).unwrap();
    let note = NoteStore::get(&store, id, account).unwrap().unwrap();
    assert_eq!(note.private_key_b64, "priv-7");
}
