//! TTL boundary and sweep tests for the trash expiry scheduler.

use chrono::{Duration, Utc};
use sealnote_crypto::ServerSecret;
use sealnote_service::{ServiceConfig, TrashExpiryScheduler, TrashSweeper};
use sealnote_store::{MemoryTrashStore, TrashStore};
use sealnote_types::{AccountId, NoteId, TrashRecord};
use std::sync::Arc;

fn trash_record(id: i64, account: AccountId, age: Duration) -> TrashRecord {
    let now = Utc::now();
    TrashRecord {
        id: NoteId(id),
        account_id: account,
        title: vec![1, 2, 3],
        content: vec![4, 5, 6],
        private_key_b64: "cHJpdg==".to_string(),
        public_key_b64: "cHVi".to_string(),
        tags: None,
        created_at: now - age - Duration::days(1),
        trashed_at: now - age,
    }
}

const RETENTION_DAYS: i64 = 30;

fn sweeper(trash: Arc<MemoryTrashStore>) -> TrashSweeper {
    TrashSweeper::new(trash, Duration::days(RETENTION_DAYS))
}

#[test]
fn sweep_one_absent_record_is_false() {
    let trash = Arc::new(MemoryTrashStore::new());
    let sweeper = sweeper(trash);
    assert!(!sweeper.sweep_one(NoteId(1), AccountId::new()).unwrap());
}

#[test]
fn record_one_second_inside_the_window_survives() {
    let trash = Arc::new(MemoryTrashStore::new());
    let account = AccountId::new();
    trash
        .insert(trash_record(1, account, Duration::days(RETENTION_DAYS) - Duration::seconds(1)))
        .unwrap();

    let sweeper = sweeper(trash.clone());
    assert!(!sweeper.sweep_one(NoteId(1), account).unwrap());
    assert!(trash.get(NoteId(1), account).unwrap().is_some());
}

#[test]
fn record_one_second_past_the_window_is_purged() {
    let trash = Arc::new(MemoryTrashStore::new());
    let account = AccountId::new();
    trash
        .insert(trash_record(1, account, Duration::days(RETENTION_DAYS) + Duration::seconds(1)))
        .unwrap();

    let sweeper = sweeper(trash.clone());
    assert!(sweeper.sweep_one(NoteId(1), account).unwrap());
    assert!(trash.get(NoteId(1), account).unwrap().is_none());
}

#[test]
fn exactly_at_the_boundary_is_purged() {
    let trash = Arc::new(MemoryTrashStore::new());
    let account = AccountId::new();
    // Inclusive boundary: age == retention is eligible. The record is
    // stamped slightly past the boundary by the time the sweep runs, so
    // this cannot flake backwards.
    trash
        .insert(trash_record(1, account, Duration::days(RETENTION_DAYS)))
        .unwrap();

    let sweeper = sweeper(trash.clone());
    assert!(sweeper.sweep_one(NoteId(1), account).unwrap());
}

#[test]
fn thirty_day_scenario() {
    let trash = Arc::new(MemoryTrashStore::new());
    let account = AccountId::new();
    let sweeper = sweeper(trash.clone());

    // Trashed "now": at T0+29 days nothing is eligible
    trash
        .insert(trash_record(1, account, Duration::days(29)))
        .unwrap();
    assert_eq!(sweeper.sweep_all(account).unwrap(), 0);
    assert!(trash.get(NoteId(1), account).unwrap().is_some());

    // At T0+30 days and one second the record is gone
    trash.delete(NoteId(1), account).unwrap();
    trash
        .insert(trash_record(1, account, Duration::days(30) + Duration::seconds(1)))
        .unwrap();
    assert_eq!(sweeper.sweep_all(account).unwrap(), 1);
    assert!(trash.get(NoteId(1), account).unwrap().is_none());
}

#[test]
fn sweep_all_only_touches_eligible_records() {
    let trash = Arc::new(MemoryTrashStore::new());
    let account = AccountId::new();
    trash.insert(trash_record(1, account, Duration::days(45))).unwrap();
    trash.insert(trash_record(2, account, Duration::days(10))).unwrap();
    trash.insert(trash_record(3, account, Duration::days(31))).unwrap();

    let sweeper = sweeper(trash.clone());
    assert_eq!(sweeper.sweep_all(account).unwrap(), 2);
    assert!(trash.get(NoteId(2), account).unwrap().is_some());
}

#[test]
fn sweep_accounts_covers_every_account() {
    let trash = Arc::new(MemoryTrashStore::new());
    let account_a = AccountId::new();
    let account_b = AccountId::new();
    trash.insert(trash_record(1, account_a, Duration::days(40))).unwrap();
    trash.insert(trash_record(2, account_b, Duration::days(40))).unwrap();
    trash.insert(trash_record(3, account_b, Duration::days(5))).unwrap();

    let sweeper = sweeper(trash.clone());
    assert_eq!(sweeper.sweep_accounts(), 2);
    assert!(trash.get(NoteId(3), account_b).unwrap().is_some());
}

#[tokio::test]
async fn scheduler_sweeps_on_startup_and_stops_on_shutdown() {
    let trash = Arc::new(MemoryTrashStore::new());
    let account = AccountId::new();
    trash.insert(trash_record(1, account, Duration::days(40))).unwrap();

    let mut config = ServiceConfig::new(ServerSecret::generate());
    // Long interval: only the immediate startup tick fires during the test
    config.sweep_interval = std::time::Duration::from_secs(3600);

    let trash_store: Arc<dyn TrashStore> = trash.clone();
    let scheduler = TrashExpiryScheduler::new(trash_store, &config);
    let (handle, join) = scheduler.start();

    // The first interval tick fires immediately; give the sweep a moment
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(trash.get(NoteId(1), account).unwrap().is_none());

    handle.shutdown().await.unwrap();
    join.await.unwrap();
}

#[tokio::test]
async fn sweep_now_purges_between_ticks() {
    let trash = Arc::new(MemoryTrashStore::new());
    let account = AccountId::new();

    let mut config = ServiceConfig::new(ServerSecret::generate());
    config.sweep_interval = std::time::Duration::from_secs(3600);

    let trash_store: Arc<dyn TrashStore> = trash.clone();
    let scheduler = TrashExpiryScheduler::new(trash_store, &config);
    let (handle, join) = scheduler.start();

    // Inserted after startup, so only an explicit sweep can remove it
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    trash.insert(trash_record(7, account, Duration::days(40))).unwrap();

    handle.sweep_now().await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(trash.get(NoteId(7), account).unwrap().is_none());

    handle.shutdown().await.unwrap();
    join.await.unwrap();
}
