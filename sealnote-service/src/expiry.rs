//! Trash expiry scheduler.
//!
//! A long-lived loop that periodically sweeps every account's trash and
//! permanently deletes records older than the retention window. One sweep
//! runs at a time; the loop sleeps between sweeps and stops cleanly on
//! shutdown. Deleting a record is a single atomic store operation, so a
//! cancelled sweep never leaves a half-deleted record.

use crate::config::ServiceConfig;
use chrono::{DateTime, Duration, Utc};
use sealnote_store::{StoreResult, TrashStore};
use sealnote_types::{AccountId, NoteId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Commands accepted by the scheduler loop.
#[derive(Debug)]
pub enum ExpiryCommand {
    /// Run a sweep immediately instead of waiting for the next tick.
    SweepNow,
    /// Stop the loop. The in-flight sweep, if any, finishes first.
    Shutdown,
}

/// Handle to a running scheduler.
#[derive(Clone)]
pub struct ExpiryHandle {
    command_tx: mpsc::Sender<ExpiryCommand>,
}

impl ExpiryHandle {
    pub async fn sweep_now(&self) -> Result<(), mpsc::error::SendError<ExpiryCommand>> {
        self.command_tx.send(ExpiryCommand::SweepNow).await
    }

    pub async fn shutdown(&self) -> Result<(), mpsc::error::SendError<ExpiryCommand>> {
        self.command_tx.send(ExpiryCommand::Shutdown).await
    }
}

/// The eligibility test and purge operations, separated from the loop so
/// they can run on a blocking thread and be driven directly by tests.
#[derive(Clone)]
pub struct TrashSweeper {
    trash: Arc<dyn TrashStore>,
    retention: Duration,
}

impl TrashSweeper {
    pub fn new(trash: Arc<dyn TrashStore>, retention: Duration) -> Self {
        Self { trash, retention }
    }

    /// Whether a record trashed at `trashed_at` is eligible at `now`.
    /// The boundary is inclusive: age == retention purges.
    fn eligible(&self, trashed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(trashed_at) >= self.retention
    }

    /// Sweeps a single record. Absent records and records still inside the
    /// retention window return `false` — neither is an error.
    pub fn sweep_one(&self, id: NoteId, account: AccountId) -> StoreResult<bool> {
        let Some(record) = self.trash.get(id, account)? else {
            return Ok(false);
        };
        if !self.eligible(record.trashed_at, Utc::now()) {
            return Ok(false);
        }
        self.trash.delete(id, account)
    }

    /// Sweeps everything an account had trashed at the moment this call
    /// started. The snapshot is taken once — records trashed while the
    /// sweep runs are not considered until the next sweep.
    pub fn sweep_all(&self, account: AccountId) -> StoreResult<usize> {
        let snapshot = self.trash.list(account)?;
        let now = Utc::now();
        let mut deleted = 0;
        for record in snapshot {
            if self.eligible(record.trashed_at, now) && self.trash.delete(record.id, account)? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Sweeps every account that currently has trash. A failing account is
    /// logged and skipped — it never aborts the others.
    pub fn sweep_accounts(&self) -> usize {
        let accounts = match self.trash.account_ids() {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!("[EXPIRY] failed to enumerate accounts: {e}");
                return 0;
            }
        };

        let mut total = 0;
        for account in accounts {
            match self.sweep_all(account) {
                Ok(count) => total += count,
                Err(e) => warn!("[EXPIRY] sweep failed for account {account}: {e}"),
            }
        }
        total
    }
}

/// The scheduler loop around a [`TrashSweeper`].
pub struct TrashExpiryScheduler {
    sweeper: TrashSweeper,
    interval: std::time::Duration,
}

impl TrashExpiryScheduler {
    pub fn new(trash: Arc<dyn TrashStore>, config: &ServiceConfig) -> Self {
        Self {
            sweeper: TrashSweeper::new(trash, config.trash_retention),
            interval: config.sweep_interval,
        }
    }

    pub fn sweeper(&self) -> &TrashSweeper {
        &self.sweeper
    }

    /// Spawns the loop, returning a command handle and the join handle.
    pub fn start(self) -> (ExpiryHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(8);
        let join = tokio::spawn(self.run(command_rx));
        (ExpiryHandle { command_tx }, join)
    }

    /// The scheduler event loop. The first interval tick fires immediately,
    /// so a fresh process sweeps once on startup.
    pub async fn run(self, mut command_rx: mpsc::Receiver<ExpiryCommand>) {
        let mut sweep_interval = tokio::time::interval(self.interval);
        info!(
            "[EXPIRY] scheduler started (retention {} days, interval {:?})",
            self.sweeper.retention.num_days(),
            self.interval
        );

        loop {
            tokio::select! {
                Some(cmd) = command_rx.recv() => match cmd {
                    ExpiryCommand::Shutdown => {
                        info!("[EXPIRY] scheduler shutting down");
                        break;
                    }
                    ExpiryCommand::SweepNow => self.sweep().await,
                },
                _ = sweep_interval.tick() => self.sweep().await,
            }
        }
    }

    async fn sweep(&self) {
        let sweeper = self.sweeper.clone();
        match tokio::task::spawn_blocking(move || sweeper.sweep_accounts()).await {
            Ok(count) => {
                if count > 0 {
                    info!("[EXPIRY] sweep permanently removed {count} expired notes");
                }
            }
            Err(e) => warn!("[EXPIRY] sweep task panicked: {e}"),
        }
    }
}
