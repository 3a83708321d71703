//! Shared ledger for concurrent hosts
//!
//! Appending reads the tail hash, mines against it and commits. Those three
//! steps form one critical section: an interleaved append would leave the
//! candidate pointing at a stale tail. [`SharedLedger`] holds a single mutex
//! across the whole sequence, and offers cancellable and time-bounded
//! variants that run the search on Tokio's blocking pool.

use crate::blockchain::{Ledger, Record};
use crate::error::ChainError;
use crate::miner::{mine_record_with_cancel, MiningOutcome, DEFAULT_CHECK_INTERVAL};
use crate::transaction::Transfer;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Sets the cancel flag when dropped unless disarmed first, so an append
/// whose future is abandoned stops its blocking search and frees the lock.
struct CancelOnDrop {
    flag: Arc<AtomicBool>,
    armed: bool,
}

impl CancelOnDrop {
    fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(true, Ordering::Relaxed);
        }
    }
}

#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
    check_interval: u64,
}

impl SharedLedger {
    pub fn new(difficulty: u32) -> Self {
        Self::from_ledger(Ledger::new(difficulty))
    }

    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    /// How many hash attempts pass between checks of a cancel flag.
    pub fn with_check_interval(mut self, check_interval: u64) -> Self {
        self.check_interval = check_interval.max(1);
        self
    }

    /// Blocking append; holds the lock for the whole mining search.
    pub fn append(&self, transfer: Transfer) -> Record {
        self.inner.lock().append(transfer).clone()
    }

    /// Append on the blocking pool, aborting if `cancel` is set.
    ///
    /// On cancellation the candidate is discarded and the ledger is unchanged.
    /// Dropping the returned future before it completes sets `cancel`.
    pub async fn append_async(&self, transfer: Transfer, cancel: Arc<AtomicBool>) -> Result<Record, ChainError> {
        let inner = Arc::clone(&self.inner);
        let check_interval = self.check_interval;
        let guard = CancelOnDrop::new(Arc::clone(&cancel));

        let joined = tokio::task::spawn_blocking(move || {
            let mut ledger = inner.lock();
            let candidate = ledger.candidate(transfer);
            let difficulty = ledger.difficulty();
            let outcome = mine_record_with_cancel(candidate, difficulty, &cancel, check_interval);
            match outcome {
                MiningOutcome::Mined { record, attempts } => {
                    info!("Mined record after {} attempts", attempts);
                    ledger.commit(record).cloned()
                }
                MiningOutcome::Cancelled { attempts } => {
                    warn!("Discarding candidate after {} attempts: cancelled", attempts);
                    Err(ChainError::MiningCancelled)
                }
            }
        })
        .await;
        guard.disarm();
        joined?
    }

    /// Append with a wall-clock bound.
    ///
    /// When `limit` elapses the search is cancelled; this waits for the
    /// blocking task to release the lock before returning `MiningTimeout`.
    /// Dropping the returned future early cancels the search as well.
    pub async fn append_with_timeout(&self, transfer: Transfer, limit: Duration) -> Result<Record, ChainError> {
        let cancel = Arc::new(AtomicBool::new(false));
        let _guard = CancelOnDrop::new(Arc::clone(&cancel));
        let this = self.clone();
        let flag = Arc::clone(&cancel);
        let mut task = tokio::spawn(async move { this.append_async(transfer, flag).await });

        match tokio::time::timeout(limit, &mut task).await {
            Ok(joined) => joined?,
            Err(_) => {
                cancel.store(true, Ordering::Relaxed);
                match task.await? {
                    // The search may finish between the deadline and the flag check.
                    Ok(record) => Ok(record),
                    Err(ChainError::MiningCancelled) => Err(ChainError::MiningTimeout(limit)),
                    Err(e) => Err(e),
                }
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.inner.lock().is_valid()
    }

    pub fn tail(&self) -> Record {
        self.inner.lock().tail().clone()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn difficulty(&self) -> u32 {
        self.inner.lock().difficulty()
    }

    /// Copy of the ledger as it stands now.
    pub fn snapshot(&self) -> Ledger {
        self.inner.lock().clone()
    }
}
