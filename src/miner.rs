//! Proof-of-work mining
//!
//! A record is mined by incrementing its nonce one at a time and rehashing
//! until the hex digest starts with `difficulty` `'0'` characters. The search
//! has no upper bound. [`mine_record_with_cancel`] lets a host abort it from
//! another thread; an aborted candidate is simply dropped.

use crate::blockchain::Record;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, trace};

/// Default number of hash attempts between checks of the cancel flag.
pub const DEFAULT_CHECK_INTERVAL: u64 = 4096;

/// Result of a cancellable mining run.
#[derive(Debug, Clone, PartialEq)]
pub enum MiningOutcome {
    Mined { record: Record, attempts: u64 },
    Cancelled { attempts: u64 },
}

/// True iff `hash` starts with at least `difficulty` `'0'` characters.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let zeros = hash.bytes().take_while(|b| *b == b'0').count();
    zeros >= difficulty as usize
}

/// Mine `candidate` to `difficulty`, blocking until a nonce is found.
///
/// The search starts at the candidate's current nonce. With difficulty 0 the
/// first hash already qualifies and the nonce is left as-is.
pub fn mine_record(mut candidate: Record, difficulty: u32) -> Record {
    let start = Instant::now();
    candidate.hash = candidate.calculate_hash();
    let mut attempts: u64 = 1;

    while !meets_difficulty(&candidate.hash, difficulty) {
        candidate.nonce += 1;
        candidate.hash = candidate.calculate_hash();
        attempts += 1;
    }

    debug!(
        "Mined record at difficulty {} after {} attempts ({:?})",
        difficulty,
        attempts,
        start.elapsed()
    );
    candidate
}

/// Mine `candidate` to `difficulty`, giving up once `cancel` is set.
///
/// The flag is read before the first attempt and then every `check_interval`
/// attempts, so cancellation is observed within that many hashes.
pub fn mine_record_with_cancel(
    mut candidate: Record,
    difficulty: u32,
    cancel: &AtomicBool,
    check_interval: u64,
) -> MiningOutcome {
    let interval = check_interval.max(1);
    let start = Instant::now();
    candidate.hash = candidate.calculate_hash();
    let mut attempts: u64 = 1;

    while !meets_difficulty(&candidate.hash, difficulty) {
        if (attempts - 1) % interval == 0 && cancel.load(Ordering::Relaxed) {
            debug!("Mining cancelled after {} attempts ({:?})", attempts, start.elapsed());
            return MiningOutcome::Cancelled { attempts };
        }
        trace!("nonce {} -> {}", candidate.nonce, candidate.hash);
        candidate.nonce += 1;
        candidate.hash = candidate.calculate_hash();
        attempts += 1;
    }

    debug!(
        "Mined record at difficulty {} after {} attempts ({:?})",
        difficulty,
        attempts,
        start.elapsed()
    );
    MiningOutcome::Mined {
        record: candidate,
        attempts,
    }
}
