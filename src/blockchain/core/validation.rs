use crate::blockchain::core::chain::{Ledger, Record};
use serde::Serialize;
use tracing::warn;

/// Why a record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    /// The stored hash differs from the hash recomputed over the record's fields.
    HashMismatch { stored: String, computed: String },
    /// The record's previous hash differs from its predecessor's hash.
    BrokenLink { expected: String, found: String },
}

/// The first corrupt record found while scanning a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub index: usize,
    pub kind: ViolationKind,
}

/// True iff the record's hash matches its contents and it links to
/// `expected_previous_hash`. Difficulty is not checked here.
pub fn validate_record(record: &Record, expected_previous_hash: &str) -> bool {
    record.hash == record.calculate_hash() && record.previous_hash == expected_previous_hash
}

/// True iff no record after genesis is corrupt.
pub fn validate_chain(ledger: &Ledger) -> bool {
    first_violation(ledger.records()).is_none()
}

/// Scan adjacent pairs starting at (genesis, first record) and report the first
/// successor whose hash or link does not check out. Genesis itself is never
/// validated.
pub fn first_violation(records: &[Record]) -> Option<Violation> {
    for (i, pair) in records.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        let index = i + 1;

        let computed = current.calculate_hash();
        if current.hash != computed {
            warn!("Record {} is corrupt: hash mismatch", index);
            return Some(Violation {
                index,
                kind: ViolationKind::HashMismatch {
                    stored: current.hash.clone(),
                    computed,
                },
            });
        }

        if current.previous_hash != previous.hash {
            warn!("Record {} is corrupt: broken link to record {}", index, i);
            return Some(Violation {
                index,
                kind: ViolationKind::BrokenLink {
                    expected: previous.hash.clone(),
                    found: current.previous_hash.clone(),
                },
            });
        }
    }
    None
}
