use crate::blockchain::core::validation::{first_violation, validate_chain, validate_record, Violation};
use crate::crypto::calculate_record_hash;
use crate::error::ChainError;
use crate::miner::{meets_difficulty, mine_record};
use crate::transaction::Transfer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Sentinel hash carried by the genesis record. It is never computed.
pub const GENESIS_HASH: &str = "0";

/// Previous-hash reference of the genesis record.
pub const GENESIS_PREVIOUS_HASH: &str = "";

/// One link in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// `None` only for genesis.
    pub payload: Option<Transfer>,
    pub timestamp: DateTime<Utc>,
    pub previous_hash: String,
    pub nonce: u64,
    pub hash: String,
}

impl Record {
    /// The unmined sentinel record every ledger starts with.
    pub fn genesis() -> Self {
        Record {
            payload: None,
            timestamp: Utc::now(),
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            nonce: 0,
            hash: GENESIS_HASH.to_string(),
        }
    }

    /// An unmined candidate at nonce 0, linked to `previous_hash`.
    pub fn candidate(payload: Transfer, previous_hash: impl Into<String>) -> Self {
        let mut record = Record {
            payload: Some(payload),
            timestamp: Utc::now(),
            previous_hash: previous_hash.into(),
            nonce: 0,
            hash: String::new(),
        };
        record.hash = record.calculate_hash();
        record
    }

    /// Recompute the hash from the record's current fields.
    pub fn calculate_hash(&self) -> String {
        calculate_record_hash(
            self.payload.as_ref(),
            &self.previous_hash,
            &self.timestamp,
            self.nonce,
        )
    }

    pub fn is_genesis(&self) -> bool {
        self.payload.is_none() && self.previous_hash == GENESIS_PREVIOUS_HASH && self.hash == GENESIS_HASH
    }
}

/// An append-only, hash-linked sequence of records.
///
/// The sequence always holds at least the genesis record. Records are only
/// added at the tail and are never mutated once committed.
#[derive(Debug, Clone)]
pub struct Ledger {
    records: Vec<Record>,
    difficulty: u32,
}

impl Ledger {
    /// Create a ledger containing only a fresh genesis record.
    ///
    /// `difficulty` is the number of leading `'0'` hex characters required of
    /// every mined record. A value above 64 can never be met by a SHA-256 hex
    /// digest; callers loading difficulty from user input should reject it.
    pub fn new(difficulty: u32) -> Self {
        info!("Creating ledger with difficulty {}", difficulty);
        Ledger {
            records: vec![Record::genesis()],
            difficulty,
        }
    }

    /// Rebuild a ledger from an existing sequence, e.g. to audit an export.
    ///
    /// The first record must be a genesis record. Everything after it is taken
    /// as-is; use [`Ledger::is_valid`] to check it.
    pub fn from_records(records: Vec<Record>, difficulty: u32) -> Result<Self, ChainError> {
        let Some(first) = records.first() else {
            return Err(ChainError::EmptyLedger);
        };
        if !first.is_genesis() {
            warn!("Rejected record sequence: first record is not genesis");
            return Err(ChainError::InvalidRecord(format!(
                "First record must be genesis (previous hash \"{}\", hash \"{}\", no payload), but got hash {}.",
                GENESIS_PREVIOUS_HASH, GENESIS_HASH, first.hash
            )));
        }
        Ok(Ledger { records, difficulty })
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Read-only view of every record; the position is the record's index.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn genesis(&self) -> &Record {
        &self.records[0]
    }

    /// The most recently committed record. Never fails: genesis is always present.
    pub fn tail(&self) -> &Record {
        &self.records[self.records.len() - 1]
    }

    /// Build the unmined candidate that would follow the current tail.
    pub fn candidate(&self, transfer: Transfer) -> Record {
        Record::candidate(transfer, self.tail().hash.clone())
    }

    /// Link, mine and commit a new record carrying `transfer`.
    ///
    /// Blocks until a nonce satisfying the ledger's difficulty is found.
    ///
    /// The amount must be finite. Every non-finite amount encodes as `null` in
    /// the hash input, so a record holding `inf` and one holding `NaN` hash the
    /// same and swapping one for the other goes undetected. Callers reject
    /// such input with [`Transfer::validate`]; debug builds assert it here.
    pub fn append(&mut self, transfer: Transfer) -> &Record {
        debug_assert!(
            transfer.amount.is_finite(),
            "non-finite amount {} cannot be told apart in the hash",
            transfer.amount
        );
        let candidate = self.candidate(transfer);
        let mined = mine_record(candidate, self.difficulty);
        self.records.push(mined);

        let tail = self.tail();
        info!(
            "Appended record {} (nonce {}, hash {})",
            self.records.len() - 1,
            tail.nonce,
            tail.hash
        );
        tail
    }

    pub fn add_transfer(
        &mut self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
    ) -> &Record {
        self.append(Transfer::new(sender, receiver, amount))
    }

    /// Commit a record that was mined elsewhere.
    ///
    /// The record must link to the current tail, carry an untampered hash and
    /// meet the ledger's difficulty. A rejected record leaves the ledger unchanged.
    pub fn commit(&mut self, record: Record) -> Result<&Record, ChainError> {
        let tail_hash = &self.tail().hash;

        if record.previous_hash != *tail_hash {
            warn!("Rejected record: previous hash does not match tail");
            return Err(ChainError::InvalidRecord(format!(
                "Invalid previous hash. Expected {}, but got {}.",
                tail_hash, record.previous_hash
            )));
        }

        if !validate_record(&record, tail_hash) {
            warn!("Rejected record: stored hash does not match its contents");
            return Err(ChainError::InvalidRecord(format!(
                "Hash mismatch. Stored {}, but computed {}.",
                record.hash,
                record.calculate_hash()
            )));
        }

        if !meets_difficulty(&record.hash, self.difficulty) {
            warn!("Rejected record: hash does not meet difficulty {}", self.difficulty);
            return Err(ChainError::InvalidRecord(format!(
                "Invalid Proof-of-Work: hash {} does not have {} leading zeros.",
                record.hash, self.difficulty
            )));
        }

        self.records.push(record);
        info!("Committed record {}", self.records.len() - 1);
        Ok(self.tail())
    }

    /// Re-derive every hash and link; false on the first corrupt record.
    pub fn is_valid(&self) -> bool {
        validate_chain(self)
    }

    /// The first corrupt record, if any.
    pub fn first_violation(&self) -> Option<Violation> {
        first_violation(&self.records)
    }
}
