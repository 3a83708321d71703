//! Record hashing for PowLedger
//!
//! The digest of a record is SHA-256 over the concatenation of the previous
//! hash, the canonical payload encoding, the canonical timestamp and the
//! nonce in decimal. The output is always 64 lowercase hex characters.

use crate::transaction::{canonical_payload, Transfer};
use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const HASH_HEX_LEN: usize = 64;

/// Hash arbitrary bytes and render them as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Fixed, locale-independent timestamp form: RFC 3339, nanosecond precision,
/// `Z` suffix.
pub fn canonical_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Compute the hash of a record from its fields.
pub fn calculate_record_hash(
    payload: Option<&Transfer>,
    previous_hash: &str,
    timestamp: &DateTime<Utc>,
    nonce: u64,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(previous_hash.as_bytes());
    hasher.update(canonical_payload(payload).as_bytes());
    hasher.update(canonical_timestamp(timestamp).as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
