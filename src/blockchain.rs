// Thin re-export module: implementation is in `blockchain/core.rs`, which
// splits record/ledger management from chain validation.

pub mod core;
pub use self::core::*;
