//! Error types for PowLedger
//!
//! A corrupt record is not an error: validation reports it as a boolean (or a
//! [`Violation`](crate::blockchain::Violation) value). The variants below cover
//! the surfaces around the core: caller input, externally mined records,
//! cancelled mining and configuration.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("A ledger must contain at least the genesis record")]
    EmptyLedger,

    #[error("Mining was cancelled before a valid nonce was found")]
    MiningCancelled,

    #[error("Mining did not finish within {0:?}")]
    MiningTimeout(Duration),

    #[error("Mining task failed: {0}")]
    TaskJoin(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<tokio::task::JoinError> for ChainError {
    fn from(err: tokio::task::JoinError) -> Self {
        ChainError::TaskJoin(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
