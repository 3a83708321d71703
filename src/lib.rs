//! PowLedger - A minimal append-only ledger gated by proof-of-work
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Records, the ledger, and chain validation
//! - [`transaction`] - Transfer payloads and their canonical encoding
//!
//! ## Consensus
//! - [`miner`] - Proof-of-work mining
//!
//! ## Cryptography
//! - [`crypto`] - Deterministic record hashing (SHA-256)
//!
//! ## Hosting
//! - [`node`] - Mutex-guarded ledger for concurrent and async callers
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - Shell utilities

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod transaction;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod miner;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Hosting
// ============================================================================
pub mod node;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;

pub use blockchain::{Ledger, Record};
pub use error::{ChainError, Result};
pub use transaction::Transfer;
