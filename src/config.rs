//! Configuration management for PowLedger
//!
//! Configuration belongs to the shell, not the ledger: the ledger only ever
//! sees a difficulty passed to its constructor.

use crate::crypto::HASH_HEX_LEN;
use crate::error::ChainError;
use crate::miner::DEFAULT_CHECK_INTERVAL;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// File read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "powledger.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub miner: MinerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MinerConfig {
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,
    /// Abandon an append after this many seconds. Unbounded when absent.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
        }
    }
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            check_interval: default_check_interval(),
            timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_difficulty() -> u32 {
    2
}

fn default_check_interval() -> u64 {
    DEFAULT_CHECK_INTERVAL
}

fn default_log_level() -> String {
    "info".to_string()
}

impl MinerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Result<tracing::Level, ChainError> {
        tracing::Level::from_str(&self.level)
            .map_err(|_| ChainError::Config(format!("Unknown log level '{}'", self.level)))
    }
}

impl Config {
    /// Parse a TOML document; missing sections and keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ChainError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChainError> {
        if self.ledger.difficulty as usize > HASH_HEX_LEN {
            return Err(ChainError::Config(format!(
                "ledger.difficulty must be at most {}, got {}",
                HASH_HEX_LEN, self.ledger.difficulty
            )));
        }

        if self.miner.check_interval == 0 {
            return Err(ChainError::Config("miner.check_interval must be greater than 0".to_string()));
        }

        if self.miner.timeout_secs == Some(0) {
            return Err(ChainError::Config("miner.timeout_secs must be greater than 0".to_string()));
        }

        self.logging.level()?;
        Ok(())
    }
}

/// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`].
///
/// An explicit path must exist. The default file is optional and defaults are
/// used when it is absent.
pub fn load_config(path: Option<&Path>) -> Result<Config, ChainError> {
    let config_str = match path {
        Some(path) => fs::read_to_string(path)?,
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).unwrap_or_default(),
    };

    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Config::from_toml_str(&config_str)
}
