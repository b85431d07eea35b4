//! Configuration loading and representation.

use std::path::PathBuf;

use thiserror::Error;

use stockroom_inventory::report::{DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_RECENT_ENTRIES};

pub const ENV_WORKBOOK: &str = "STOCKROOM_WORKBOOK";
pub const ENV_BACKUP_DIR: &str = "STOCKROOM_BACKUP_DIR";
pub const ENV_LOW_STOCK_THRESHOLD: &str = "STOCKROOM_LOW_STOCK_THRESHOLD";
pub const ENV_RECENT_ENTRIES: &str = "STOCKROOM_RECENT_ENTRIES";

pub const DEFAULT_WORKBOOK: &str = "estoque_deposito.xlsx";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// Where the store keeps its data and how reports are tuned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub workbook_path: PathBuf,
    pub backup_dir: PathBuf,
    pub low_stock_threshold: u32,
    pub recent_entries: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK),
            backup_dir: PathBuf::from("."),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            recent_entries: DEFAULT_RECENT_ENTRIES,
        }
    }
}

impl StoreConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`; unset variables keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_WORKBOOK) {
            config.workbook_path = non_empty_path(ENV_WORKBOOK, path)?;
        }
        if let Some(dir) = lookup(ENV_BACKUP_DIR) {
            config.backup_dir = non_empty_path(ENV_BACKUP_DIR, dir)?;
        }
        if let Some(raw) = lookup(ENV_LOW_STOCK_THRESHOLD) {
            config.low_stock_threshold = parse_number(ENV_LOW_STOCK_THRESHOLD, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RECENT_ENTRIES) {
            config.recent_entries = parse_number(ENV_RECENT_ENTRIES, &raw)?;
        }

        Ok(config)
    }
}

fn non_empty_path(var: &'static str, value: String) -> Result<PathBuf, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(var));
    }
    Ok(PathBuf::from(value.trim()))
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}
