//! Store configuration.
//!
//! # Responsibility
//! - Describe where the task database lives and how logging is set up.
//! - Load settings from process environment with stable defaults.
//!
//! # Invariants
//! - Missing settings fall back to defaults; malformed ones are rejected.
//! - `db_path = None` always means an in-memory database.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "TASKSTORE_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "TASKSTORE_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "TASKSTORE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKSTORE_LOG_DIR";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// SQLite takes the busy timeout as a signed 32-bit millisecond count.
pub const MAX_BUSY_TIMEOUT_MS: u64 = i32::MAX as u64;

/// Configuration error for malformed settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Runtime settings for opening the store and its logger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file path. `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    /// How long a writer waits on a locked database file.
    pub busy_timeout_ms: u64,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling logs. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from `TASKSTORE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = read(ENV_BUSY_TIMEOUT_MS) {
            let invalid = |reason: String| ConfigError::InvalidValue {
                key: ENV_BUSY_TIMEOUT_MS,
                value: raw.clone(),
                reason,
            };
            let millis: u64 = raw.parse().map_err(|err| invalid(format!("{err}")))?;
            if millis > MAX_BUSY_TIMEOUT_MS {
                return Err(invalid(format!("must not exceed {MAX_BUSY_TIMEOUT_MS}")));
            }
            config.busy_timeout_ms = millis;
        }

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }

        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Busy timeout handed to SQLite, capped at `MAX_BUSY_TIMEOUT_MS`.
    ///
    /// Deserialized configs skip the env range check, so the cap applies here too.
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms.min(MAX_BUSY_TIMEOUT_MS))
    }
}
