//! Runtime configuration from environment variables.
//!
//! | Variable             | Default                        |
//! |----------------------|--------------------------------|
//! | `APPROVAL_DB_PATH`   | `./data/approval_workflow.db`  |
//! | `APPROVAL_LOG_LEVEL` | `default_log_level()`          |
//! | `APPROVAL_LOG_DIR`   | unset (file logging disabled)  |

use crate::logging::{default_log_level, normalize_level, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "APPROVAL_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "APPROVAL_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "APPROVAL_LOG_DIR";
pub const DEFAULT_DB_PATH: &str = "./data/approval_workflow.db";

#[derive(Debug)]
pub enum ConfigError {
    EmptyDbPath,
    InvalidLogLevel(LoggingError),
    CreateDbDir {
        dir: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "{DB_PATH_ENV} cannot be empty"),
            Self::InvalidLogLevel(err) => write!(f, "{LOG_LEVEL_ENV}: {err}"),
            Self::CreateDbDir { dir, source } => write!(
                f,
                "failed to create database directory `{}`: {source}",
                dir.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(err) => Some(err),
            Self::CreateDbDir { source, .. } => Some(source),
            Self::EmptyDbPath => None,
        }
    }
}

/// Store and logging settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Absolute directory for rolling log files. `None` disables file logs.
    pub log_dir: Option<String>,
}

impl StoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path = match lookup(DB_PATH_ENV) {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::EmptyDbPath),
            Some(value) => PathBuf::from(value.trim()),
            None => PathBuf::from(DEFAULT_DB_PATH),
        };

        let log_level = match lookup(LOG_LEVEL_ENV) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = lookup(LOG_DIR_ENV).filter(|value| !value.trim().is_empty());

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }

    /// Creates the directory that will hold the database file.
    pub fn ensure_db_parent_dir(&self) -> Result<(), ConfigError> {
        match self.db_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDbDir {
                    dir: dir.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }
}
