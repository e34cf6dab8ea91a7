//! Core configuration.
//!
//! # Responsibility
//! - Name the storage slots used by the notes and tasks collections.
//! - Resolve the slot database location and log level from env or file.
//!
//! # Invariants
//! - Slot keys are non-blank and distinct; two collections never share a slot.
//! - Missing config fields fall back to defaults instead of failing.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default slot key for the notes collection.
pub const DEFAULT_NOTES_KEY: &str = "notes-app-notes";
/// Default slot key for the tasks collection.
pub const DEFAULT_TASKS_KEY: &str = "notes-app-todos";
/// Environment variable overriding the slot database path.
pub const DB_PATH_ENV: &str = "NOTEDECK_DB_PATH";
/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "NOTEDECK_LOG_LEVEL";
/// Environment variable naming a JSON config file.
pub const CONFIG_PATH_ENV: &str = "NOTEDECK_CONFIG";
const DEFAULT_DB_FILE_NAME: &str = "notedeck.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    BlankKey(&'static str),
    DuplicateKey(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankKey(which) => write!(f, "storage key `{which}` must not be blank"),
            Self::DuplicateKey(key) => {
                write!(f, "notes and tasks cannot share storage key `{key}`")
            }
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Slot keys for the two domain collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    #[serde(default = "default_notes_key")]
    pub notes: String,
    #[serde(default = "default_tasks_key")]
    pub tasks: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            notes: default_notes_key(),
            tasks: default_tasks_key(),
        }
    }
}

impl StorageKeys {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notes.trim().is_empty() {
            return Err(ConfigError::BlankKey("notes"));
        }
        if self.tasks.trim().is_empty() {
            return Err(ConfigError::BlankKey("tasks"));
        }
        if self.notes == self.tasks {
            return Err(ConfigError::DuplicateKey(self.notes.clone()));
        }
        Ok(())
    }
}

fn default_notes_key() -> String {
    DEFAULT_NOTES_KEY.to_string()
}

fn default_tasks_key() -> String {
    DEFAULT_TASKS_KEY.to_string()
}

fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn default_level() -> String {
    default_log_level().to_string()
}

/// Runtime settings for opening a notedeck workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    #[serde(default)]
    pub keys: StorageKeys,
    #[serde(default = "default_level")]
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            keys: StorageKeys::default(),
            log_level: default_level(),
        }
    }
}

impl CoreConfig {
    /// Builds config from defaults overlaid with `NOTEDECK_*` variables.
    ///
    /// Blank variables are ignored.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Entry-point resolution: the file named by `NOTEDECK_CONFIG` when set,
    /// otherwise defaults; `NOTEDECK_DB_PATH` and `NOTEDECK_LOG_LEVEL` win
    /// over both.
    ///
    /// # Errors
    /// - The named file cannot be read, parsed or holds invalid keys.
    pub fn resolve() -> Result<Self, ConfigError> {
        let file = non_blank_env(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::resolve_from(file.as_deref())
    }

    /// [`Self::resolve`] with an explicit config file instead of `NOTEDECK_CONFIG`.
    pub fn resolve_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match file {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(path) = non_blank_env(DB_PATH_ENV) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank_env(LOG_LEVEL_ENV) {
            self.log_level = level;
        }
        self
    }

    /// Reads a JSON config file; absent fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.keys.validate()?;
        Ok(config)
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
