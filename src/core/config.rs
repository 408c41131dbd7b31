//! Sink configuration
//!
//! Read once at startup and shared read-only afterwards. Can be built in code
//! or loaded from TOML:
//!
//! ```toml
//! minimum_severity = "Information"
//! file_path = "Logs/logs.txt"
//!
//! [database]
//! path = "Logs/logs.db"
//! busy_timeout_ms = 5000
//! pool_size = 4        # omit for a fresh connection per write
//! ```

use super::error::{Result, SinkError};
use super::severity::Severity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_FILE_PATH: &str = "Logs/logs.txt";
pub const DEFAULT_DATABASE_PATH: &str = "Logs/logs.db";
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinkConfig {
    /// Events below this severity are dropped before rendering
    pub minimum_severity: Severity,
    /// Target of the file destination
    pub file_path: PathBuf,
    pub database: DatabaseConfig,
}

/// Where and how the table destination connects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite database path
    pub path: String,
    /// How long a write waits for a competing writer's lock
    pub busy_timeout_ms: u64,
    /// Pool connections instead of opening one per write
    pub pool_size: Option<u32>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            minimum_severity: Severity::Information,
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATABASE_PATH.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT.as_millis() as u64,
            pool_size: None,
        }
    }
}

impl SinkConfig {
    pub fn new(file_path: impl Into<PathBuf>, database_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            database: DatabaseConfig {
                path: database_path.into(),
                ..DatabaseConfig::default()
            },
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SinkConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            SinkError::io_operation(
                "reading sink configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&source)
    }

    #[must_use]
    pub fn with_minimum_severity(mut self, severity: Severity) -> Self {
        self.minimum_severity = severity;
        self
    }

    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }

    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.database.path = path.into();
        self
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.database.busy_timeout_ms = timeout.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn with_pool_size(mut self, size: u32) -> Self {
        self.database.pool_size = Some(size);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_path.as_os_str().is_empty() {
            return Err(SinkError::config("SinkConfig", "file_path must not be empty"));
        }
        self.database.validate()
    }
}

/// `:memory:` or a `mode=memory` URI
pub(crate) fn is_in_memory_path(path: &str) -> bool {
    path == ":memory:" || path.contains("mode=memory")
}

impl DatabaseConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// In-memory databases are private to one connection
    pub fn is_in_memory(&self) -> bool {
        is_in_memory_path(&self.path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(SinkError::config("DatabaseConfig", "path must not be empty"));
        }
        if self.busy_timeout_ms == 0 {
            return Err(SinkError::config(
                "DatabaseConfig",
                "busy_timeout_ms must be greater than zero",
            ));
        }
        match self.pool_size {
            Some(0) => Err(SinkError::config(
                "DatabaseConfig",
                "pool_size must be at least 1",
            )),
            None if self.is_in_memory() => Err(SinkError::config(
                "DatabaseConfig",
                "an in-memory database requires pool_size = 1",
            )),
            Some(size) if size > 1 && self.is_in_memory() => Err(SinkError::config(
                "DatabaseConfig",
                "an in-memory database requires pool_size = 1",
            )),
            _ => Ok(()),
        }
    }
}
