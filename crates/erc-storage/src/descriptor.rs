use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use erc_model::{ErcError, Result};

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const MEMORY_URL: &str = "sqlite::memory:";
const SQLITE_SCHEME: &str = "sqlite://";

/// Where a database lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionTarget {
    /// Private in-memory database, one per handle.
    Memory,
    File(PathBuf),
}

/// Parsed connection settings for one storage alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    pub target: ConnectionTarget,
    pub busy_timeout: Duration,
}

impl ConnectionDescriptor {
    pub fn memory() -> Self {
        Self {
            target: ConnectionTarget::Memory,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: ConnectionTarget::File(path.into()),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Parses `sqlite::memory:`, `sqlite://<path>` or a bare file path.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ErcError::invalid_config("database url is empty"));
        }
        if url == MEMORY_URL {
            return Ok(Self::memory());
        }
        if let Some(path) = url.strip_prefix(SQLITE_SCHEME) {
            if path.is_empty() {
                return Err(ErcError::invalid_config(format!(
                    "database url '{url}' has no path"
                )));
            }
            return Ok(Self::file(path));
        }
        if let Some((scheme, _)) = url.split_once("://") {
            return Err(ErcError::invalid_config(format!(
                "unsupported database scheme '{scheme}'"
            )));
        }
        Ok(Self::file(url))
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            ConnectionTarget::Memory => None,
            ConnectionTarget::File(path) => Some(path),
        }
    }

    /// Opens a connection with the configured lock timeout.
    pub fn open(&self) -> Result<Connection> {
        let conn = match &self.target {
            ConnectionTarget::Memory => Connection::open_in_memory(),
            ConnectionTarget::File(path) => Connection::open(path),
        }
        .map_err(|err| ErcError::DatabaseConnection {
            reason: format!("{self}: {err}"),
        })?;
        conn.busy_timeout(self.busy_timeout)
            .map_err(|err| ErcError::DatabaseConnection {
                reason: err.to_string(),
            })?;
        Ok(conn)
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            ConnectionTarget::Memory => f.write_str(MEMORY_URL),
            ConnectionTarget::File(path) => write!(f, "{SQLITE_SCHEME}{}", path.display()),
        }
    }
}
