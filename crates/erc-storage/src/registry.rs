//! Process-scoped registry of storage handles.
//!
//! Handles are registered once at start-up and disposed at shutdown.
//! Lookups only take the shared read lock, so concurrent requests never wait
//! on each other; registration and disposal serialize on a separate
//! administrative mutex.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use rusqlite::Connection;
use tracing::{debug, info, warn};

use erc_model::{ErcError, Result};

use crate::descriptor::ConnectionDescriptor;
use crate::gateway::quote_identifier;

/// An open database connection registered under an alias.
#[derive(Debug)]
pub struct StorageHandle {
    alias: String,
    descriptor: ConnectionDescriptor,
    conn: Mutex<Connection>,
}

impl StorageHandle {
    pub fn open(alias: impl Into<String>, descriptor: ConnectionDescriptor) -> Result<Self> {
        let conn = descriptor.open()?;
        Ok(Self {
            alias: alias.into(),
            descriptor,
            conn: Mutex::new(conn),
        })
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// Exclusive access to the connection for one unit of work.
    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ErcError::DatabaseConnection {
            reason: format!("connection for '{}' is poisoned", self.alias),
        })
    }

    /// Number of rows currently stored in `table`.
    pub fn row_count(&self, table: &str) -> Result<usize> {
        let conn = self.connection()?;
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|err| ErcError::DatabaseInsert {
                reason: err.to_string(),
            })?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

/// Alias to handle lookup shared by every request.
#[derive(Debug, Default)]
pub struct StorageRegistry {
    handles: RwLock<BTreeMap<String, Arc<StorageHandle>>>,
    admin: Mutex<()>,
}

impl StorageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens and registers a handle. An alias that is already registered
    /// keeps its existing handle.
    pub fn register(
        &self,
        alias: &str,
        descriptor: ConnectionDescriptor,
    ) -> Result<Arc<StorageHandle>> {
        let _admin = self.admin_guard()?;
        if let Some(existing) = self.lookup(alias)? {
            warn!(alias, "storage alias already registered, keeping existing handle");
            return Ok(existing);
        }
        let handle = Arc::new(StorageHandle::open(alias, descriptor)?);
        self.handles
            .write()
            .map_err(|_| poisoned())?
            .insert(alias.to_string(), Arc::clone(&handle));
        info!(alias, database = %handle.descriptor(), "registered storage handle");
        Ok(handle)
    }

    /// Looks up a registered handle.
    pub fn get_handle(&self, alias: &str) -> Result<Arc<StorageHandle>> {
        self.lookup(alias)?
            .ok_or_else(|| ErcError::DatabaseAliasNotRegistered {
                alias: alias.to_string(),
            })
    }

    /// Removes a handle. The connection closes once the last in-flight user
    /// drops its reference. Returns whether the alias was registered.
    pub fn dispose(&self, alias: &str) -> Result<bool> {
        let _admin = self.admin_guard()?;
        let removed = self.handles.write().map_err(|_| poisoned())?.remove(alias);
        if removed.is_some() {
            debug!(alias, "disposed storage handle");
        }
        Ok(removed.is_some())
    }

    /// Removes every handle.
    pub fn dispose_all(&self) -> Result<usize> {
        let _admin = self.admin_guard()?;
        let mut handles = self.handles.write().map_err(|_| poisoned())?;
        let count = handles.len();
        handles.clear();
        debug!(count, "disposed all storage handles");
        Ok(count)
    }

    /// Registered aliases in sorted order.
    pub fn aliases(&self) -> Result<Vec<String>> {
        Ok(self
            .handles
            .read()
            .map_err(|_| poisoned())?
            .keys()
            .cloned()
            .collect())
    }

    fn lookup(&self, alias: &str) -> Result<Option<Arc<StorageHandle>>> {
        Ok(self
            .handles
            .read()
            .map_err(|_| poisoned())?
            .get(alias)
            .cloned())
    }

    fn admin_guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.admin.lock().map_err(|_| poisoned())
    }
}

fn poisoned() -> ErcError {
    ErcError::DatabaseConnection {
        reason: "storage registry lock is poisoned".to_string(),
    }
}
