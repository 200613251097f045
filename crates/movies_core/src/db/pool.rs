//! Shared read-only connection pool.
//!
//! # Responsibility
//! - Migrate the database once, then keep a fixed set of read-only
//!   connections open for concurrent queries.
//! - Release every connection at shutdown (`close`) or on drop.
//!
//! # Invariants
//! - Pool size is at least one.
//! - A connection is used by at most one caller at a time.

use super::open::{open_db, open_read_only};
use super::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::{Duration, Instant};

const DEFAULT_POOL_SIZE: usize = 4;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Connection pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of read-only connections kept open.
    pub size: usize,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_POOL_SIZE,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

/// Fixed-size pool of read-only SQLite connections.
///
/// Checkout is round-robin. An idle slot is preferred; when every slot is
/// busy the caller waits on the round-robin slot.
pub struct ConnectionPool {
    path: PathBuf,
    connections: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ConnectionPool {
    /// Migrates the database at `path` and opens `config.size` read-only
    /// connections to it.
    ///
    /// # Errors
    /// - `DbError::InvalidConfig` when `config.size` is zero.
    /// - `DbError::UnsupportedSchemaVersion` when the file is newer than this
    ///   binary.
    /// - `DbError::Sqlite` on any open/bootstrap failure.
    pub fn open(path: impl AsRef<Path>, config: &PoolConfig) -> DbResult<Self> {
        if config.size == 0 {
            return Err(DbError::InvalidConfig(
                "pool size must be at least 1".to_string(),
            ));
        }

        let started_at = Instant::now();
        let path = path.as_ref().to_path_buf();

        // Writable bootstrap connection, dropped once the schema is current.
        drop(open_db(&path)?);

        let connections = (0..config.size)
            .map(|_| open_read_only(&path, config.busy_timeout).map(Mutex::new))
            .collect::<DbResult<Vec<_>>>()?;

        info!(
            "event=db_pool_open module=db status=ok size={} duration_ms={}",
            connections.len(),
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            path,
            connections,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Database file backing this pool.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of pooled connections.
    pub fn size(&self) -> usize {
        self.connections.len()
    }

    /// Runs `f` with exclusive access to one pooled connection.
    pub fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
    {
        let guard = self.checkout();
        f(&*guard)
    }

    /// Closes every connection, logging failures instead of aborting early.
    ///
    /// Returns the first close failure, if any.
    pub fn close(self) -> DbResult<()> {
        let mut first_error = None;
        let size = self.connections.len();

        for slot in self.connections {
            let conn = slot.into_inner().unwrap_or_else(PoisonError::into_inner);
            if let Err((_conn, err)) = conn.close() {
                warn!("event=db_pool_close module=db status=error error={}", err);
                first_error.get_or_insert(DbError::Sqlite(err));
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                info!("event=db_pool_close module=db status=ok size={}", size);
                Ok(())
            }
        }
    }

    fn checkout(&self) -> MutexGuard<'_, Connection> {
        let len = self.connections.len();
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % len;

        for offset in 0..len {
            let slot = &self.connections[(start + offset) % len];
            match slot.try_lock() {
                Ok(guard) => return guard,
                Err(TryLockError::Poisoned(poisoned)) => return poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => {}
            }
        }

        // Poisoned slots stay usable: pooled connections never write.
        self.connections[start]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
