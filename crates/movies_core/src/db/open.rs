//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by catalog queries.
//! - Trigger schema migrations before returning a writable connection.
//!
//! # Invariants
//! - Writable connections have `foreign_keys=ON` and migrations fully applied.
//! - Read-only connections never run migrations and have `query_only=ON`.
//! - Every connection has the `fold(text)` SQL function registered.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use crate::search::query::fold_case;
use log::{error, info};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file and applies all pending migrations.
///
/// The file is created when missing.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let mut conn = Connection::open(path)
        .map_err(|err| log_open_failure("file", "db_open_failed", started_at, err.into()))?;
    bootstrap_connection(&mut conn)
        .map_err(|err| log_open_failure("file", "db_bootstrap_failed", started_at, err))?;

    info!(
        "event=db_open module=db status=ok mode=file duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let mut conn = Connection::open_in_memory()
        .map_err(|err| log_open_failure("memory", "db_open_failed", started_at, err.into()))?;
    bootstrap_connection(&mut conn)
        .map_err(|err| log_open_failure("memory", "db_bootstrap_failed", started_at, err))?;

    info!(
        "event=db_open module=db status=ok mode=memory duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

/// Opens an existing database file for reads only.
///
/// Callers must have migrated the file beforehand (see [`open_db`]).
pub fn open_read_only(path: impl AsRef<Path>, busy_timeout: Duration) -> DbResult<Connection> {
    let started_at = Instant::now();
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let conn = Connection::open_with_flags(path, flags)
        .map_err(|err| log_open_failure("read_only", "db_open_failed", started_at, err.into()))?;
    conn.busy_timeout(busy_timeout)
        .and_then(|()| conn.execute_batch("PRAGMA query_only = ON;"))
        .and_then(|()| register_functions(&conn))
        .map_err(|err| {
            log_open_failure("read_only", "db_bootstrap_failed", started_at, err.into())
        })?;

    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    register_functions(conn)?;
    apply_migrations(conn)?;
    Ok(())
}

/// `fold(text)`: Unicode lowercase; NULL stays NULL.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text = ctx.get::<Option<String>>(0)?;
            Ok(text.map(|text| fold_case(&text)))
        },
    )
}

fn log_open_failure(
    mode: &str,
    error_code: &str,
    started_at: Instant,
    err: DbError,
) -> DbError {
    error!(
        "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
        mode,
        started_at.elapsed().as_millis(),
        error_code,
        err
    );
    err
}
