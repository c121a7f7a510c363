//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use zkcli_core::Result;

use crate::errors::schema_error;

/// How long a writer waits for another process's write lock
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite database at the given path
///
/// # Errors
///
/// `Persistence` if the file cannot be opened.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(schema_error)
}

/// Open an in-memory SQLite database (for testing)
///
/// # Errors
///
/// `Persistence` if SQLite cannot allocate the database.
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(schema_error)
}

/// Configure a connection for concurrent CLI invocations
///
/// # Errors
///
/// `Persistence` if a pragma is rejected.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT).map_err(schema_error)?;

    // WAL lets readers proceed while another process writes; in-memory
    // databases answer "memory" and stay as they are
    conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get::<_, String>(0))
        .map_err(schema_error)?;

    Ok(())
}
