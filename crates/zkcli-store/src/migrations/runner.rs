//! Migration runner
//!
//! Applies embedded migrations in order, recording each in `schema_version`

use rusqlite::{Connection, OptionalExtension};
use tracing::info;
use zkcli_core::Result;

use crate::errors::{migration_error, schema_error};
use crate::migrations::embedded::get_migrations;

/// Apply all pending migrations to the database
///
/// # Errors
///
/// `Persistence` if the version table cannot be created or a migration fails;
/// a failed migration is rolled back and later ones are not attempted.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id TEXT PRIMARY KEY NOT NULL,
            applied_seq INTEGER NOT NULL
        )",
        [],
    )
    .map_err(schema_error)?;

    for (seq, migration) in get_migrations().into_iter().enumerate() {
        apply_migration(conn, seq as i64, migration.id, migration.sql)?;
    }

    Ok(())
}

fn apply_migration(conn: &mut Connection, seq: i64, id: &str, sql: &str) -> Result<()> {
    let already: Option<i64> = conn
        .query_row(
            "SELECT applied_seq FROM schema_version WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()
        .map_err(schema_error)?;
    if already.is_some() {
        return Ok(());
    }

    let tx = conn
        .transaction()
        .map_err(|e| migration_error(id, &e.to_string()))?;
    tx.execute_batch(sql)
        .map_err(|e| migration_error(id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (id, applied_seq) VALUES (?1, ?2)",
        rusqlite::params![id, seq],
    )
    .map_err(|e| migration_error(id, &e.to_string()))?;
    tx.commit()
        .map_err(|e| migration_error(id, &e.to_string()))?;

    info!(migration = id, "applied migration");
    Ok(())
}
