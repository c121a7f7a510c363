//! SQLite-backed store client
//!
//! Persists the node tree in one table keyed by path. Every mutating
//! primitive runs in an IMMEDIATE transaction, so check-then-write steps
//! (version comparison, parent check, child check) are atomic even when
//! several CLI processes share the database file.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::debug;
use zkcli_core::{NodeError, NodePath, Result, StoreClient, Version};

use crate::db;
use crate::errors::from_rusqlite;
use crate::migrations::apply_migrations;

/// Store client over a local SQLite database
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and migrate it
    ///
    /// # Errors
    ///
    /// `Persistence` if the file cannot be opened or migrated.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!(db = %path.as_ref().display(), "opening sqlite store");
        Self::from_connection(db::open(path)?)
    }

    /// Fresh in-memory database (for testing)
    ///
    /// # Errors
    ///
    /// `Persistence` if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| NodeError::Internal {
            message: "sqlite connection lock poisoned".to_string(),
        })
    }

    fn with_tx<T>(
        &self,
        path: &NodePath,
        f: impl FnOnce(&Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| from_rusqlite(path, e))?;
        // Dropping an uncommitted transaction rolls it back
        let value = f(&tx)?;
        tx.commit().map_err(|e| from_rusqlite(path, e))?;
        Ok(value)
    }
}

fn node_exists(conn: &Connection, path: &NodePath) -> Result<bool> {
    if path.is_root() {
        return Ok(true);
    }
    conn.query_row(
        "SELECT 1 FROM nodes WHERE path = ?1",
        [path.as_str()],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
    .map_err(|e| from_rusqlite(path, e))
}

fn current_version(conn: &Connection, path: &NodePath) -> Result<Option<Version>> {
    conn.query_row(
        "SELECT version FROM nodes WHERE path = ?1",
        [path.as_str()],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| from_rusqlite(path, e))
}

fn root_is_read_only(path: &NodePath) -> NodeError {
    NodeError::InvalidPath {
        path: path.to_string(),
        reason: "the root node cannot be modified".to_string(),
    }
}

impl StoreClient for SqliteStore {
    fn exists(&self, path: &NodePath) -> Result<bool> {
        node_exists(&*self.conn()?, path)
    }

    fn read(&self, path: &NodePath) -> Result<(Vec<u8>, Version)> {
        if path.is_root() {
            return Ok((Vec::new(), 0));
        }
        self.conn()?
            .query_row(
                "SELECT data, version FROM nodes WHERE path = ?1",
                [path.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| from_rusqlite(path, e))?
            .ok_or_else(|| NodeError::NotFound {
                path: path.to_string(),
            })
    }

    fn version(&self, path: &NodePath) -> Result<Version> {
        if path.is_root() {
            return Ok(0);
        }
        current_version(&*self.conn()?, path)?.ok_or_else(|| NodeError::NotFound {
            path: path.to_string(),
        })
    }

    fn write(&self, path: &NodePath, data: &[u8], expected: Option<Version>) -> Result<Version> {
        if path.is_root() {
            return Err(root_is_read_only(path));
        }
        self.with_tx(path, |tx| {
            let current = current_version(tx, path)?.ok_or_else(|| NodeError::NotFound {
                path: path.to_string(),
            })?;
            if let Some(expected) = expected {
                if expected != current {
                    return Err(NodeError::VersionConflict {
                        path: path.to_string(),
                        expected,
                    });
                }
            }

            let next = current + 1;
            tx.execute(
                "UPDATE nodes SET data = ?1, version = ?2 WHERE path = ?3",
                params![data, next, path.as_str()],
            )
            .map_err(|e| from_rusqlite(path, e))?;
            Ok(next)
        })
    }

    fn create_node(&self, path: &NodePath, data: &[u8]) -> Result<NodePath> {
        let (parent, name) = match (path.parent(), path.name()) {
            (Some(parent), Some(name)) => (parent, name.to_string()),
            _ => {
                return Err(NodeError::AlreadyExists {
                    path: path.to_string(),
                })
            }
        };

        self.with_tx(path, |tx| {
            if node_exists(tx, path)? {
                return Err(NodeError::AlreadyExists {
                    path: path.to_string(),
                });
            }
            if !node_exists(tx, &parent)? {
                return Err(NodeError::NoParent {
                    path: path.to_string(),
                });
            }

            tx.execute(
                "INSERT INTO nodes (path, parent, name, data, version) VALUES (?1, ?2, ?3, ?4, 0)",
                params![path.as_str(), parent.as_str(), name, data],
            )
            .map_err(|e| from_rusqlite(path, e))?;
            Ok(path.clone())
        })
    }

    fn list_children(&self, path: &NodePath) -> Result<Vec<String>> {
        let conn = self.conn()?;
        if !node_exists(&conn, path)? {
            return Err(NodeError::NotFound {
                path: path.to_string(),
            });
        }

        let mut stmt = conn
            .prepare("SELECT name FROM nodes WHERE parent = ?1 ORDER BY name")
            .map_err(|e| from_rusqlite(path, e))?;
        let names = stmt
            .query_map([path.as_str()], |row| row.get(0))
            .map_err(|e| from_rusqlite(path, e))?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(|e| from_rusqlite(path, e))?;
        Ok(names)
    }

    fn delete_node(&self, path: &NodePath) -> Result<()> {
        if path.is_root() {
            return Err(root_is_read_only(path));
        }
        self.with_tx(path, |tx| {
            if !node_exists(tx, path)? {
                return Err(NodeError::NotFound {
                    path: path.to_string(),
                });
            }
            let has_children = tx
                .query_row(
                    "SELECT 1 FROM nodes WHERE parent = ?1 LIMIT 1",
                    [path.as_str()],
                    |_| Ok(()),
                )
                .optional()
                .map_err(|e| from_rusqlite(path, e))?
                .is_some();
            if has_children {
                return Err(NodeError::NotEmpty {
                    path: path.to_string(),
                });
            }

            tx.execute("DELETE FROM nodes WHERE path = ?1", [path.as_str()])
                .map_err(|e| from_rusqlite(path, e))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> NodePath {
        NodePath::parse(s).unwrap()
    }

    #[test]
    fn test_root_exists_and_is_read_only() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.exists(&NodePath::root()).unwrap());
        assert!(store.delete_node(&NodePath::root()).is_err());
        assert!(matches!(
            store.create_node(&NodePath::root(), b""),
            Err(NodeError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn test_version_reads_metadata_only() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_node(&p("/a"), b"x").unwrap();
        store.write(&p("/a"), b"y", None).unwrap();

        assert_eq!(store.version(&p("/a")).unwrap(), 1);
        assert!(matches!(
            store.version(&p("/b")),
            Err(NodeError::NotFound { .. })
        ));
    }

    #[test]
    fn test_exists_tracks_create_and_delete() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(!store.exists(&p("/a")).unwrap());

        store.create_node(&p("/a"), b"").unwrap();
        assert!(store.exists(&p("/a")).unwrap());
        assert_eq!(store.version(&p("/a")).unwrap(), 0);

        store.delete_node(&p("/a")).unwrap();
        assert!(!store.exists(&p("/a")).unwrap());
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_node(&p("/a"), b"x").unwrap();

        assert!(store.write(&p("/a"), b"y", Some(7)).is_err());
        assert_eq!(store.read(&p("/a")).unwrap(), (b"x".to_vec(), 0));
    }
}
