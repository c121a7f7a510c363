//! Error mapping for zkcli-store
//!
//! Backend failures become `NodeError`s at this boundary so the core never
//! sees a backend-specific error type.

use rusqlite::ErrorCode;
use zkcli_core::{NodeError, NodePath};

/// Map a rusqlite error raised while operating on `path`
///
/// A busy or locked database means another process held the write lock
/// past the busy timeout, which is reported as `Timeout`.
pub fn from_rusqlite(path: &NodePath, err: rusqlite::Error) -> NodeError {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
        if matches!(
            failure.code,
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
        ) {
            return NodeError::Timeout {
                path: path.to_string(),
            };
        }
    }
    NodeError::Persistence {
        path: Some(path.to_string()),
        message: err.to_string(),
    }
}

/// Map a rusqlite error raised outside any node (open, schema setup)
pub fn schema_error(err: rusqlite::Error) -> NodeError {
    NodeError::Persistence {
        path: None,
        message: err.to_string(),
    }
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> NodeError {
    NodeError::Persistence {
        path: None,
        message: format!("Migration {} failed: {}", migration_id, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkcli_core::ExErrorKind;

    #[test]
    fn test_busy_maps_to_timeout() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        let mapped = from_rusqlite(&NodePath::parse("/a").unwrap(), err);
        assert_eq!(mapped.kind(), ExErrorKind::Timeout);
    }

    #[test]
    fn test_other_errors_are_persistence_with_path() {
        let mapped = from_rusqlite(
            &NodePath::parse("/a").unwrap(),
            rusqlite::Error::QueryReturnedNoRows,
        );
        assert_eq!(mapped.kind(), ExErrorKind::Persistence);
        assert_eq!(mapped.path(), Some("/a"));
    }

    #[test]
    fn test_migration_error_has_no_path() {
        let err = migration_error("001_nodes", "boom");
        assert_eq!(err.path(), None);
        assert!(err.to_string().contains("001_nodes"));
    }
}
