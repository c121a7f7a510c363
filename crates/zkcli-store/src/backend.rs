//! Backend selection
//!
//! The store a CLI invocation talks to is always named explicitly: nothing
//! here reads the environment or falls back to a default server address.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;
use zkcli_core::{MemoryStore, Result, StoreClient};

use crate::sqlite::SqliteStore;

/// Default ZooKeeper session timeout
pub const DEFAULT_SESSION_TIMEOUT_MS: u64 = 10_000;

fn default_session_timeout_ms() -> u64 {
    DEFAULT_SESSION_TIMEOUT_MS
}

/// Which store to connect to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Node tree in a local SQLite file
    Sqlite { path: PathBuf },
    /// Process-local tree, discarded on exit
    Memory,
    /// ZooKeeper ensemble; requires the `zookeeper` feature
    Zookeeper {
        servers: Vec<String>,
        #[serde(default = "default_session_timeout_ms")]
        session_timeout_ms: u64,
    },
}

impl BackendConfig {
    /// Ensemble from a comma-separated `host:port` list
    pub fn zookeeper_from_list(servers: &str) -> Self {
        BackendConfig::Zookeeper {
            servers: servers
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            session_timeout_ms: DEFAULT_SESSION_TIMEOUT_MS,
        }
    }

    fn describe(&self) -> String {
        match self {
            BackendConfig::Sqlite { path } => format!("sqlite:{}", path.display()),
            BackendConfig::Memory => "memory".to_string(),
            BackendConfig::Zookeeper { servers, .. } => format!("zookeeper:{}", servers.join(",")),
        }
    }
}

/// Build a store client for `config`
///
/// # Errors
///
/// `Persistence` if a SQLite file cannot be opened; `Connectivity`/`Timeout`
/// if an ensemble cannot be reached; `InvalidInput` for an empty server list
/// or when ZooKeeper support was not compiled in.
pub fn open_client(config: &BackendConfig) -> Result<Box<dyn StoreClient>> {
    info!(backend = %config.describe(), "opening store client");
    match config {
        BackendConfig::Sqlite { path } => Ok(Box::new(SqliteStore::open(path)?)),
        BackendConfig::Memory => Ok(Box::new(MemoryStore::new())),
        BackendConfig::Zookeeper {
            servers,
            session_timeout_ms,
        } => open_zookeeper(servers, *session_timeout_ms),
    }
}

#[cfg(feature = "zookeeper")]
fn open_zookeeper(servers: &[String], session_timeout_ms: u64) -> Result<Box<dyn StoreClient>> {
    let timeout = std::time::Duration::from_millis(session_timeout_ms);
    Ok(Box::new(crate::zk::ZkStore::connect(servers, timeout)?))
}

#[cfg(not(feature = "zookeeper"))]
fn open_zookeeper(servers: &[String], _session_timeout_ms: u64) -> Result<Box<dyn StoreClient>> {
    use zkcli_core::NodeError;

    if servers.is_empty() {
        return Err(NodeError::InvalidInput {
            reason: "expected at least one server".to_string(),
        });
    }
    Err(NodeError::InvalidInput {
        reason: "this build has no ZooKeeper support (enable the `zookeeper` feature)"
            .to_string(),
    })
}
