//! zkcli Store - concrete store clients and backend selection
//!
//! Provides:
//! - `SqliteStore`: a node tree persisted in a local SQLite file, with an
//!   embedded migrations framework
//! - `ZkStore` (feature `zookeeper`): a session against a ZooKeeper ensemble
//! - `BackendConfig` and `open_client`, which build a boxed `StoreClient`
//!   from explicit configuration

pub mod backend;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod sqlite;
#[cfg(feature = "zookeeper")]
pub mod zk;

// Re-export key types
pub use backend::{open_client, BackendConfig};
pub use sqlite::SqliteStore;
#[cfg(feature = "zookeeper")]
pub use zk::ZkStore;
