//! ZooKeeper ensemble store client
//!
//! Thin adapter over the `zookeeper` crate: one session per `ZkStore`,
//! persistent nodes with the open ACL, no watches.

use std::time::Duration;

use tracing::debug;
use zookeeper::{Acl, CreateMode, WatchedEvent, Watcher, ZkError, ZooKeeper};
use zkcli_core::{NodeError, NodePath, Result, StoreClient, Version};

struct SessionWatcher;

impl Watcher for SessionWatcher {
    fn handle(&self, event: WatchedEvent) {
        debug!(state = ?event.keeper_state, "zookeeper session event");
    }
}

/// Store client over a ZooKeeper session
pub struct ZkStore {
    zk: ZooKeeper,
}

impl ZkStore {
    /// Connect to the ensemble listed in `servers` (`host[:port]` each)
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty server list; `Connectivity` or `Timeout`
    /// if no session could be established.
    pub fn connect(servers: &[String], session_timeout: Duration) -> Result<Self> {
        if servers.is_empty() {
            return Err(NodeError::InvalidInput {
                reason: "expected at least one server".to_string(),
            });
        }
        let connect_string = servers.join(",");
        debug!(servers = %connect_string, "connecting to zookeeper");
        let zk = ZooKeeper::connect(&connect_string, session_timeout, SessionWatcher)
            .map_err(|e| from_zk(&NodePath::root(), e))?;
        Ok(Self { zk })
    }
}

/// Map a ZooKeeper error raised while operating on `path`
fn from_zk(path: &NodePath, err: ZkError) -> NodeError {
    let path = path.to_string();
    match err {
        ZkError::NoNode => NodeError::NotFound { path },
        ZkError::NodeExists => NodeError::AlreadyExists { path },
        ZkError::NotEmpty => NodeError::NotEmpty { path },
        ZkError::OperationTimeout => NodeError::Timeout { path },
        ZkError::ConnectionLoss | ZkError::SessionExpired => NodeError::Connectivity {
            path,
            message: format!("{:?}", err),
        },
        ZkError::BadArguments => NodeError::InvalidPath {
            path,
            reason: "rejected by server".to_string(),
        },
        other => NodeError::Connectivity {
            path,
            message: format!("{:?}", other),
        },
    }
}

impl StoreClient for ZkStore {
    fn exists(&self, path: &NodePath) -> Result<bool> {
        self.zk
            .exists(path.as_str(), false)
            .map(|stat| stat.is_some())
            .map_err(|e| from_zk(path, e))
    }

    fn read(&self, path: &NodePath) -> Result<(Vec<u8>, Version)> {
        self.zk
            .get_data(path.as_str(), false)
            .map(|(data, stat)| (data, stat.version))
            .map_err(|e| from_zk(path, e))
    }

    fn version(&self, path: &NodePath) -> Result<Version> {
        match self.zk.exists(path.as_str(), false) {
            Ok(Some(stat)) => Ok(stat.version),
            Ok(None) => Err(NodeError::NotFound {
                path: path.to_string(),
            }),
            Err(e) => Err(from_zk(path, e)),
        }
    }

    fn write(&self, path: &NodePath, data: &[u8], expected: Option<Version>) -> Result<Version> {
        match self.zk.set_data(path.as_str(), data.to_vec(), expected) {
            Ok(stat) => Ok(stat.version),
            Err(ZkError::BadVersion) => Err(NodeError::VersionConflict {
                path: path.to_string(),
                expected: expected.unwrap_or(-1),
            }),
            Err(e) => Err(from_zk(path, e)),
        }
    }

    fn create_node(&self, path: &NodePath, data: &[u8]) -> Result<NodePath> {
        match self.zk.create(
            path.as_str(),
            data.to_vec(),
            Acl::open_unsafe().clone(),
            CreateMode::Persistent,
        ) {
            Ok(created) => NodePath::parse(&created),
            // On create, a missing node can only be the parent
            Err(ZkError::NoNode) => Err(NodeError::NoParent {
                path: path.to_string(),
            }),
            Err(e) => Err(from_zk(path, e)),
        }
    }

    fn list_children(&self, path: &NodePath) -> Result<Vec<String>> {
        self.zk
            .get_children(path.as_str(), false)
            .map_err(|e| from_zk(path, e))
    }

    fn delete_node(&self, path: &NodePath) -> Result<()> {
        self.zk
            .delete(path.as_str(), None)
            .map_err(|e| from_zk(path, e))
    }
}

impl Drop for ZkStore {
    fn drop(&mut self) {
        if let Err(e) = self.zk.close() {
            debug!(error = ?e, "closing zookeeper session failed");
        }
    }
}
