use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{StoreClient, Version};
use crate::errors::{NodeError, Result};
use crate::path::NodePath;

#[derive(Debug, Clone, Default)]
struct Node {
    data: Vec<u8>,
    version: Version,
}

/// In-memory store client
///
/// A `BTreeMap` keyed by path behind a mutex, so children list in sorted
/// order and one instance can be shared between threads. The root node is
/// implicit: it always exists and cannot be written or deleted. Used by
/// tests and by the `memory` backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: Mutex<BTreeMap<NodePath, Node>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes, not counting the root
    ///
    /// Still counts after a panic poisoned the lock: every mutation is a
    /// single map operation, so the map is never left half-updated.
    pub fn len(&self) -> usize {
        self.nodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when only the root exists
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn nodes(&self) -> Result<MutexGuard<'_, BTreeMap<NodePath, Node>>> {
        self.nodes.lock().map_err(|_| NodeError::Internal {
            message: "memory store lock poisoned".to_string(),
        })
    }

    fn root_is_read_only(path: &NodePath) -> NodeError {
        NodeError::InvalidPath {
            path: path.to_string(),
            reason: "the root node cannot be modified".to_string(),
        }
    }
}

impl StoreClient for MemoryStore {
    fn exists(&self, path: &NodePath) -> Result<bool> {
        Ok(path.is_root() || self.nodes()?.contains_key(path))
    }

    fn read(&self, path: &NodePath) -> Result<(Vec<u8>, Version)> {
        if path.is_root() {
            return Ok((Vec::new(), 0));
        }
        self.nodes()?
            .get(path)
            .map(|node| (node.data.clone(), node.version))
            .ok_or_else(|| NodeError::NotFound {
                path: path.to_string(),
            })
    }

    fn write(&self, path: &NodePath, data: &[u8], expected: Option<Version>) -> Result<Version> {
        if path.is_root() {
            return Err(Self::root_is_read_only(path));
        }
        let mut nodes = self.nodes()?;
        let node = nodes.get_mut(path).ok_or_else(|| NodeError::NotFound {
            path: path.to_string(),
        })?;

        if let Some(expected) = expected {
            if expected != node.version {
                return Err(NodeError::VersionConflict {
                    path: path.to_string(),
                    expected,
                });
            }
        }

        node.data = data.to_vec();
        node.version += 1;
        Ok(node.version)
    }

    fn create_node(&self, path: &NodePath, data: &[u8]) -> Result<NodePath> {
        if path.is_root() {
            return Err(NodeError::AlreadyExists {
                path: path.to_string(),
            });
        }
        let mut nodes = self.nodes()?;
        if nodes.contains_key(path) {
            return Err(NodeError::AlreadyExists {
                path: path.to_string(),
            });
        }
        if let Some(parent) = path.parent() {
            if !parent.is_root() && !nodes.contains_key(&parent) {
                return Err(NodeError::NoParent {
                    path: path.to_string(),
                });
            }
        }

        nodes.insert(
            path.clone(),
            Node {
                data: data.to_vec(),
                version: 0,
            },
        );
        Ok(path.clone())
    }

    fn list_children(&self, path: &NodePath) -> Result<Vec<String>> {
        let nodes = self.nodes()?;
        if !path.is_root() && !nodes.contains_key(path) {
            return Err(NodeError::NotFound {
                path: path.to_string(),
            });
        }

        Ok(nodes
            .keys()
            .filter(|candidate| candidate.parent().as_ref() == Some(path))
            .filter_map(|child| child.name().map(str::to_string))
            .collect())
    }

    fn delete_node(&self, path: &NodePath) -> Result<()> {
        if path.is_root() {
            return Err(Self::root_is_read_only(path));
        }
        let mut nodes = self.nodes()?;
        if !nodes.contains_key(path) {
            return Err(NodeError::NotFound {
                path: path.to_string(),
            });
        }
        if nodes.keys().any(|k| k.parent().as_ref() == Some(path)) {
            return Err(NodeError::NotEmpty {
                path: path.to_string(),
            });
        }

        nodes.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> NodePath {
        NodePath::parse(s).unwrap()
    }

    #[test]
    fn test_new_store_has_only_root() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.exists(&NodePath::root()).unwrap());
        assert!(store.list_children(&NodePath::root()).unwrap().is_empty());
    }

    #[test]
    fn test_create_requires_parent() {
        let store = MemoryStore::new();
        let result = store.create_node(&p("/a/b"), b"x");
        assert!(matches!(result, Err(NodeError::NoParent { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_then_read_starts_at_version_zero() {
        let store = MemoryStore::new();
        store.create_node(&p("/a"), b"hello").unwrap();

        let (data, version) = store.read(&p("/a")).unwrap();
        assert_eq!(data, b"hello");
        assert_eq!(version, 0);
    }

    #[test]
    fn test_write_checks_expected_version() {
        let store = MemoryStore::new();
        store.create_node(&p("/a"), b"v0").unwrap();

        assert_eq!(store.write(&p("/a"), b"v1", Some(0)).unwrap(), 1);
        let stale = store.write(&p("/a"), b"stale", Some(0));
        assert!(matches!(
            stale,
            Err(NodeError::VersionConflict { expected: 0, .. })
        ));
        assert_eq!(store.read(&p("/a")).unwrap(), (b"v1".to_vec(), 1));

        assert_eq!(store.write(&p("/a"), b"any", None).unwrap(), 2);
    }

    #[test]
    fn test_list_children_only_direct() {
        let store = MemoryStore::new();
        store.create_node(&p("/a"), b"").unwrap();
        store.create_node(&p("/a/b"), b"").unwrap();
        store.create_node(&p("/a/b/c"), b"").unwrap();
        store.create_node(&p("/a/d"), b"").unwrap();

        assert_eq!(store.list_children(&p("/a")).unwrap(), vec!["b", "d"]);
        assert_eq!(store.list_children(&NodePath::root()).unwrap(), vec!["a"]);
        assert!(matches!(
            store.list_children(&p("/missing")),
            Err(NodeError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_refuses_non_empty() {
        let store = MemoryStore::new();
        store.create_node(&p("/a"), b"").unwrap();
        store.create_node(&p("/a/b"), b"").unwrap();

        assert!(matches!(
            store.delete_node(&p("/a")),
            Err(NodeError::NotEmpty { .. })
        ));
        store.delete_node(&p("/a/b")).unwrap();
        store.delete_node(&p("/a")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_len_survives_poisoned_lock() {
        let store = std::sync::Arc::new(MemoryStore::new());
        store.create_node(&p("/a"), b"").unwrap();
        store.create_node(&p("/b"), b"").unwrap();

        let held = std::sync::Arc::clone(&store);
        let result = std::thread::spawn(move || {
            let _guard = held.nodes.lock().unwrap();
            panic!("poison the node map");
        })
        .join();
        assert!(result.is_err());
        assert!(store.nodes.is_poisoned());

        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }
}
