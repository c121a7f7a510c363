#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use zkcli_core::{MemoryStore, NodeError, NodePath, Result, StoreClient, Version};

/// Parse a path that is known to be valid
pub fn p(s: &str) -> NodePath {
    NodePath::parse(s).unwrap()
}

/// Create a new empty store for testing
pub fn new_store() -> MemoryStore {
    MemoryStore::new()
}

/// Create a store holding `paths`, each with its own path as data
///
/// Paths must be listed parents first.
pub fn store_with(paths: &[&str]) -> MemoryStore {
    let store = MemoryStore::new();
    for path in paths {
        store.create_node(&p(path), path.as_bytes()).unwrap();
    }
    store
}

/// Store client wrapper that injects races and failures
///
/// Wraps a `MemoryStore` and records every primitive call as
/// `"<primitive> <path>"` so tests can assert call order.
#[derive(Default)]
pub struct ScriptedClient {
    pub inner: MemoryStore,
    calls: Mutex<Vec<String>>,
    /// Versioned writes that get overtaken by another writer first
    conflicts_remaining: AtomicU32,
    /// Paths another creator grabs right before our create
    race_creates: Mutex<HashSet<NodePath>>,
    /// Errors returned by `list_children` for specific paths
    list_failures: Mutex<HashMap<NodePath, NodeError>>,
    /// Errors returned by `create_node` for specific paths
    create_failures: Mutex<HashMap<NodePath, NodeError>>,
    /// Error returned by every `write`
    write_failure: Mutex<Option<NodeError>>,
}

impl ScriptedClient {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn overtake_next_writes(&self, count: u32) {
        self.conflicts_remaining.store(count, Ordering::SeqCst);
    }

    pub fn race_create(&self, path: &str) {
        self.race_creates.lock().unwrap().insert(p(path));
    }

    pub fn fail_list(&self, path: &str, err: NodeError) {
        self.list_failures.lock().unwrap().insert(p(path), err);
    }

    pub fn fail_create(&self, path: &str, err: NodeError) {
        self.create_failures.lock().unwrap().insert(p(path), err);
    }

    pub fn fail_writes(&self, err: NodeError) {
        *self.write_failure.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, primitive: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(primitive))
            .count()
    }

    fn record(&self, primitive: &str, path: &NodePath) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", primitive, path));
    }
}

impl StoreClient for ScriptedClient {
    fn exists(&self, path: &NodePath) -> Result<bool> {
        self.record("exists", path);
        self.inner.exists(path)
    }

    fn read(&self, path: &NodePath) -> Result<(Vec<u8>, Version)> {
        self.record("read", path);
        self.inner.read(path)
    }

    fn write(&self, path: &NodePath, data: &[u8], expected: Option<Version>) -> Result<Version> {
        self.record("write", path);
        if let Some(err) = self.write_failure.lock().unwrap().clone() {
            return Err(err);
        }
        if expected.is_some()
            && self
                .conflicts_remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        {
            self.inner.write(path, b"interloper", None)?;
        }
        self.inner.write(path, data, expected)
    }

    fn create_node(&self, path: &NodePath, data: &[u8]) -> Result<NodePath> {
        self.record("create", path);
        if let Some(err) = self.create_failures.lock().unwrap().get(path) {
            return Err(err.clone());
        }
        if self.race_creates.lock().unwrap().remove(path) {
            self.inner.create_node(path, b"other-creator")?;
        }
        self.inner.create_node(path, data)
    }

    fn list_children(&self, path: &NodePath) -> Result<Vec<String>> {
        self.record("list", path);
        if let Some(err) = self.list_failures.lock().unwrap().get(path) {
            return Err(err.clone());
        }
        self.inner.list_children(path)
    }

    fn delete_node(&self, path: &NodePath) -> Result<()> {
        self.record("delete", path);
        self.inner.delete_node(path)
    }
}
