//! Store client abstraction
//!
//! [`StoreClient`] is the seam between the node-operations layer and
//! whatever actually holds the nodes: a coordination-service session, a
//! local database, or the in-memory [`MemoryStore`].

pub mod memory;

pub use memory::MemoryStore;

use std::sync::Arc;

use crate::errors::Result;
use crate::path::NodePath;

/// Per-node write counter; starts at 0 when the node is created
pub type Version = i32;

/// Single-node primitives of a hierarchical, versioned store
///
/// Each call is one blocking round-trip. Implementations report failures
/// with the [`NodeError`](crate::errors::NodeError) variants listed per
/// method and must never retry on the caller's behalf.
pub trait StoreClient: Send + Sync {
    /// Whether a node exists at `path`
    ///
    /// # Errors
    ///
    /// `Connectivity`, `Timeout`, or `Persistence` on transport failure.
    fn exists(&self, path: &NodePath) -> Result<bool>;

    /// Data and current version of the node at `path`
    ///
    /// # Errors
    ///
    /// `NotFound` if the node is absent; transport errors otherwise.
    fn read(&self, path: &NodePath) -> Result<(Vec<u8>, Version)>;

    /// Current version of the node at `path`
    ///
    /// Defaults to a full [`read`](StoreClient::read); clients that can fetch
    /// node metadata alone should override it.
    ///
    /// # Errors
    ///
    /// `NotFound` if the node is absent; transport errors otherwise.
    fn version(&self, path: &NodePath) -> Result<Version> {
        self.read(path).map(|(_, version)| version)
    }

    /// Replace the node's data, returning the new version
    ///
    /// `expected = None` writes regardless of the current version.
    ///
    /// # Errors
    ///
    /// `VersionConflict` when `expected` is stale (the node is untouched),
    /// `NotFound` if the node is absent; transport errors otherwise.
    fn write(&self, path: &NodePath, data: &[u8], expected: Option<Version>) -> Result<Version>;

    /// Create a node holding `data`, returning the created path
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if a node is already at `path`, `NoParent` if the
    /// parent is absent; transport errors otherwise.
    fn create_node(&self, path: &NodePath, data: &[u8]) -> Result<NodePath>;

    /// Names of the immediate children of `path`
    ///
    /// # Errors
    ///
    /// `NotFound` if the node is absent; transport errors otherwise.
    fn list_children(&self, path: &NodePath) -> Result<Vec<String>>;

    /// Delete the node at `path`
    ///
    /// # Errors
    ///
    /// `NotFound` if the node is absent, `NotEmpty` if the store refuses to
    /// delete a node with children; transport errors otherwise.
    fn delete_node(&self, path: &NodePath) -> Result<()>;
}

impl<C: StoreClient + ?Sized> StoreClient for Arc<C> {
    fn exists(&self, path: &NodePath) -> Result<bool> {
        (**self).exists(path)
    }

    fn read(&self, path: &NodePath) -> Result<(Vec<u8>, Version)> {
        (**self).read(path)
    }

    fn version(&self, path: &NodePath) -> Result<Version> {
        (**self).version(path)
    }

    fn write(&self, path: &NodePath, data: &[u8], expected: Option<Version>) -> Result<Version> {
        (**self).write(path, data, expected)
    }

    fn create_node(&self, path: &NodePath, data: &[u8]) -> Result<NodePath> {
        (**self).create_node(path, data)
    }

    fn list_children(&self, path: &NodePath) -> Result<Vec<String>> {
        (**self).list_children(path)
    }

    fn delete_node(&self, path: &NodePath) -> Result<()> {
        (**self).delete_node(path)
    }
}

impl<C: StoreClient + ?Sized> StoreClient for Box<C> {
    fn exists(&self, path: &NodePath) -> Result<bool> {
        (**self).exists(path)
    }

    fn read(&self, path: &NodePath) -> Result<(Vec<u8>, Version)> {
        (**self).read(path)
    }

    fn version(&self, path: &NodePath) -> Result<Version> {
        (**self).version(path)
    }

    fn write(&self, path: &NodePath, data: &[u8], expected: Option<Version>) -> Result<Version> {
        (**self).write(path, data, expected)
    }

    fn create_node(&self, path: &NodePath, data: &[u8]) -> Result<NodePath> {
        (**self).create_node(path, data)
    }

    fn list_children(&self, path: &NodePath) -> Result<Vec<String>> {
        (**self).list_children(path)
    }

    fn delete_node(&self, path: &NodePath) -> Result<()> {
        (**self).delete_node(path)
    }
}
