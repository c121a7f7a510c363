pub mod node_ops;
pub mod retry;

pub use retry::{Backoff, RetryPolicy};

use crate::client::{StoreClient, Version};
use crate::errors::Result;
use crate::path::NodePath;
use crate::traversal::Descendants;

/// Node operations bound to one store client
///
/// Holds the client and the retry policy for version-upgrading writes and
/// nothing else: every call is a fresh composition of client primitives.
/// Independent instances may target different stores concurrently.
#[derive(Debug)]
pub struct NodeOps<C> {
    client: C,
    retry: RetryPolicy,
}

impl<C: StoreClient> NodeOps<C> {
    /// Wrap a client with the default (unbounded) retry policy
    pub fn new(client: C) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy used by [`set_with_version_upgrade`](Self::set_with_version_upgrade)
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Policy applied by [`set_with_version_upgrade`](Self::set_with_version_upgrade)
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// See [`node_ops::exists`]
    ///
    /// # Errors
    ///
    /// Transport errors from the client.
    pub fn exists(&self, path: &NodePath) -> Result<bool> {
        node_ops::exists(&self.client, path)
    }

    /// See [`node_ops::get`]
    ///
    /// # Errors
    ///
    /// `NotFound` or transport errors.
    pub fn get(&self, path: &NodePath) -> Result<Vec<u8>> {
        node_ops::get(&self.client, path)
    }

    /// See [`node_ops::children`]
    ///
    /// # Errors
    ///
    /// `NotFound` or transport errors.
    pub fn children(&self, path: &NodePath) -> Result<Vec<String>> {
        node_ops::children(&self.client, path)
    }

    /// See [`node_ops::children_recursive`]
    ///
    /// # Errors
    ///
    /// The first listing failure anywhere in the subtree.
    pub fn children_recursive(&self, path: &NodePath) -> Result<Vec<String>> {
        node_ops::children_recursive(&self.client, path)
    }

    /// Lazy pre-order walk below `path`; see [`Descendants`]
    pub fn descendants(&self, path: &NodePath) -> Descendants<'_, C> {
        Descendants::new(&self.client, path.clone())
    }

    /// See [`node_ops::create`]
    ///
    /// # Errors
    ///
    /// `NoParent`, `AlreadyExists`, or transport errors.
    pub fn create(&self, path: &NodePath, data: &[u8], force: bool) -> Result<NodePath> {
        node_ops::create(&self.client, path, data, force)
    }

    /// See [`node_ops::set`]
    ///
    /// # Errors
    ///
    /// `VersionConflict`, `NotFound`, or transport errors.
    pub fn set(&self, path: &NodePath, data: &[u8], expected: Option<Version>) -> Result<Version> {
        node_ops::set(&self.client, path, data, expected)
    }

    /// See [`node_ops::set_with_version_upgrade`]
    ///
    /// # Errors
    ///
    /// `RetriesExhausted`, `NotFound`, or transport errors.
    pub fn set_with_version_upgrade(&self, path: &NodePath, data: &[u8]) -> Result<Version> {
        node_ops::set_with_version_upgrade(&self.client, path, data, &self.retry)
    }

    /// See [`node_ops::delete`]
    ///
    /// # Errors
    ///
    /// `NotFound`, `NotEmpty`, or transport errors.
    pub fn delete(&self, path: &NodePath) -> Result<()> {
        node_ops::delete(&self.client, path)
    }
}
