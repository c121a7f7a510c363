//! zkcli Core - node operations over a hierarchical coordination store
//!
//! This crate provides the node-operations layer of zkcli:
//! - Path utilities for validated, slash-delimited node paths
//! - The `StoreClient` trait describing single-node store primitives
//! - An in-memory `MemoryStore` implementation of that trait
//! - Node operations: recursive listing, forced creation, and
//!   version-upgrading writes that retry across version conflicts
//! - Structured error and logging facilities
//!
//! Nothing in this crate prints, formats output, or terminates the process.

pub mod client;
pub mod errors;
pub mod logging_facility;
pub mod ops;
pub mod path;
pub mod traversal;

#[doc(hidden)]
pub use zkcli_core_types as core_types;

// Re-export commonly used types
pub use client::{MemoryStore, StoreClient, Version};
pub use errors::{ExError, ExErrorKind, NodeError, Result};
pub use ops::{NodeOps, RetryPolicy};
pub use path::NodePath;
