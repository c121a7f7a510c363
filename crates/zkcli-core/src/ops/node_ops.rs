//! Node operations
//!
//! Every public operation here is one logged unit of work over a
//! [`StoreClient`]:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure, then the error is returned unchanged
//!
//! Only [`create`] with `force` and [`set_with_version_upgrade`] compose more
//! than one store call; the rest are single round-trips.

use std::time::Instant;

use tracing::debug;
use zkcli_core_types::schema::EVENT_RETRY;

use super::retry::RetryPolicy;
use crate::client::{StoreClient, Version};
use crate::errors::{NodeError, Result};
use crate::path::NodePath;
use crate::traversal;
use crate::{log_op_end, log_op_error, log_op_start};

/// Sizes reported on an operation's end event
#[derive(Debug, Default, Clone, Copy)]
struct Measure {
    child_count: Option<u64>,
    data_len: Option<u64>,
}

fn instrument<T>(op: &'static str, path: &NodePath, f: impl FnOnce() -> Result<T>) -> Result<T> {
    instrument_measured(op, path, f, |_| Measure::default())
}

fn instrument_measured<T>(
    op: &'static str,
    path: &NodePath,
    f: impl FnOnce() -> Result<T>,
    measure: impl FnOnce(&T) -> Measure,
) -> Result<T> {
    log_op_start!(op, path = %path);
    let start = Instant::now();

    let result = f().map_err(|e| {
        log_op_error!(op, &e, duration_ms = start.elapsed().as_millis() as u64);
        e
    })?;

    let sizes = measure(&result);
    log_op_end!(
        op,
        duration_ms = start.elapsed().as_millis() as u64,
        path = %path,
        child_count = sizes.child_count,
        data_len = sizes.data_len
    );
    Ok(result)
}

fn child_count(names: &[String]) -> Measure {
    Measure {
        child_count: Some(names.len() as u64),
        ..Measure::default()
    }
}

fn data_len(len: usize) -> Measure {
    Measure {
        data_len: Some(len as u64),
        ..Measure::default()
    }
}

/// Whether a node exists at `path`
///
/// # Errors
///
/// Transport errors from the client.
pub fn exists<C: StoreClient + ?Sized>(client: &C, path: &NodePath) -> Result<bool> {
    instrument("exists", path, || client.exists(path))
}

/// Data held by the node at `path`
///
/// # Errors
///
/// `NotFound` if the node is absent; transport errors otherwise.
pub fn get<C: StoreClient + ?Sized>(client: &C, path: &NodePath) -> Result<Vec<u8>> {
    instrument_measured(
        "get",
        path,
        || client.read(path).map(|(data, _)| data),
        |data| data_len(data.len()),
    )
}

/// Names of the immediate children of `path`
///
/// # Errors
///
/// `NotFound` if the node is absent; transport errors otherwise.
pub fn children<C: StoreClient + ?Sized>(client: &C, path: &NodePath) -> Result<Vec<String>> {
    instrument_measured(
        "children",
        path,
        || client.list_children(path),
        |names| child_count(names),
    )
}

/// Every descendant of `path`, relative to it, in pre-order
///
/// # Errors
///
/// The first `list_children` failure anywhere in the subtree.
pub fn children_recursive<C: StoreClient + ?Sized>(
    client: &C,
    path: &NodePath,
) -> Result<Vec<String>> {
    instrument_measured(
        "children_recursive",
        path,
        || traversal::children_recursive(client, path),
        |names| child_count(names),
    )
}

/// Create a node at `path` holding `data`
///
/// Without `force` the parent must already exist. With `force`, missing
/// ancestors are created top-down with empty data first. An ancestor that
/// appears between the existence check and its creation counts as created.
/// The target itself is never overwritten: if it exists, its
/// `AlreadyExists` is returned whether or not `force` is set.
///
/// Ancestors created before a failure are left in place.
///
/// # Errors
///
/// `NoParent` (plain create only), `AlreadyExists` for the target, any
/// other ancestor creation failure, and transport errors.
pub fn create<C: StoreClient + ?Sized>(
    client: &C,
    path: &NodePath,
    data: &[u8],
    force: bool,
) -> Result<NodePath> {
    let op = if force { "create_forced" } else { "create" };
    instrument(op, path, || {
        if force {
            ensure_ancestors(client, path)?;
        }
        client.create_node(path, data)
    })
}

fn ensure_ancestors<C: StoreClient + ?Sized>(client: &C, path: &NodePath) -> Result<()> {
    for ancestor in path.ancestors() {
        if client.exists(&ancestor)? {
            continue;
        }
        match client.create_node(&ancestor, &[]) {
            Ok(_) => debug!(path = %ancestor, "created missing ancestor"),
            Err(e) if e.is_already_exists() => {
                debug!(path = %ancestor, "ancestor created concurrently")
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Write `data` to `path` exactly once
///
/// `expected = None` writes regardless of the node's version. Never retries.
///
/// # Errors
///
/// `VersionConflict` if `expected` is stale, `NotFound` if the node is
/// absent; transport errors otherwise.
pub fn set<C: StoreClient + ?Sized>(
    client: &C,
    path: &NodePath,
    data: &[u8],
    expected: Option<Version>,
) -> Result<Version> {
    instrument_measured(
        "set",
        path,
        || client.write(path, data, expected),
        |_| data_len(data.len()),
    )
}

/// Write `data` to `path` whatever its current version
///
/// Reads the current version, then writes against it. A `VersionConflict`
/// means another writer got in between, so the version is read again and
/// the write repeated, sleeping per `policy` in between. Every other error
/// stops the loop at once, including timeouts.
///
/// Returns the version the successful write produced.
///
/// # Errors
///
/// `RetriesExhausted` when `policy` caps attempts and all of them
/// conflicted; otherwise the first non-conflict error, unchanged.
pub fn set_with_version_upgrade<C: StoreClient + ?Sized>(
    client: &C,
    path: &NodePath,
    data: &[u8],
    policy: &RetryPolicy,
) -> Result<Version> {
    let upgrade = || -> Result<Version> {
        let mut backoff = policy.backoff();
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let version = client.version(path)?;
            match client.write(path, data, Some(version)) {
                Ok(new_version) => return Ok(new_version),
                Err(e) if e.is_version_conflict() => {
                    if !policy.allows_retry_after(attempt) {
                        return Err(NodeError::RetriesExhausted {
                            path: path.to_string(),
                            attempts: attempt,
                        });
                    }
                    debug!(
                        op = "set_with_version_upgrade",
                        event = EVENT_RETRY,
                        path = %path,
                        attempt,
                        version,
                        "version conflict, retrying"
                    );
                    if let Some(delay) = backoff.next_delay() {
                        std::thread::sleep(delay);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    };
    instrument_measured("set_with_version_upgrade", path, upgrade, |_| {
        data_len(data.len())
    })
}

/// Delete the node at `path`
///
/// # Errors
///
/// `NotFound` if absent, `NotEmpty` if the store refuses to delete a node
/// with children; transport errors otherwise.
pub fn delete<C: StoreClient + ?Sized>(client: &C, path: &NodePath) -> Result<()> {
    instrument("delete", path, || client.delete_node(path))
}
