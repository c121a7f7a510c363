//! Node path utilities
//!
//! A [`NodePath`] is a validated, absolute, slash-delimited path. All
//! functions here are pure; none touch the store.

use std::fmt;
use std::str::FromStr;

use crate::errors::{NodeError, Result};

/// Path separator and root marker
pub const SEPARATOR: char = '/';

/// Validated absolute node path
///
/// Always starts with `/`, never ends with `/` (except the root itself),
/// and never contains empty, `.` or `..` segments. Two paths are equal iff
/// their segment sequences are equal, which for this normalized form is
/// plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(String);

impl NodePath {
    /// The root path `/`
    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    /// Parse and validate a path
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the input is empty, relative, has a trailing
    /// separator, or contains an empty, `.`, `..` or NUL-bearing segment.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| NodeError::InvalidPath {
            path: input.to_string(),
            reason: reason.to_string(),
        };

        if input.is_empty() {
            return Err(invalid("path is empty"));
        }
        if !input.starts_with(SEPARATOR) {
            return Err(invalid("path must start with '/'"));
        }
        if input.len() == 1 {
            return Ok(Self::root());
        }
        if input.ends_with(SEPARATOR) {
            return Err(invalid("path must not end with '/'"));
        }
        for segment in input[1..].split(SEPARATOR) {
            validate_segment(segment).map_err(|reason| invalid(reason))?;
        }

        Ok(Self(input.to_string()))
    }

    /// Borrow the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `/`
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Segments from the top down; empty for the root
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0[1..].split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last segment, or `None` for the root
    pub fn name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit(SEPARATOR).next()
    }

    /// Immediate parent, or `None` for the root
    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) | None => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
        }
    }

    /// Path of the child named `name`
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if `name` is not a single valid segment.
    pub fn join(&self, name: &str) -> Result<NodePath> {
        let joined = if self.is_root() {
            format!("{}{}", SEPARATOR, name)
        } else {
            format!("{}{}{}", self.0, SEPARATOR, name)
        };
        validate_segment(name).map_err(|reason| NodeError::InvalidPath {
            path: joined.clone(),
            reason: reason.to_string(),
        })?;
        Ok(Self(joined))
    }

    /// Proper ancestors below the root, top-down
    ///
    /// `/a/b/c` yields `/a`, `/a/b`. The root and the path itself are never
    /// included.
    pub fn ancestors(&self) -> Vec<NodePath> {
        let mut ancestors = Vec::new();
        let mut current = String::new();
        let depth = self.depth();
        for segment in self.segments().take(depth.saturating_sub(1)) {
            current.push(SEPARATOR);
            current.push_str(segment);
            ancestors.push(Self(current.clone()));
        }
        ancestors
    }

    /// This path relative to `base`, without a leading separator
    ///
    /// Returns `None` unless `self` is a strict descendant of `base`.
    pub fn relative_to(&self, base: &NodePath) -> Option<String> {
        let rest = if base.is_root() {
            self.0.strip_prefix(SEPARATOR)?
        } else {
            self.0
                .strip_prefix(base.as_str())?
                .strip_prefix(SEPARATOR)?
        };
        if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    }
}

/// Join a relative path and a child name
///
/// An empty `parent` stands for the traversal base itself, so the child name
/// is returned unchanged.
pub fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", parent, SEPARATOR, name)
    }
}

fn validate_segment(segment: &str) -> std::result::Result<(), &'static str> {
    if segment.is_empty() {
        return Err("path contains an empty segment");
    }
    if segment.contains(SEPARATOR) {
        return Err("segment must not contain '/'");
    }
    if segment == "." || segment == ".." {
        return Err("relative segments are not allowed");
    }
    if segment.contains('\0') {
        return Err("path contains a NUL character");
    }
    Ok(())
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodePath {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
