use thiserror::Error;

use crate::client::Version;

/// Result type alias using NodeError
pub type Result<T> = std::result::Result<T, NodeError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and the exit report printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidPath,
    InvalidInput,

    // Node state
    NotFound,
    AlreadyExists,
    VersionConflict,
    NotEmpty,

    // Transport
    Connectivity,
    Timeout,

    // Integration/IO
    Persistence,
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::VersionConflict => "ERR_VERSION_CONFLICT",
            ExErrorKind::NotEmpty => "ERR_NOT_EMPTY",
            ExErrorKind::Connectivity => "ERR_CONNECTIVITY",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the operation and node path the error
/// concerns. Built from a [`NodeError`] at reporting boundaries, or directly
/// by callers for failures outside the node layer (file input, output).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add node path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the node path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for node operations and store primitives
///
/// Every variant that concerns a node carries the path it was raised for, so
/// errors surfaced from deep inside a traversal or an ancestor chain still
/// name the node that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// Path failed validation
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Node does not exist
    #[error("Node not found: {path}")]
    NotFound { path: String },

    /// Parent of a node being created does not exist
    #[error("Cannot create {path}: parent node does not exist")]
    NoParent { path: String },

    /// Node being created already exists
    #[error("Node already exists: {path}")]
    AlreadyExists { path: String },

    /// Optimistic write named a version that is no longer current
    #[error("Version conflict on {path}: expected version {expected}")]
    VersionConflict { path: String, expected: Version },

    /// Version-upgrading write gave up under its retry policy
    #[error("Version conflict on {path} persisted after {attempts} attempts")]
    RetriesExhausted { path: String, attempts: u32 },

    /// Node cannot be deleted while it has children
    #[error("Node has children: {path}")]
    NotEmpty { path: String },

    /// Transport or session failure
    #[error("Connection failure on {path}: {message}")]
    Connectivity { path: String, message: String },

    /// Store client timed out
    #[error("Operation timed out on {path}")]
    Timeout { path: String },

    /// Local backing store failure; `path` is absent for schema-level failures
    #[error("Persistence error: {message}")]
    Persistence {
        path: Option<String>,
        message: String,
    },

    /// Malformed caller input other than a path
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl NodeError {
    /// Classify this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            NodeError::InvalidPath { .. } => ExErrorKind::InvalidPath,
            NodeError::NotFound { .. } | NodeError::NoParent { .. } => ExErrorKind::NotFound,
            NodeError::AlreadyExists { .. } => ExErrorKind::AlreadyExists,
            NodeError::VersionConflict { .. } | NodeError::RetriesExhausted { .. } => {
                ExErrorKind::VersionConflict
            }
            NodeError::NotEmpty { .. } => ExErrorKind::NotEmpty,
            NodeError::Connectivity { .. } => ExErrorKind::Connectivity,
            NodeError::Timeout { .. } => ExErrorKind::Timeout,
            NodeError::Persistence { .. } => ExErrorKind::Persistence,
            NodeError::InvalidInput { .. } => ExErrorKind::InvalidInput,
            NodeError::Internal { .. } => ExErrorKind::Internal,
        }
    }

    /// Path the error concerns, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            NodeError::InvalidPath { path, .. }
            | NodeError::NotFound { path }
            | NodeError::NoParent { path }
            | NodeError::AlreadyExists { path }
            | NodeError::VersionConflict { path, .. }
            | NodeError::RetriesExhausted { path, .. }
            | NodeError::NotEmpty { path }
            | NodeError::Connectivity { path, .. }
            | NodeError::Timeout { path } => Some(path),
            NodeError::Persistence { path, .. } => path.as_deref(),
            NodeError::InvalidInput { .. } | NodeError::Internal { .. } => None,
        }
    }

    /// True only for a single optimistic-write mismatch
    ///
    /// `RetriesExhausted` shares the kind but is final, so it is excluded.
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, NodeError::VersionConflict { .. })
    }

    /// True for an already-exists collision on create
    pub fn is_already_exists(&self) -> bool {
        matches!(self, NodeError::AlreadyExists { .. })
    }
}

impl From<NodeError> for ExError {
    fn from(err: NodeError) -> Self {
        let mut ex = ExError::new(err.kind()).with_message(err.to_string());
        if let Some(path) = err.path() {
            ex = ex.with_path(path);
        }
        ex
    }
}

impl From<&NodeError> for ExError {
    fn from(err: &NodeError) -> Self {
        err.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_are_stable() {
        assert_eq!(ExErrorKind::NotFound.code(), "ERR_NOT_FOUND");
        assert_eq!(ExErrorKind::VersionConflict.code(), "ERR_VERSION_CONFLICT");
        assert_eq!(ExErrorKind::InvalidPath.code(), "ERR_INVALID_PATH");
    }

    #[test]
    fn test_no_parent_classified_as_not_found() {
        let err = NodeError::NoParent {
            path: "/a/b".to_string(),
        };
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.path(), Some("/a/b"));
    }

    #[test]
    fn test_retries_exhausted_is_not_retryable_conflict() {
        let err = NodeError::RetriesExhausted {
            path: "/a".to_string(),
            attempts: 3,
        };
        assert_eq!(err.kind(), ExErrorKind::VersionConflict);
        assert!(!err.is_version_conflict());
    }

    #[test]
    fn test_ex_error_from_node_error_carries_path() {
        let err = NodeError::Timeout {
            path: "/config".to_string(),
        };
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::Timeout);
        assert_eq!(ex.code(), "ERR_TIMEOUT");
        assert_eq!(ex.path(), Some("/config"));
        assert!(ex.to_string().contains("(path: /config)"));
    }

    #[test]
    fn test_ex_error_display_with_op() {
        let ex = ExError::new(ExErrorKind::Io)
            .with_op("read_input")
            .with_message("no such file");
        assert_eq!(
            ex.to_string(),
            "[ERR_IO] in operation 'read_input': no such file"
        );
    }
}
