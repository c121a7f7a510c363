//! Command handlers
//!
//! Handlers run one node operation against an already-open client and write
//! their result to the supplied writer. They never touch the process exit
//! status themselves: a negative `exists` answer comes back as
//! [`Completion::Negative`].

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use zkcli_core::{ExError, ExErrorKind, NodeError, NodeOps, NodePath, StoreClient};

use crate::output::OutputFormat;

pub mod read;
pub mod write;

/// Handler result, mirroring the error boundary of `main`
pub type CommandResult = Result<Completion, Box<dyn Error>>;

/// How a successful command ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Success,
    /// The command ran but answered "no"
    Negative,
}

/// Per-invocation state shared by every handler
pub struct Context<'a, C: StoreClient, W: Write> {
    pub ops: &'a NodeOps<C>,
    pub format: OutputFormat,
    pub input_file: Option<PathBuf>,
    pub out: &'a mut W,
}

/// Arguments of commands that only take a node path
#[derive(Debug, Args)]
pub struct PathArgs {
    /// Node path, e.g. /app/config
    pub path: String,
}

/// Parse the path argument
///
/// A trailing `/` is rejected with its own message before general
/// validation, since it is the most common slip on the command line.
pub fn parse_path(raw: &str) -> Result<NodePath, NodeError> {
    if raw.len() > 1 && raw.ends_with('/') {
        return Err(NodeError::InvalidPath {
            path: raw.to_string(),
            reason: "Path must not end with '/'".to_string(),
        });
    }
    NodePath::parse(raw)
}

/// Attach the command name to a node error for reporting
pub fn in_op(op: &'static str) -> impl Fn(NodeError) -> ExError {
    move |err| ExError::from(err).with_op(op)
}

/// Where a write command's payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Inline,
    File,
}

/// Resolve payload bytes from `-f` or the positional data argument
///
/// # Errors
///
/// `Io` if the input file cannot be read; `InvalidInput` if neither source
/// was given.
pub fn input_data(
    input_file: Option<&PathBuf>,
    inline: Option<&str>,
) -> Result<(Vec<u8>, DataSource), ExError> {
    if let Some(file) = input_file {
        tracing::info!(file = %file.display(), "Reading input file");
        let bytes = std::fs::read(file).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("read_input")
                .with_message(format!("{}: {}", file.display(), e))
        })?;
        return Ok((bytes, DataSource::File));
    }
    match inline {
        Some(data) => Ok((data.as_bytes().to_vec(), DataSource::Inline)),
        None => Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("read_input")
            .with_message("Expected data argument")),
    }
}
