//! Mutating commands: create, creater, set, delete

use std::io::Write;

use clap::Args;
use tracing::info;
use zkcli_core::{StoreClient, Version};

use super::{in_op, input_data, parse_path, CommandResult, Completion, Context, DataSource, PathArgs};

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Node path
    pub path: String,

    /// Node data; ignored when -f/--input-file is given
    pub data: Option<String>,

    /// Create missing ancestors first, with empty data
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Node path
    pub path: String,

    /// Node data; ignored when -f/--input-file is given
    pub data: Option<String>,

    /// Only write if the node is still at this version
    #[arg(long, conflicts_with = "upgrade")]
    pub version: Option<Version>,

    /// Retry across concurrent writers until the write lands
    /// (the default for data read from a file)
    #[arg(long)]
    pub upgrade: bool,
}

pub fn create<C: StoreClient, W: Write>(ctx: Context<'_, C, W>, args: CreateArgs) -> CommandResult {
    let op = if args.force { "creater" } else { "create" };
    let path = parse_path(&args.path).map_err(in_op(op))?;
    let (data, _) = input_data(ctx.input_file.as_ref(), args.data.as_deref())?;

    let created = ctx
        .ops
        .create(&path, &data, args.force)
        .map_err(in_op(op))?;
    info!(path = %created, "Created {}", created);
    Ok(Completion::Success)
}

/// Write node data
///
/// `--version` makes a single conditional write. Otherwise data read from a
/// file, or any data with `--upgrade`, goes through the version-upgrade
/// loop; inline data is written unconditionally.
pub fn set<C: StoreClient, W: Write>(ctx: Context<'_, C, W>, args: SetArgs) -> CommandResult {
    let path = parse_path(&args.path).map_err(in_op("set"))?;
    let (data, source) = input_data(ctx.input_file.as_ref(), args.data.as_deref())?;

    let version = match args.version {
        Some(expected) => ctx.ops.set(&path, &data, Some(expected)),
        None if args.upgrade || source == DataSource::File => {
            ctx.ops.set_with_version_upgrade(&path, &data)
        }
        None => ctx.ops.set(&path, &data, None),
    }
    .map_err(in_op("set"))?;
    info!(path = %path, version, "Set {} at version {}", path, version);
    Ok(Completion::Success)
}

pub fn delete<C: StoreClient, W: Write>(ctx: Context<'_, C, W>, args: PathArgs) -> CommandResult {
    let path = parse_path(&args.path).map_err(in_op("delete"))?;
    ctx.ops.delete(&path).map_err(in_op("delete"))?;
    info!(path = %path, "Deleted {}", path);
    Ok(Completion::Success)
}
