//! Read-only commands: exists, get, ls, lsr

use std::io::Write;

use zkcli_core::StoreClient;

use super::{in_op, parse_path, CommandResult, Completion, Context, PathArgs};
use crate::output::{write_data, write_flag, write_names};

pub fn exists<C: StoreClient, W: Write>(ctx: Context<'_, C, W>, args: PathArgs) -> CommandResult {
    let path = parse_path(&args.path).map_err(in_op("exists"))?;
    let exists = ctx.ops.exists(&path).map_err(in_op("exists"))?;
    write_flag(ctx.out, exists, ctx.format)?;
    Ok(if exists {
        Completion::Success
    } else {
        Completion::Negative
    })
}

pub fn get<C: StoreClient, W: Write>(ctx: Context<'_, C, W>, args: PathArgs) -> CommandResult {
    let path = parse_path(&args.path).map_err(in_op("get"))?;
    let data = ctx.ops.get(&path).map_err(in_op("get"))?;
    write_data(ctx.out, &data, ctx.format)?;
    Ok(Completion::Success)
}

pub fn ls<C: StoreClient, W: Write>(ctx: Context<'_, C, W>, args: PathArgs) -> CommandResult {
    let path = parse_path(&args.path).map_err(in_op("ls"))?;
    let names = ctx.ops.children(&path).map_err(in_op("ls"))?;
    write_names(ctx.out, &names, ctx.format)?;
    Ok(Completion::Success)
}

/// Recursive listing; output holds paths relative to the argument, pre-order
pub fn lsr<C: StoreClient, W: Write>(ctx: Context<'_, C, W>, args: PathArgs) -> CommandResult {
    let path = parse_path(&args.path).map_err(in_op("lsr"))?;
    let names = ctx.ops.children_recursive(&path).map_err(in_op("lsr"))?;
    write_names(ctx.out, &names, ctx.format)?;
    Ok(Completion::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use zkcli_core::{ExError, ExErrorKind, MemoryStore, NodeOps, NodePath};

    fn ops_with(paths: &[&str]) -> NodeOps<MemoryStore> {
        let store = MemoryStore::new();
        for path in paths {
            store
                .create_node(&NodePath::parse(path).unwrap(), path.as_bytes())
                .unwrap();
        }
        NodeOps::new(store)
    }

    fn args(path: &str) -> PathArgs {
        PathArgs {
            path: path.to_string(),
        }
    }

    fn ctx<'a>(
        ops: &'a NodeOps<MemoryStore>,
        out: &'a mut Vec<u8>,
        format: OutputFormat,
    ) -> Context<'a, MemoryStore, Vec<u8>> {
        Context {
            ops,
            format,
            input_file: None,
            out,
        }
    }

    #[test]
    fn test_exists_reports_negative_without_error() {
        let ops = ops_with(&["/a"]);
        let mut out = Vec::new();

        let done = exists(ctx(&ops, &mut out, OutputFormat::Txt), args("/a")).unwrap();
        assert_eq!(done, Completion::Success);

        let done = exists(ctx(&ops, &mut out, OutputFormat::Txt), args("/b")).unwrap();
        assert_eq!(done, Completion::Negative);
        assert_eq!(String::from_utf8(out).unwrap(), "true\nfalse\n");
    }

    #[test]
    fn test_lsr_prints_relative_paths() {
        let ops = ops_with(&["/r", "/r/a", "/r/a/x", "/r/b"]);
        let mut out = Vec::new();

        lsr(ctx(&ops, &mut out, OutputFormat::Json), args("/r")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[\"a\",\"a/x\",\"b\"]\n");
    }

    #[test]
    fn test_get_missing_node_names_op_and_path() {
        let ops = ops_with(&[]);
        let mut out = Vec::new();

        let err = get(ctx(&ops, &mut out, OutputFormat::Txt), args("/nope")).unwrap_err();
        let ex = err.downcast_ref::<ExError>().unwrap();
        assert_eq!(ex.kind(), ExErrorKind::NotFound);
        assert_eq!(ex.op(), Some("get"));
        assert_eq!(ex.path(), Some("/nope"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_ls_rejects_trailing_slash() {
        let ops = ops_with(&["/a"]);
        let mut out = Vec::new();

        let err = ls(ctx(&ops, &mut out, OutputFormat::Txt), args("/a/")).unwrap_err();
        let ex = err.downcast_ref::<ExError>().unwrap();
        assert_eq!(ex.kind(), ExErrorKind::InvalidPath);
    }
}
