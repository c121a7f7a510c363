//! zkcli
//!
//! Command-line interface for hierarchical coordination stores

use std::backtrace::Backtrace;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use zkcli_core::logging_facility::init;
use zkcli_core::{NodeOps, StoreClient};
use zkcli_store::open_client;

mod commands;
mod config;
mod output;

use commands::write::{CreateArgs, SetArgs};
use commands::{Completion, Context, PathArgs};
use config::{FileConfig, LogFormat, Overrides, Settings};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "zkcli")]
#[command(about = "zkcli - node operations for ZooKeeper-style stores", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// ZooKeeper ensemble: srv1[:port1][,srv2[:port2]...]
    #[arg(long, global = true, conflicts_with = "store")]
    servers: Option<String>,

    /// Local SQLite node store
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// TOML file with default backend, format and retry policy
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read node data from this file instead of the data argument
    #[arg(short = 'f', long = "input-file", global = true)]
    input_file: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Give up a version-upgrading set after this many conflicting retries
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Log operations and informational messages
    #[arg(long, global = true)]
    verbose: bool,

    /// Log everything, including operation boundaries and retry attempts
    #[arg(long, global = true)]
    debug: bool,

    /// Diagnostic log format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Print a stack trace after the error message
    #[arg(long, global = true)]
    stack: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print whether a node exists (exit status 1 if not)
    Exists(PathArgs),
    /// Print a node's data
    Get(PathArgs),
    /// List a node's children
    Ls(PathArgs),
    /// List all descendants, relative to the given node
    Lsr(PathArgs),
    /// Create a node
    Create(CreateArgs),
    /// Create a node and any missing ancestors
    Creater(CreateArgs),
    /// Write a node's data
    Set(SetArgs),
    /// Delete a childless node
    Delete(PathArgs),
}

fn settings(global: &GlobalArgs) -> Result<Settings, Box<dyn Error>> {
    let file = match &global.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let flags = Overrides {
        servers: global.servers.clone(),
        store: global.store.clone(),
        format: global.format,
        log_format: global.log_format,
        max_retries: global.max_retries,
        verbose: global.verbose,
        debug: global.debug,
    };
    Ok(Settings::resolve(file, &flags)?)
}

fn dispatch<C: StoreClient, W: Write>(
    ctx: Context<'_, C, W>,
    command: Commands,
) -> commands::CommandResult {
    match command {
        Commands::Exists(args) => commands::read::exists(ctx, args),
        Commands::Get(args) => commands::read::get(ctx, args),
        Commands::Ls(args) => commands::read::ls(ctx, args),
        Commands::Lsr(args) => commands::read::lsr(ctx, args),
        Commands::Create(args) => commands::write::create(ctx, args),
        Commands::Creater(mut args) => {
            args.force = true;
            commands::write::create(ctx, args)
        }
        Commands::Set(args) => commands::write::set(ctx, args),
        Commands::Delete(args) => commands::write::delete(ctx, args),
    }
}

fn run(cli: Cli) -> commands::CommandResult {
    let settings = settings(&cli.global)?;
    init(settings.log_profile, settings.verbosity);
    tracing::info!("starting");

    let client = open_client(&settings.backend).map_err(commands::in_op("connect"))?;
    let ops = NodeOps::new(client).with_retry_policy(settings.retry);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let ctx = Context {
        ops: &ops,
        format: settings.format,
        input_file: cli.global.input_file,
        out: &mut out,
    };
    let completion = dispatch(ctx, cli.command)?;
    out.flush()?;
    Ok(completion)
}

fn main() {
    let cli = Cli::parse();
    let stack = cli.global.stack;

    match run(cli) {
        Ok(Completion::Success) => {}
        Ok(Completion::Negative) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            if stack {
                eprintln!("{}", Backtrace::force_capture());
            }
            std::process::exit(1);
        }
    }
}
