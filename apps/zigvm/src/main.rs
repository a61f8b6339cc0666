#![warn(clippy::pedantic)]

//! # zigvm
//!
//! `zigvm` keeps several versions of the Zig compiler side by side, tracks
//! which one is current, and forwards every other invocation to the current
//! version's `zig` executable.
//!
//! ## Subcommands
//!
//! - `install <version|master>` - Download and unpack a version
//! - `use <version>` - Select the current version
//! - `list` - List installed versions
//! - `remove <version>` - Delete an installed version
//! - `rename <old> <new>` - Rename an installed version
//! - `update <version>` - Install the newest patch in a version's series
//! - `version` - Display version information
//!
//! Anything else is passed to `zig` unchanged:
//!
//! ```bash
//! zigvm install 0.13.0
//! zigvm use 0.13.0
//! zigvm build -Doptimize=ReleaseFast   # runs ~/.zigvm/versions/0.13.0/zig build ...
//! ```

mod commands;
mod errors;
mod toolchain;

use std::ffi::OsString;
use std::io::IsTerminal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{install, list, passthrough, remove, rename, update, use_cmd, version};
use errors::ZigvmError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Zig toolchain version manager.
#[derive(Parser)]
#[command(
    name = "zigvm",
    author,
    version,
    about = "Manage Zig compiler versions and run the current one",
    long_about = "zigvm installs Zig releases side by side, tracks which one is current, \
    and forwards any unrecognized command to the current version's zig executable.",
    after_help = "\
PASSTHROUGH:
    Any command zigvm does not recognize is run by the current zig with all
    arguments unchanged, e.g. 'zigvm build run' or 'zigvm fmt src/'.
    The exit code of zig becomes the exit code of zigvm.

ENVIRONMENT VARIABLES:
    ZIGVM_HOME              Data directory (default: ~/.zigvm)
    ZIGVM_INDEX_URL         Release index URL (default: https://ziglang.org/download/index.json)
    RUST_LOG                Log filter (default: zigvm=warn)"
)]
pub struct Cli {
    /// Print debug logs to stderr.
    #[clap(long = "debug", global = true, action = clap::ArgAction::SetTrue)]
    pub debug: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the zigvm CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Install a Zig version.
    ///
    /// Downloads the release for this platform and unpacks it. Use "master"
    /// for the newest release in the index. Installing does not change the
    /// current version.
    Install(install::InstallArgs),

    /// Select the current Zig version.
    ///
    /// The version must already be installed.
    Use(use_cmd::UseArgs),

    /// List installed Zig versions.
    ///
    /// The current version is marked with '*'.
    List,

    /// Remove an installed Zig version.
    ///
    /// Deletes the version's files. Removing the current version leaves no
    /// version selected.
    Remove(remove::RemoveArgs),

    /// Rename an installed Zig version.
    Rename(rename::RenameArgs),

    /// Install the newest patch release of a version's series.
    ///
    /// The given version stays installed; the current version is unchanged.
    Update(update::UpdateArgs),

    /// Display version information.
    ///
    /// Shows the version of zigvm. Use -v or --verbose for build and
    /// platform details.
    Version(version::VersionArgs),

    /// Run the current zig with these arguments.
    #[command(external_subcommand)]
    External(Vec<OsString>),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        let exit_code = handle_error(&e);
        std::process::exit(exit_code);
    }
}

/// Handles an error and returns the appropriate exit code.
///
/// For `ProcessExitCode` errors, returns the embedded exit code without
/// printing an error message (the forwarded process already printed its
/// output). For all other errors, prints the error and returns exit code 1.
fn handle_error(e: &anyhow::Error) -> i32 {
    if let Some(ZigvmError::ProcessExitCode { code }) = e.downcast_ref::<ZigvmError>() {
        return *code;
    }
    eprintln!("Error: {e:?}");
    1
}

/// Sets up logging to stderr. `RUST_LOG` takes precedence over `--debug`.
fn init_tracing(debug: bool) {
    let default_filter = if debug { "zigvm=debug" } else { "zigvm=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Some(Commands::Install(args)) => install::execute(&args).await,
        Some(Commands::Use(args)) => use_cmd::execute(&args),
        Some(Commands::List) => list::execute(),
        Some(Commands::Remove(args)) => remove::execute(&args),
        Some(Commands::Rename(args)) => rename::execute(&args),
        Some(Commands::Update(args)) => update::execute(&args).await,
        Some(Commands::Version(args)) => version::execute(&args),
        Some(Commands::External(args)) => passthrough::execute(&args),
        None => {
            println!("zigvm: Zig toolchain version manager");
            println!();
            println!("Run 'zigvm --help' for usage information.");
            Ok(())
        }
    }
}
