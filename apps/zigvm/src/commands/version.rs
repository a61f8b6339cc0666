//! Version command for the zigvm CLI.
//!
//! Displays version information for zigvm itself. In verbose mode, shows
//! the build commit and the platform key used to pick downloads.

use anyhow::Result;
use clap::Args;

use crate::toolchain::Platform;

/// Arguments for the version command.
#[derive(Args)]
pub struct VersionArgs {
    /// Show build commit and platform details.
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
}

/// Executes the version command.
#[allow(clippy::unnecessary_wraps)]
pub fn execute(args: &VersionArgs) -> Result<()> {
    println!("zigvm {}", env!("CARGO_PKG_VERSION"));
    if args.verbose {
        print_verbose_version();
    }
    Ok(())
}

/// Prints build and platform details.
fn print_verbose_version() {
    let platform = Platform::detect();
    println!();
    println!("Build Information:");
    println!("  Version:   {}", env!("CARGO_PKG_VERSION"));
    println!("  Commit:    {}", git_commit());
    println!("  Platform:  {}-{}", platform.os(), platform.arch());
    println!("  Index key: {}", platform.index_key());
}

/// Returns the git commit hash embedded at build time, or a fallback.
fn git_commit() -> &'static str {
    option_env!("ZIGVM_GIT_COMMIT").unwrap_or("unknown")
}
