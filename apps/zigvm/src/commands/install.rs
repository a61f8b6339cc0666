//! Install command for the zigvm CLI.
//!
//! Downloads and unpacks a Zig release into `~/.zigvm/versions/<version>/`.
//!
//! ## Usage
//!
//! ```bash
//! zigvm install 0.13.0    # Install a specific version
//! zigvm install master    # Install the newest release in the index
//! ```

use anyhow::{Context, Result};
use clap::Args;

use crate::toolchain::{
    HttpFetcher, InstallOutcome, Session, VersionRequest, fetch_index, install,
};

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallArgs {
    /// Version to install (e.g., "0.13.0" or "master").
    pub version: String,
}

/// Executes the install command.
///
/// # Errors
///
/// Returns an error if:
/// - The version string is invalid
/// - The release index cannot be fetched or parsed
/// - The version or platform is not in the index
/// - Download or extraction fails
pub async fn execute(args: &InstallArgs) -> Result<()> {
    let request: VersionRequest = args.version.parse()?;
    let mut session = Session::open()?;
    let fetcher = HttpFetcher::new()?;

    println!("Fetching release index...");
    let index = fetch_index(&fetcher, &session.settings)
        .await
        .context("Failed to fetch release index")?;

    if request == VersionRequest::Master {
        let resolved = index.resolve(request)?;
        println!("Resolved {request} to {resolved}.");
    }

    let outcome = install(&mut session, &fetcher, &index, request).await?;
    report(&session, outcome);
    Ok(())
}

/// Prints the result of an install, shared with `update`.
pub fn report(session: &Session, outcome: InstallOutcome) {
    match outcome {
        InstallOutcome::AlreadyInstalled(version) => {
            println!("Version {version} is already installed.");
        }
        InstallOutcome::Installed(version) => {
            println!(
                "Zig {version} installed to {}.",
                session.paths.version_dir(&version).display()
            );
            if session.registry.current().is_none() {
                println!("Run 'zigvm use {version}' to make it the current version.");
            }
        }
    }
}
