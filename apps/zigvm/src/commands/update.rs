//! Update command for the zigvm CLI.
//!
//! Installs the newest patch release in the `major.minor` series of the
//! given version. The given version stays installed and current.
//!
//! ## Usage
//!
//! ```bash
//! zigvm update 0.11.0    # Installs 0.11.2 if that is the newest 0.11.x
//! ```

use anyhow::{Context, Result};
use clap::Args;

use crate::commands::install::report;
use crate::toolchain::lifecycle::update;
use crate::toolchain::{HttpFetcher, Session, UpdateOutcome, VersionId, fetch_index};

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Version whose series to update (e.g., "0.11.0").
    pub version: String,
}

/// Executes the update command.
///
/// # Errors
///
/// Returns an error if the version string is invalid, the index cannot be
/// fetched, the series has no releases, or the install fails.
pub async fn execute(args: &UpdateArgs) -> Result<()> {
    let version: VersionId = args.version.parse()?;
    let mut session = Session::open()?;
    let fetcher = HttpFetcher::new()?;

    println!("Fetching release index...");
    let index = fetch_index(&fetcher, &session.settings)
        .await
        .context("Failed to fetch release index")?;

    match update(&mut session, &fetcher, &index, version).await? {
        UpdateOutcome::AlreadyLatest(version) => {
            println!(
                "Zig {version} is already the latest {}.{} release.",
                version.major, version.minor
            );
        }
        UpdateOutcome::Updated { from, install } => {
            println!("{}", update_message(from, install.version()));
            report(&session, install);
        }
    }

    Ok(())
}

/// Describes the move from `from` to the newest release of its series,
/// which may be older than `from` when `from` is not in the index.
fn update_message(from: VersionId, to: VersionId) -> String {
    if to > from {
        format!("Updating {from} to {to}.")
    } else {
        format!(
            "Installing the newest {}.{}.x release, {to}.",
            to.major, to.minor
        )
    }
}
