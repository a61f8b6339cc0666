//! Remove command for the zigvm CLI.
//!
//! Deletes an installed version's files and registry entry. Removing a
//! version that is not installed succeeds.
//!
//! ## Usage
//!
//! ```bash
//! zigvm remove 0.12.0
//! ```

use anyhow::Result;
use clap::Args;

use crate::toolchain::lifecycle::remove;
use crate::toolchain::{Session, VersionId};

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Version to remove (e.g., "0.12.0").
    pub version: String,
}

/// Executes the remove command.
///
/// # Errors
///
/// Returns an error if the version string is invalid or the registry cannot
/// be written. Failing to delete files is only a warning.
pub fn execute(args: &RemoveArgs) -> Result<()> {
    let version: VersionId = args.version.parse()?;
    let mut session = Session::open()?;

    let outcome = remove(&mut session, &version)?;

    if let Some(warning) = &outcome.cleanup_warning {
        eprintln!("Warning: {warning}");
    }

    if outcome.was_registered {
        println!("Removed Zig {version}.");
    } else {
        println!("Zig {version} is not installed; nothing to remove.");
    }

    if outcome.was_current {
        println!("No version is selected now. Run 'zigvm use <version>' to select one.");
    }

    Ok(())
}
