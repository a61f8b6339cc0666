//! List command for the zigvm CLI.
//!
//! Displays installed versions in installation order. The current version
//! is marked with `*`; versions whose files are gone are flagged.
//!
//! ## Usage
//!
//! ```bash
//! zigvm list
//! ```

use anyhow::Result;

use crate::toolchain::Session;

/// Executes the list command.
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined or the
/// settings file is invalid.
pub fn execute() -> Result<()> {
    let session = Session::open()?;
    let installed = session.registry.installed();

    if installed.is_empty() {
        println!("No versions installed.");
        println!();
        println!("Run 'zigvm install <version>' to install one.");
        return Ok(());
    }

    println!("Installed versions:");
    for version in installed {
        let marker = if session.registry.is_current(version) {
            "*"
        } else {
            " "
        };
        let missing = if session.paths.has_version_dir(version) {
            ""
        } else {
            " (files missing)"
        };
        println!("{marker} {version}{missing}");
    }

    if session.registry.current().is_none() {
        println!();
        println!("No version selected. Run 'zigvm use <version>' to select one.");
    }

    Ok(())
}
