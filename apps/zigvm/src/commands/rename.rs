//! Rename command for the zigvm CLI.
//!
//! ## Usage
//!
//! ```bash
//! zigvm rename 0.12.0 0.12.1
//! ```

use anyhow::Result;
use clap::Args;

use crate::toolchain::lifecycle::rename;
use crate::toolchain::{Session, VersionId};

/// Arguments for the rename command.
#[derive(Args)]
pub struct RenameArgs {
    /// Installed version to rename.
    pub old: String,

    /// New version name; must not be installed already.
    pub new: String,
}

/// Executes the rename command.
///
/// # Errors
///
/// Returns an error if either version string is invalid, `old` is not
/// installed, `new` already is, or the directory cannot be renamed.
pub fn execute(args: &RenameArgs) -> Result<()> {
    let old: VersionId = args.old.parse()?;
    let new: VersionId = args.new.parse()?;
    let mut session = Session::open()?;

    rename(&mut session, &old, new)?;
    println!("Renamed {old} to {new}.");

    Ok(())
}
