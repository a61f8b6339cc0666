//! Use command for the zigvm CLI.
//!
//! Selects the Zig version that passthrough commands run.
//!
//! ## Usage
//!
//! ```bash
//! zigvm use 0.13.0
//! ```

use anyhow::{Result, bail};
use clap::Args;

use crate::errors::ZigvmError;
use crate::toolchain::lifecycle::set_current;
use crate::toolchain::{Session, VersionId};

/// Arguments for the use command.
#[derive(Args)]
pub struct UseArgs {
    /// Installed version to select (e.g., "0.13.0").
    pub version: String,
}

/// Executes the use command.
///
/// # Errors
///
/// Returns an error if the version string is invalid, the version is not
/// installed, or the registry cannot be written.
pub fn execute(args: &UseArgs) -> Result<()> {
    let version: VersionId = args.version.parse()?;
    let mut session = Session::open()?;

    if session.registry.is_current(&version) {
        println!("Zig {version} is already the current version.");
        return Ok(());
    }

    match set_current(&mut session, version) {
        Ok(()) => {
            println!("Now using Zig {version}.");
            Ok(())
        }
        Err(ZigvmError::VersionNotInstalled { .. }) => bail!(
            "version {version} is not installed.\n\
             Run 'zigvm install {version}' to install it first."
        ),
        Err(e) => Err(e.into()),
    }
}
