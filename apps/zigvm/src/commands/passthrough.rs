//! Passthrough of unrecognized commands to the current `zig`.
//!
//! ## Usage
//!
//! ```bash
//! zigvm build -Doptimize=ReleaseSafe
//! zigvm fmt src/main.zig
//! ```

use std::ffi::OsString;

use anyhow::Result;

use crate::errors::ZigvmError;
use crate::toolchain::Session;
use crate::toolchain::proxy;

/// Runs the current `zig` with `args` (the unrecognized command first).
///
/// # Errors
///
/// Returns an error if no version is selected or its executable is missing.
/// A non-zero child exit code is returned as `ProcessExitCode` so `main`
/// exits with it silently.
pub fn execute(args: &[OsString]) -> Result<()> {
    let session = Session::open()?;
    let code = proxy::run(&session, args)?;
    if code != 0 {
        return Err(ZigvmError::process_exit_code(code).into());
    }
    Ok(())
}
