//! Forwarding compiler invocations to the current version.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::errors::{Result, ZigvmError};
use crate::toolchain::session::Session;

/// Exit code used when the forwarded process was killed by a signal.
pub const SIGNAL_EXIT_CODE: i32 = 125;

/// Runs the current version's `zig` with `args` and waits for it.
///
/// Standard streams are inherited. Returns the exit code to terminate with:
/// the child's own code, or [`SIGNAL_EXIT_CODE`] if it had none.
///
/// # Errors
///
/// `NoVersionSelected` if there is no current version,
/// `CorruptedInstallation` if its executable is missing, or `Io` if the
/// process cannot be started. Nothing is spawned in the first two cases.
pub fn run(session: &Session, args: &[OsString]) -> Result<i32> {
    let version = session
        .registry
        .current()
        .ok_or(ZigvmError::NoVersionSelected)?;

    let executable = session.paths.executable_path(&version, session.platform);
    if !executable.is_file() {
        return Err(ZigvmError::CorruptedInstallation {
            version: version.to_string(),
            path: executable,
        });
    }

    debug!(%version, executable = %executable.display(), ?args, "forwarding");
    let status = spawn(&executable, args)?;
    Ok(exit_code(status))
}

fn spawn(executable: &Path, args: &[OsString]) -> Result<ExitStatus> {
    Command::new(executable)
        .args(args)
        .status()
        .map_err(|e| ZigvmError::io(format!("Failed to execute {}", executable.display()), e))
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(SIGNAL_EXIT_CODE)
}
