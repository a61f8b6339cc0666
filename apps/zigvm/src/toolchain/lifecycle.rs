//! Remove, rename, select and update installed versions.
//!
//! Every operation mutates the session's registry and persists it before
//! returning successfully. Directory changes are made first where they can
//! fail, so an error leaves the registry untouched.

use std::io::ErrorKind;

use tracing::debug;

use crate::errors::{Result, ZigvmError};
use crate::toolchain::download::Fetch;
use crate::toolchain::index::RemoteIndex;
use crate::toolchain::installer::{self, InstallOutcome};
use crate::toolchain::session::Session;
use crate::toolchain::version::{VersionId, VersionRequest};

/// What [`remove`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// The version had a registry entry.
    pub was_registered: bool,
    /// The version was current (and no longer is).
    pub was_current: bool,
    /// The version directory could not be deleted.
    pub cleanup_warning: Option<String>,
}

/// What [`update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// `version` is already the newest patch in its series.
    AlreadyLatest(VersionId),
    /// A newer patch was installed alongside the old one.
    Updated {
        from: VersionId,
        install: InstallOutcome,
    },
}

/// Removes `version` from the registry and deletes its directory.
///
/// Removing a version that is not installed is not an error. A missing
/// directory is fine; any other deletion failure is a warning.
///
/// # Errors
///
/// Only a failure to persist the registry.
pub fn remove(session: &mut Session, version: &VersionId) -> Result<RemoveOutcome> {
    let was_current = session.registry.is_current(version);
    let was_registered = session.registry.remove(version);

    let dir = session.paths.version_dir(version);
    let cleanup_warning = match std::fs::remove_dir_all(&dir) {
        Ok(()) => {
            debug!(dir = %dir.display(), "removed version directory");
            None
        }
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "could not remove version directory");
            Some(format!("failed to delete {}: {e}", dir.display()))
        }
    };

    session.persist()?;

    Ok(RemoveOutcome {
        was_registered,
        was_current,
        cleanup_warning,
    })
}

/// Renames installed version `old` to `new`, on disk and in the registry.
///
/// The registry entry keeps its position; `current` follows the rename.
///
/// # Errors
///
/// `VersionNotInstalled`, `VersionAlreadyExists`, or `Io` if the directory
/// cannot be renamed (the registry is unchanged in all three cases).
pub fn rename(session: &mut Session, old: &VersionId, new: VersionId) -> Result<()> {
    session.registry.check_renamable(old, &new)?;

    let from = session.paths.version_dir(old);
    let to = session.paths.version_dir(&new);
    std::fs::rename(&from, &to).map_err(|e| {
        ZigvmError::io(
            format!("Failed to rename {} to {}", from.display(), to.display()),
            e,
        )
    })?;

    session.registry.rename(old, new)?;
    session.persist()
}

/// Selects `version` as current.
///
/// Only registry membership is checked, not the files on disk.
///
/// # Errors
///
/// `VersionNotInstalled`, or a failure to persist the registry.
pub fn set_current(session: &mut Session, version: VersionId) -> Result<()> {
    session.registry.set_current(version)?;
    session.persist()
}

/// Installs the newest patch release in `version`'s series.
///
/// The older patch stays installed and the current version is unchanged.
///
/// # Errors
///
/// `NoVersionsFound` if the index has no release in the series, or any
/// install error.
pub async fn update<F: Fetch>(
    session: &mut Session,
    fetcher: &F,
    index: &RemoteIndex,
    version: VersionId,
) -> Result<UpdateOutcome> {
    let latest = index
        .latest_in_series(version.major, version.minor)
        .ok_or(ZigvmError::NoVersionsFound)?;

    if latest == version {
        return Ok(UpdateOutcome::AlreadyLatest(version));
    }

    debug!(from = %version, to = %latest, "updating");
    let install = installer::install(session, fetcher, index, VersionRequest::Exact(latest)).await?;
    Ok(UpdateOutcome::Updated {
        from: version,
        install,
    })
}
