//! Toolchain installation.
//!
//! An install walks a fixed sequence of [`InstallStage`]s:
//!
//! 1. resolve the request (`master` becomes the newest release),
//! 2. look up the artifact for this platform,
//! 3. create `versions/<version>/` (an existing directory ends the install
//!    successfully without touching anything),
//! 4. download the archive into that directory,
//! 5. optionally verify its checksum,
//! 6. extract it in place and delete the archive,
//! 7. register the version.
//!
//! A failed download or checksum removes the new directory again. A failed
//! extraction leaves it in place for inspection.

use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::errors::{Result, ZigvmError};
use crate::toolchain::archive::extract_archive;
use crate::toolchain::download::{ARCHIVE_SIZE_LIMIT, Fetch};
use crate::toolchain::index::RemoteIndex;
use crate::toolchain::session::Session;
use crate::toolchain::verify::verify_checksum;
use crate::toolchain::version::{VersionId, VersionRequest};

/// Progress markers of an install, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    AliasResolved,
    MetadataFetched,
    DirCreated,
    Downloaded,
    Verified,
    Extracted,
    Registered,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AliasResolved => "alias resolved",
            Self::MetadataFetched => "metadata fetched",
            Self::DirCreated => "directory created",
            Self::Downloaded => "downloaded",
            Self::Verified => "checksum verified",
            Self::Extracted => "extracted",
            Self::Registered => "registered",
        };
        f.write_str(name)
    }
}

/// What an install did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The version was downloaded, extracted and registered.
    Installed(VersionId),
    /// The version directory already existed; nothing was changed.
    AlreadyInstalled(VersionId),
}

impl InstallOutcome {
    #[must_use]
    pub fn version(&self) -> VersionId {
        match self {
            Self::Installed(version) | Self::AlreadyInstalled(version) => *version,
        }
    }
}

fn enter(version: &VersionId, stage: InstallStage) {
    debug!(%version, %stage, "install");
}

/// Installs `request` using `index` for resolution and metadata.
///
/// Does not change the current version.
///
/// # Errors
///
/// Resolution and lookup errors from the index, `Io` if the directory
/// cannot be created, download and checksum errors (after rollback),
/// `ExtractionFailed`, or a failure to persist the registry.
pub async fn install<F: Fetch>(
    session: &mut Session,
    fetcher: &F,
    index: &RemoteIndex,
    request: VersionRequest,
) -> Result<InstallOutcome> {
    let version = index.resolve(request)?;
    enter(&version, InstallStage::AliasResolved);

    let artifact = index.metadata_for(&version, session.platform)?;
    enter(&version, InstallStage::MetadataFetched);

    let paths = &session.paths;
    paths.ensure_directories()?;

    let version_dir = paths.version_dir(&version);
    match std::fs::create_dir(&version_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            info!(%version, dir = %version_dir.display(), "version directory already exists");
            return Ok(InstallOutcome::AlreadyInstalled(version));
        }
        Err(e) => {
            return Err(ZigvmError::io(
                format!("Failed to create directory {}", version_dir.display()),
                e,
            ));
        }
    }
    enter(&version, InstallStage::DirCreated);

    let archive_path = paths.download_path(&version, artifact.file_name());
    debug!(
        url = %artifact.tarball,
        size = artifact.size.as_deref().unwrap_or("unknown"),
        "downloading"
    );
    if let Err(e) = fetcher
        .download(&artifact.tarball, &archive_path, ARCHIVE_SIZE_LIMIT)
        .await
    {
        rollback(&version_dir);
        return Err(e);
    }
    enter(&version, InstallStage::Downloaded);

    if session.settings.verify_checksums {
        if let Err(e) = verify_checksum(&archive_path, &artifact.shasum) {
            rollback(&version_dir);
            return Err(e);
        }
        enter(&version, InstallStage::Verified);
    }

    extract_archive(&archive_path, &version_dir)?;
    let _ = std::fs::remove_file(&archive_path);
    enter(&version, InstallStage::Extracted);

    session.registry.add(version);
    session.persist()?;
    enter(&version, InstallStage::Registered);

    Ok(InstallOutcome::Installed(version))
}

/// Removes a half-created version directory. Failures are logged only.
fn rollback(version_dir: &Path) {
    if let Err(e) = std::fs::remove_dir_all(version_dir) {
        warn!(dir = %version_dir.display(), error = %e, "failed to roll back install");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::registry::Registry;
    use crate::toolchain::testing::{
        FakeFetcher, fetcher_for, index_for, session_in, tarball_url, toolchain_tar_gz,
    };

    fn v(s: &str) -> VersionId {
        s.parse().unwrap()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn install_extracts_and_registers() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        let index = index_for(&["1.0.0"]);
        let fetcher = fetcher_for(&["1.0.0"]);

        let outcome = install(&mut session, &fetcher, &index, VersionRequest::Exact(v("1.0.0")))
            .await
            .unwrap();

        assert_eq!(outcome, InstallOutcome::Installed(v("1.0.0")));
        let dir = session.paths.version_dir(&v("1.0.0"));
        assert!(dir.join("zig").is_file());
        assert!(dir.join("lib").join("std.zig").is_file());
        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".zigvm-download-"))
            .collect();
        assert!(leftovers.is_empty(), "temporary archive should be removed");

        assert_eq!(session.registry.installed(), &[v("1.0.0")]);
        assert_eq!(session.registry.current(), None);
        let on_disk = Registry::load(&session.paths.registry_file()).registry;
        assert_eq!(on_disk, session.registry);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn install_twice_is_a_no_op() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        let index = index_for(&["1.0.0"]);
        let fetcher = fetcher_for(&["1.0.0"]);
        let request = VersionRequest::Exact(v("1.0.0"));

        install(&mut session, &fetcher, &index, request).await.unwrap();
        assert_eq!(fetcher.request_count(), 1);

        let outcome = install(&mut session, &fetcher, &index, request)
            .await
            .unwrap();

        assert_eq!(outcome, InstallOutcome::AlreadyInstalled(v("1.0.0")));
        assert_eq!(fetcher.request_count(), 1, "second install must not download");
        assert_eq!(session.registry.installed(), &[v("1.0.0")]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn master_installs_newest_release() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        let index = index_for(&["0.11.0", "0.12.0"]);
        let fetcher = fetcher_for(&["0.11.0", "0.12.0"]);

        let outcome = install(&mut session, &fetcher, &index, VersionRequest::Master)
            .await
            .unwrap();

        assert_eq!(outcome.version(), v("0.12.0"));
        assert_eq!(*fetcher.requests.borrow(), vec![tarball_url("0.12.0")]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unknown_version_creates_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        let index = index_for(&["1.0.0"]);
        let fetcher = FakeFetcher::default();

        let err = install(&mut session, &fetcher, &index, VersionRequest::Exact(v("2.0.0")))
            .await
            .unwrap_err();

        assert!(matches!(err, ZigvmError::VersionNotFound { .. }));
        assert!(!session.paths.version_dir(&v("2.0.0")).exists());
        assert_eq!(fetcher.request_count(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unsupported_platform_creates_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        session.platform = crate::toolchain::platform::Platform::new("windows", "x86_64");
        let index = index_for(&["1.0.0"]);

        let err = install(
            &mut session,
            &FakeFetcher::default(),
            &index,
            VersionRequest::Exact(v("1.0.0")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ZigvmError::PlatformNotSupported { .. }));
        assert!(!session.paths.version_dir(&v("1.0.0")).exists());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_download_rolls_back_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        let index = index_for(&["1.0.0"]);
        let fetcher = FakeFetcher::default();

        let err = install(&mut session, &fetcher, &index, VersionRequest::Exact(v("1.0.0")))
            .await
            .unwrap_err();

        assert!(matches!(err, ZigvmError::HttpRequestFailed { .. }));
        assert!(!session.paths.version_dir(&v("1.0.0")).exists());
        assert!(session.registry.installed().is_empty());
        assert!(!session.paths.registry_file().exists());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn oversized_download_rolls_back_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        let index = index_for(&["1.0.0"]);
        let archive = toolchain_tar_gz("1.0.0");
        let max_body = archive.len() as u64 - 1;
        let fetcher = FakeFetcher::default()
            .with(&tarball_url("1.0.0"), archive)
            .with_max_body(max_body);

        let err = install(&mut session, &fetcher, &index, VersionRequest::Exact(v("1.0.0")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ZigvmError::ResponseTooLarge { ref url, limit } if *url == tarball_url("1.0.0") && limit == max_body
        ));
        assert!(!session.paths.version_dir(&v("1.0.0")).exists());
        assert!(session.registry.installed().is_empty());
        assert!(!session.paths.registry_file().exists());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn checksum_mismatch_rolls_back_when_enabled() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        session.settings.verify_checksums = true;
        let index = index_for(&["1.0.0"]);
        let fetcher = FakeFetcher::default().with(&tarball_url("1.0.0"), toolchain_tar_gz("9.9.9"));

        let err = install(&mut session, &fetcher, &index, VersionRequest::Exact(v("1.0.0")))
            .await
            .unwrap_err();

        assert!(matches!(err, ZigvmError::ChecksumMismatch { .. }));
        assert!(!session.paths.version_dir(&v("1.0.0")).exists());
        assert!(session.registry.installed().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn checksum_is_ignored_by_default() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        let index = index_for(&["1.0.0"]);
        let fetcher = FakeFetcher::default().with(&tarball_url("1.0.0"), toolchain_tar_gz("9.9.9"));

        let outcome = install(&mut session, &fetcher, &index, VersionRequest::Exact(v("1.0.0")))
            .await
            .unwrap();

        assert_eq!(outcome, InstallOutcome::Installed(v("1.0.0")));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn checksum_match_installs_when_enabled() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        session.settings.verify_checksums = true;
        let index = index_for(&["1.0.0"]);
        let fetcher = fetcher_for(&["1.0.0"]);

        let outcome = install(&mut session, &fetcher, &index, VersionRequest::Exact(v("1.0.0")))
            .await
            .unwrap();

        assert_eq!(outcome, InstallOutcome::Installed(v("1.0.0")));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_extraction_keeps_directory_and_skips_registry() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        let index = index_for(&["1.0.0"]);
        let fetcher =
            FakeFetcher::default().with(&tarball_url("1.0.0"), b"not an archive".to_vec());

        let err = install(&mut session, &fetcher, &index, VersionRequest::Exact(v("1.0.0")))
            .await
            .unwrap_err();

        assert!(matches!(err, ZigvmError::ExtractionFailed { .. }));
        assert!(session.paths.version_dir(&v("1.0.0")).exists());
        assert!(session.registry.installed().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn existing_unregistered_directory_is_left_alone() {
        let temp = assert_fs::TempDir::new().unwrap();
        let mut session = session_in(temp.path());
        let index = index_for(&["1.0.0"]);
        let fetcher = fetcher_for(&["1.0.0"]);
        std::fs::create_dir_all(session.paths.version_dir(&v("1.0.0"))).unwrap();

        let outcome = install(&mut session, &fetcher, &index, VersionRequest::Exact(v("1.0.0")))
            .await
            .unwrap();

        assert_eq!(outcome, InstallOutcome::AlreadyInstalled(v("1.0.0")));
        assert_eq!(fetcher.request_count(), 0);
        assert!(session.registry.installed().is_empty());
    }
}
