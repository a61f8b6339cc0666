//! Error types for the zigvm CLI.
//!
//! `ZigvmError` carries every failure the version state engine can report.
//! The toolchain modules return it directly; the command layer wraps it in
//! `anyhow::Error` and `main` downcasts to pick the exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the toolchain modules.
pub type Result<T, E = ZigvmError> = std::result::Result<T, E>;

/// Consolidated error type for zigvm operations.
#[derive(Debug, Error)]
pub enum ZigvmError {
    /// The string is not an exact `major.minor.patch` triple.
    #[error("invalid version '{input}': expected MAJOR.MINOR.PATCH")]
    InvalidVersion {
        /// The rejected input.
        input: String,
    },

    /// The version is not present in the registry.
    #[error("version {version} is not installed")]
    VersionNotInstalled {
        /// The requested version.
        version: String,
    },

    /// The version is already present in the registry.
    #[error("version {version} already exists")]
    VersionAlreadyExists {
        /// The conflicting version.
        version: String,
    },

    /// The remote index has no entry for the version.
    #[error("version {version} not found in the release index")]
    VersionNotFound {
        /// The requested version.
        version: String,
    },

    /// The remote index lists the version, but not for this platform.
    #[error("version {version} is not available for platform {platform}")]
    PlatformNotSupported {
        /// The requested version.
        version: String,
        /// The `<arch>-<os>` key that was looked up.
        platform: String,
    },

    /// Resolution produced no candidate version.
    #[error("no versions found")]
    NoVersionsFound,

    /// The HTTP request could not be completed.
    #[error("request to {url} failed: {reason}")]
    HttpRequestFailed {
        /// The requested URL.
        url: String,
        /// Transport error or HTTP status.
        reason: String,
    },

    /// The response body exceeded the allowed size.
    #[error("response from {url} exceeds the {limit} byte limit")]
    ResponseTooLarge {
        /// The requested URL.
        url: String,
        /// The limit that was exceeded.
        limit: u64,
    },

    /// The remote index could not be parsed.
    #[error("malformed release index: {reason}")]
    MalformedIndex {
        /// Parser diagnostic.
        reason: String,
    },

    /// The archive could not be unpacked.
    #[error("failed to extract {}: {reason}", archive.display())]
    ExtractionFailed {
        /// The archive being extracted.
        archive: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The downloaded archive does not match the published checksum.
    #[error("checksum mismatch for {}: expected {expected}, got {actual}", archive.display())]
    ChecksumMismatch {
        /// The downloaded archive.
        archive: PathBuf,
        /// The checksum published in the index.
        expected: String,
        /// The checksum of the downloaded file.
        actual: String,
    },

    /// Proxy dispatch was requested with no current version.
    #[error("no version selected. Run 'zigvm use <version>' to select one")]
    NoVersionSelected,

    /// The current version's executable is missing.
    #[error(
        "installation of {version} looks corrupted: {} does not exist. \
         Run 'zigvm remove {version}' and 'zigvm install {version}' to reinstall it",
        path.display()
    )]
    CorruptedInstallation {
        /// The current version.
        version: String,
        /// The expected executable path.
        path: PathBuf,
    },

    /// Filesystem error with context.
    #[error("{message}")]
    Io {
        /// Description of the operation that failed.
        message: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A forwarded process exited with a non-zero code.
    ///
    /// The child already wrote its own diagnostics, so `main` exits with the
    /// code without printing anything further.
    #[error("process exited with code {code}")]
    ProcessExitCode {
        /// The exit code to propagate.
        code: i32,
    },
}

impl ZigvmError {
    /// Creates a new `InvalidVersion` error.
    #[must_use]
    pub fn invalid_version(input: impl Into<String>) -> Self {
        Self::InvalidVersion {
            input: input.into(),
        }
    }

    /// Creates a new `VersionNotInstalled` error.
    #[must_use]
    pub fn version_not_installed(version: impl ToString) -> Self {
        Self::VersionNotInstalled {
            version: version.to_string(),
        }
    }

    /// Creates a new `VersionAlreadyExists` error.
    #[must_use]
    pub fn version_already_exists(version: impl ToString) -> Self {
        Self::VersionAlreadyExists {
            version: version.to_string(),
        }
    }

    /// Creates a new `VersionNotFound` error.
    #[must_use]
    pub fn version_not_found(version: impl ToString) -> Self {
        Self::VersionNotFound {
            version: version.to_string(),
        }
    }

    /// Creates a new `PlatformNotSupported` error.
    #[must_use]
    pub fn platform_not_supported(version: impl ToString, platform: impl Into<String>) -> Self {
        Self::PlatformNotSupported {
            version: version.to_string(),
            platform: platform.into(),
        }
    }

    /// Creates a new `HttpRequestFailed` error.
    #[must_use]
    pub fn http_request_failed(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::HttpRequestFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a new `ResponseTooLarge` error.
    #[must_use]
    pub fn response_too_large(url: impl Into<String>, limit: u64) -> Self {
        Self::ResponseTooLarge {
            url: url.into(),
            limit,
        }
    }

    /// Creates a new `MalformedIndex` error.
    #[must_use]
    pub fn malformed_index(reason: impl ToString) -> Self {
        Self::MalformedIndex {
            reason: reason.to_string(),
        }
    }

    /// Creates a new `ExtractionFailed` error.
    #[must_use]
    pub fn extraction_failed(archive: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ExtractionFailed {
            archive: archive.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a new `IoError` from an I/O error with context.
    #[must_use]
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Creates a new `ProcessExitCode` error.
    #[must_use]
    pub const fn process_exit_code(code: i32) -> Self {
        Self::ProcessExitCode { code }
    }
}
