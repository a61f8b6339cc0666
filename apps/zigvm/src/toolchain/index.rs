//! The remote release index.
//!
//! The index is a JSON object keyed by version string. Each entry maps
//! `"<arch>-<os>"` keys to download metadata, alongside unrelated fields:
//!
//! ```json
//! {
//!   "master": { "version": "0.14.0-dev.1+abc", "x86_64-linux": { ... } },
//!   "0.13.0": {
//!     "date": "2024-06-07",
//!     "x86_64-linux": {
//!       "tarball": "https://ziglang.org/download/0.13.0/zig-linux-x86_64-0.13.0.tar.xz",
//!       "shasum": "d45312e6...",
//!       "size": "47082308"
//!     }
//!   }
//! }
//! ```
//!
//! Only keys that parse as an exact [`VersionId`] take part in resolution;
//! the `master` entry itself is a development build and is never installed.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, ZigvmError};
use crate::toolchain::download::{Fetch, INDEX_SIZE_LIMIT};
use crate::toolchain::platform::Platform;
use crate::toolchain::settings::Settings;
use crate::toolchain::version::{VersionId, VersionRequest};

/// Download metadata for one version on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseArtifact {
    /// Archive URL.
    pub tarball: String,
    /// Hex SHA-256 of the archive.
    pub shasum: String,
    /// Archive size in bytes, as published (a decimal string).
    #[serde(default)]
    pub size: Option<String>,
}

impl ReleaseArtifact {
    /// The archive's file name, taken from the last URL path segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        let path = self
            .tarball
            .split(['?', '#'])
            .next()
            .unwrap_or(&self.tarball);
        path.rsplit('/').next().unwrap_or(path)
    }
}

/// The parsed release index.
#[derive(Debug, Clone, Default)]
pub struct RemoteIndex {
    entries: BTreeMap<String, Value>,
}

impl RemoteIndex {
    /// Parses an index document.
    ///
    /// # Errors
    ///
    /// [`ZigvmError::MalformedIndex`] if the body is not a JSON object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(ZigvmError::malformed_index)?;
        let Value::Object(map) = value else {
            return Err(ZigvmError::malformed_index("expected a JSON object"));
        };
        Ok(Self {
            entries: map.into_iter().collect(),
        })
    }

    /// All keys that parse as exact versions.
    pub fn versions(&self) -> impl Iterator<Item = VersionId> + '_ {
        self.entries.keys().filter_map(|key| key.parse().ok())
    }

    /// Looks up the artifact for `version` on `platform`.
    ///
    /// # Errors
    ///
    /// `VersionNotFound` if the index has no entry for `version`;
    /// `PlatformNotSupported` if the entry has no usable artifact for
    /// `platform`.
    pub fn metadata_for(&self, version: &VersionId, platform: Platform) -> Result<ReleaseArtifact> {
        let entry = self
            .entries
            .get(&version.to_string())
            .ok_or_else(|| ZigvmError::version_not_found(version))?;

        let key = platform.index_key();
        entry
            .get(&key)
            .and_then(|artifact| ReleaseArtifact::deserialize(artifact).ok())
            .ok_or_else(|| ZigvmError::platform_not_supported(version, key))
    }

    /// The highest exact version in the index.
    ///
    /// # Errors
    ///
    /// `NoVersionsFound` if no key parses as a version.
    pub fn latest_overall(&self) -> Result<VersionId> {
        self.versions().max().ok_or(ZigvmError::NoVersionsFound)
    }

    /// The highest patch release in the `major.minor` series.
    #[must_use]
    pub fn latest_in_series(&self, major: u64, minor: u64) -> Option<VersionId> {
        let series = VersionId::new(major, minor, 0);
        self.versions().filter(|v| v.same_series(&series)).max()
    }

    /// Turns a request into a concrete version.
    ///
    /// `master` resolves to [`RemoteIndex::latest_overall`]. Exact versions
    /// are returned as-is; whether they exist is checked by
    /// [`RemoteIndex::metadata_for`].
    ///
    /// # Errors
    ///
    /// `NoVersionsFound` when resolving `master` against an index with no
    /// exact versions.
    pub fn resolve(&self, request: VersionRequest) -> Result<VersionId> {
        match request {
            VersionRequest::Master => self.latest_overall(),
            VersionRequest::Exact(version) => Ok(version),
        }
    }
}

/// Downloads and parses the index configured in `settings`.
///
/// # Errors
///
/// Request failures, `ResponseTooLarge` above the index limit, or
/// `MalformedIndex`.
pub async fn fetch_index<F: Fetch>(fetcher: &F, settings: &Settings) -> Result<RemoteIndex> {
    let body = fetcher.fetch(&settings.index_url, INDEX_SIZE_LIMIT).await?;
    let index = RemoteIndex::from_slice(&body)?;
    debug!(
        url = %settings.index_url,
        entries = index.entries.len(),
        "fetched release index"
    );
    Ok(index)
}
