//! The persisted version registry.
//!
//! The registry records which versions are installed (in installation order)
//! and which one is current. It lives in `<root>/config.json`:
//!
//! ```json
//! {
//!   "current_version": "0.13.0",
//!   "installed_versions": ["0.11.0", "0.13.0"]
//! }
//! ```
//!
//! Loading never fails: a missing or empty file is an empty registry, and a
//! file that cannot be read or parsed is replaced by an empty registry with a
//! [`Recovery`] describing what was discarded.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZigvmError};
use crate::toolchain::version::VersionId;

/// Installed versions and the current selection.
///
/// Invariant: `current`, when set, is an element of `installed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(rename = "current_version", default)]
    current: Option<VersionId>,
    #[serde(rename = "installed_versions", default)]
    installed: Vec<VersionId>,
}

/// Why a registry file was not taken at face value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// The file exists but could not be read.
    Unreadable { path: PathBuf, reason: String },
    /// The file is not a valid registry document; its content was discarded.
    Malformed { path: PathBuf, reason: String },
    /// `current_version` named a version missing from `installed_versions`
    /// and was cleared.
    DanglingCurrent { version: VersionId },
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { path, reason } => write!(
                f,
                "could not read {} ({reason}); starting with an empty registry",
                path.display()
            ),
            Self::Malformed { path, reason } => write!(
                f,
                "{} is not a valid registry ({reason}); starting with an empty registry",
                path.display()
            ),
            Self::DanglingCurrent { version } => write!(
                f,
                "current version {version} is not installed; no version is selected"
            ),
        }
    }
}

/// The result of [`Registry::load`].
#[derive(Debug)]
pub struct Loaded {
    pub registry: Registry,
    pub recovered: Option<Recovery>,
}

impl Registry {
    /// Reads the registry at `path`.
    #[must_use]
    pub fn load(path: &Path) -> Loaded {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Loaded {
                    registry: Self::default(),
                    recovered: None,
                };
            }
            Err(e) => {
                return Loaded {
                    registry: Self::default(),
                    recovered: Some(Recovery::Unreadable {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    }),
                };
            }
        };

        if content.trim().is_empty() {
            return Loaded {
                registry: Self::default(),
                recovered: None,
            };
        }

        let mut registry: Self = match serde_json::from_str(&content) {
            Ok(registry) => registry,
            Err(e) => {
                return Loaded {
                    registry: Self::default(),
                    recovered: Some(Recovery::Malformed {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    }),
                };
            }
        };

        // Hand-edited files may repeat an entry; keep the first occurrence.
        let mut seen = Vec::with_capacity(registry.installed.len());
        registry.installed.retain(|v| {
            if seen.contains(v) {
                false
            } else {
                seen.push(*v);
                true
            }
        });

        let recovered = match registry.current {
            Some(current) if !registry.contains(&current) => {
                registry.current = None;
                Some(Recovery::DanglingCurrent { version: current })
            }
            _ => None,
        };

        Loaded {
            registry,
            recovered,
        }
    }

    /// Writes the registry to `path`, replacing the whole file.
    ///
    /// The document is written to a sibling temporary file first and then
    /// renamed over `path`, so readers see either the old or the new content.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the write or the rename fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ZigvmError::io(format!("Failed to create directory {}", parent.display()), e)
            })?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|e| {
            ZigvmError::io(
                "Failed to serialize registry",
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, content + "\n").map_err(|e| {
            ZigvmError::io(format!("Failed to write {}", temp_path.display()), e)
        })?;
        std::fs::rename(&temp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            ZigvmError::io(format!("Failed to replace {}", path.display()), e)
        })
    }

    #[must_use]
    pub fn current(&self) -> Option<VersionId> {
        self.current
    }

    /// Installed versions in installation order.
    #[must_use]
    pub fn installed(&self) -> &[VersionId] {
        &self.installed
    }

    #[must_use]
    pub fn contains(&self, version: &VersionId) -> bool {
        self.installed.contains(version)
    }

    #[must_use]
    pub fn is_current(&self, version: &VersionId) -> bool {
        self.current.as_ref() == Some(version)
    }

    /// Appends `version` unless it is already present. Returns whether it
    /// was added.
    pub fn add(&mut self, version: VersionId) -> bool {
        if self.contains(&version) {
            return false;
        }
        self.installed.push(version);
        true
    }

    /// Removes `version`, clearing `current` if it pointed there. Returns
    /// whether an entry was removed.
    pub fn remove(&mut self, version: &VersionId) -> bool {
        if self.is_current(version) {
            self.current = None;
        }
        let before = self.installed.len();
        self.installed.retain(|v| v != version);
        self.installed.len() != before
    }

    /// Replaces `old` with `new` at the same position and repoints `current`.
    ///
    /// # Errors
    ///
    /// `VersionNotInstalled` if `old` is absent, `VersionAlreadyExists` if
    /// `new` is present.
    pub fn rename(&mut self, old: &VersionId, new: VersionId) -> Result<()> {
        self.check_renamable(old, &new)?;
        if let Some(slot) = self.installed.iter_mut().find(|v| *v == old) {
            *slot = new;
        }
        if self.is_current(old) {
            self.current = Some(new);
        }
        Ok(())
    }

    /// Checks the preconditions of [`Registry::rename`] without mutating.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::rename`].
    pub fn check_renamable(&self, old: &VersionId, new: &VersionId) -> Result<()> {
        if !self.contains(old) {
            return Err(ZigvmError::version_not_installed(old));
        }
        if self.contains(new) {
            return Err(ZigvmError::version_already_exists(new));
        }
        Ok(())
    }

    /// Selects `version` as current.
    ///
    /// # Errors
    ///
    /// `VersionNotInstalled` if `version` is absent.
    pub fn set_current(&mut self, version: VersionId) -> Result<()> {
        if !self.contains(&version) {
            return Err(ZigvmError::version_not_installed(version));
        }
        self.current = Some(version);
        Ok(())
    }
}
