//! Path management for the zigvm toolchain.
//!
//! The default root directory is `~/.zigvm/` (`%APPDATA%\zigvm` on Windows),
//! which can be overridden by setting the `ZIGVM_HOME` environment variable.
//!
//! ## Directory Structure
//!
//! ```text
//! ~/.zigvm/                     # Root directory (or ZIGVM_HOME)
//!   config.json                 # Registry: installed versions + current
//!   settings.toml               # Optional user settings
//!   versions/                   # Installed toolchain versions
//!     0.13.0/                   # Extracted archive contents
//!       zig
//!       lib/
//!       .zigvm-download-*       # Transient archive, removed after extraction
//!     0.12.1/
//!       ...
//! ```

use std::path::PathBuf;

use crate::errors::{Result, ZigvmError};
use crate::toolchain::platform::Platform;
use crate::toolchain::version::VersionId;

/// Environment variable to override the default root directory.
pub const ZIGVM_HOME_ENV: &str = "ZIGVM_HOME";

/// Registry file name under the root.
const REGISTRY_FILE: &str = "config.json";

/// Settings file name under the root.
const SETTINGS_FILE: &str = "settings.toml";

/// Prefix for the archive downloaded into a version directory.
const DOWNLOAD_PREFIX: &str = ".zigvm-download-";

/// Manages paths for toolchain installations.
#[derive(Debug, Clone)]
pub struct ToolchainPaths {
    /// Root directory for all zigvm data (`~/.zigvm` or `ZIGVM_HOME`).
    pub root: PathBuf,
    /// Directory containing one subdirectory per installed version.
    pub versions: PathBuf,
}

impl ToolchainPaths {
    /// Creates a new `ToolchainPaths` instance.
    ///
    /// The root directory is determined by:
    /// 1. The `ZIGVM_HOME` environment variable if set and non-empty
    /// 2. On Windows: `%APPDATA%\zigvm`
    /// 3. Elsewhere: `~/.zigvm` in the user's home directory
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        if let Ok(home) = std::env::var(ZIGVM_HOME_ENV)
            && !home.trim().is_empty()
        {
            return Ok(Self::with_root(PathBuf::from(home)));
        }

        let not_found = || {
            ZigvmError::io(
                format!("Cannot determine home directory. Set {ZIGVM_HOME_ENV} environment variable"),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            )
        };

        #[cfg(windows)]
        let root = dirs::data_dir().ok_or_else(not_found)?.join("zigvm");
        #[cfg(not(windows))]
        let root = dirs::home_dir().ok_or_else(not_found)?.join(".zigvm");

        Ok(Self::with_root(root))
    }

    /// Creates a new `ToolchainPaths` instance with a specific root directory.
    #[must_use = "returns new paths instance without side effects"]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            versions: root.join("versions"),
            root,
        }
    }

    /// Returns the path to the registry file.
    #[must_use = "returns the path without side effects"]
    pub fn registry_file(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    /// Returns the path to the user settings file.
    #[must_use = "returns the path without side effects"]
    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    /// Returns the path to a specific version's installation directory.
    #[must_use = "returns the path without side effects"]
    pub fn version_dir(&self, version: &VersionId) -> PathBuf {
        self.versions.join(version.to_string())
    }

    /// Returns the path to the compiler executable within a version directory.
    #[must_use = "returns the path without side effects"]
    pub fn executable_path(&self, version: &VersionId, platform: Platform) -> PathBuf {
        self.version_dir(version).join(platform.executable_name())
    }

    /// Returns the path the archive for `version` is downloaded to.
    ///
    /// The archive's own file name is kept as a suffix so the extractor can
    /// pick the format from it.
    #[must_use = "returns the path without side effects"]
    pub fn download_path(&self, version: &VersionId, archive_name: &str) -> PathBuf {
        self.version_dir(version)
            .join(format!("{DOWNLOAD_PREFIX}{archive_name}"))
    }

    /// Checks whether the directory for a version exists on disk.
    ///
    /// This is independent of registry membership; the two can drift.
    #[must_use = "returns installation status without side effects"]
    pub fn has_version_dir(&self, version: &VersionId) -> bool {
        self.version_dir(version).is_dir()
    }

    /// Ensures the root and versions directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.root, &self.versions] {
            std::fs::create_dir_all(dir).map_err(|e| {
                ZigvmError::io(format!("Failed to create directory {}", dir.display()), e)
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn paths_with_root() {
        let temp_dir = env::temp_dir().join("zigvm_test_home");
        let paths = ToolchainPaths::with_root(temp_dir.clone());

        assert_eq!(paths.root, temp_dir);
        assert_eq!(paths.versions, temp_dir.join("versions"));
        assert_eq!(paths.registry_file(), temp_dir.join("config.json"));
        assert_eq!(paths.settings_file(), temp_dir.join("settings.toml"));
    }

    #[test]
    fn version_dir_uses_display_form() {
        let temp_dir = env::temp_dir().join("zigvm_test_version_dir");
        let paths = ToolchainPaths::with_root(temp_dir.clone());

        assert_eq!(
            paths.version_dir(&VersionId::new(0, 13, 0)),
            temp_dir.join("versions").join("0.13.0")
        );
    }

    #[test]
    fn executable_path_follows_platform() {
        let temp_dir = env::temp_dir().join("zigvm_test_exe");
        let paths = ToolchainPaths::with_root(temp_dir.clone());
        let version = VersionId::new(0, 11, 0);

        assert_eq!(
            paths.executable_path(&version, Platform::new("linux", "x86_64")),
            temp_dir.join("versions").join("0.11.0").join("zig")
        );
        assert_eq!(
            paths.executable_path(&version, Platform::new("windows", "x86_64")),
            temp_dir.join("versions").join("0.11.0").join("zig.exe")
        );
    }

    #[test]
    fn download_path_lives_inside_version_dir() {
        let temp_dir = env::temp_dir().join("zigvm_test_download");
        let paths = ToolchainPaths::with_root(temp_dir.clone());
        let version = VersionId::new(0, 12, 0);

        let path = paths.download_path(&version, "zig-linux-x86_64-0.12.0.tar.xz");
        assert_eq!(path.parent(), Some(paths.version_dir(&version).as_path()));
        assert!(path.to_string_lossy().ends_with(".tar.xz"));
    }

    #[test]
    fn has_version_dir_false_for_nonexistent() {
        let temp = assert_fs::TempDir::new().unwrap();
        let paths = ToolchainPaths::with_root(temp.path().to_path_buf());

        assert!(!paths.has_version_dir(&VersionId::new(0, 1, 0)));
    }

    #[test]
    #[serial_test::serial]
    fn new_prefers_zigvm_home_env() {
        let temp = assert_fs::TempDir::new().unwrap();

        // SAFETY: serialized with the other environment-mutating tests.
        unsafe {
            env::set_var(ZIGVM_HOME_ENV, temp.path());
        }
        let paths = ToolchainPaths::new();
        // SAFETY: Cleanup - restoring previous state
        unsafe {
            env::remove_var(ZIGVM_HOME_ENV);
        }

        assert_eq!(paths.unwrap().root, temp.path());
    }
}
