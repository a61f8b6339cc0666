//! Per-invocation context.
//!
//! A [`Session`] bundles everything an operation needs: where zigvm keeps its
//! files, the user's settings, the running platform and the loaded registry.
//! Commands build exactly one session, hand it to the engine by reference and
//! persist it after a mutation.

use tracing::warn;

use crate::errors::Result;
use crate::toolchain::paths::ToolchainPaths;
use crate::toolchain::platform::Platform;
use crate::toolchain::registry::Registry;
use crate::toolchain::settings::Settings;

#[derive(Debug)]
pub struct Session {
    pub paths: ToolchainPaths,
    pub settings: Settings,
    pub platform: Platform,
    pub registry: Registry,
}

impl Session {
    /// Opens the session for the default root (`ZIGVM_HOME` or `~/.zigvm`).
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be determined or the settings
    /// file is invalid. A damaged registry is not an error; it is reported
    /// as a warning and replaced by an empty one.
    pub fn open() -> Result<Self> {
        let paths = ToolchainPaths::new()?;
        let settings = Settings::load(&paths.settings_file())?;
        Ok(Self::with_parts(paths, settings, Platform::detect()))
    }

    /// Builds a session from explicit parts and loads the registry.
    #[must_use]
    pub fn with_parts(paths: ToolchainPaths, settings: Settings, platform: Platform) -> Self {
        let loaded = Registry::load(&paths.registry_file());
        if let Some(recovery) = &loaded.recovered {
            warn!("{recovery}");
        }

        Self {
            paths,
            settings,
            platform,
            registry: loaded.registry,
        }
    }

    /// Rewrites the registry file from the in-memory registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn persist(&self) -> Result<()> {
        self.registry.save(&self.paths.registry_file())
    }
}
