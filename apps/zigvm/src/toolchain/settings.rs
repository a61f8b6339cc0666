//! User settings for zigvm.
//!
//! Settings come from an optional `settings.toml` in the zigvm root, with
//! environment variables taking precedence:
//!
//! ```toml
//! index_url = "https://ziglang.org/download/index.json"
//! verify_checksums = false
//! ```
//!
//! - `ZIGVM_INDEX_URL` overrides `index_url` (empty or whitespace-only values
//!   are treated as unset).

use std::path::Path;

use serde::Deserialize;

use crate::errors::{Result, ZigvmError};

/// Environment variable to override the release index URL.
pub const INDEX_URL_ENV: &str = "ZIGVM_INDEX_URL";

/// Default release index URL.
pub const DEFAULT_INDEX_URL: &str = "https://ziglang.org/download/index.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// URL of the JSON release index.
    pub index_url: String,
    /// Compare downloaded archives against the index's `shasum`.
    pub verify_checksums: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            verify_checksums: false,
        }
    }
}

impl Settings {
    /// Loads settings from `path` and applies environment overrides.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings = Self::from_file(path)?;
        if let Some(url) = env_override(INDEX_URL_ENV) {
            settings.index_url = url;
        }
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ZigvmError::io(
                    format!("Failed to read settings from {}", path.display()),
                    e,
                ));
            }
        };

        toml::from_str(&content).map_err(|e| {
            ZigvmError::io(
                format!("Invalid settings in {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
            )
        })
    }
}

/// Reads an environment variable, ignoring empty or whitespace-only values.
fn env_override(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
