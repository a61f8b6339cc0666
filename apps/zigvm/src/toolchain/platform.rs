//! Platform detection for the zigvm toolchain.
//!
//! The release index keys artifacts by `"<arch>-<os>"` (e.g. `x86_64-linux`,
//! `aarch64-macos`, `x86_64-windows`). This module maps the compile-time
//! target onto those names.

use std::fmt;

/// An OS and architecture pair as named by the release index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    os: &'static str,
    arch: &'static str,
}

impl Platform {
    /// Detects the current platform from the compile-time target.
    ///
    /// Unknown combinations are passed through verbatim; whether the index
    /// has artifacts for them is decided at lookup time.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(current_os(), current_arch())
    }

    /// Creates a platform from explicit index names.
    #[must_use]
    pub const fn new(os: &'static str, arch: &'static str) -> Self {
        Self { os, arch }
    }

    #[must_use]
    pub fn os(self) -> &'static str {
        self.os
    }

    #[must_use]
    pub fn arch(self) -> &'static str {
        self.arch
    }

    /// Returns the key used for this platform inside a release index entry.
    #[must_use = "returns the key without side effects"]
    pub fn index_key(self) -> String {
        format!("{}-{}", self.arch, self.os)
    }

    /// Returns whether this platform is Windows.
    #[must_use = "returns platform check result without side effects"]
    pub fn is_windows(self) -> bool {
        self.os == "windows"
    }

    /// Returns the executable file extension for this platform.
    ///
    /// Returns `.exe` on Windows, empty string elsewhere.
    #[must_use = "returns the extension string without side effects"]
    pub fn executable_extension(self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }

    /// Returns the file name of the compiler executable on this platform.
    #[must_use]
    pub fn executable_name(self) -> String {
        format!("zig{}", self.executable_extension())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}

/// The index's name for the running OS.
fn current_os() -> &'static str {
    match std::env::consts::OS {
        "macos" | "ios" => "macos",
        other => other,
    }
}

/// The index's name for the running architecture.
fn current_arch() -> &'static str {
    match std::env::consts::ARCH {
        "powerpc64" if cfg!(target_endian = "little") => "powerpc64le",
        other => other,
    }
}
