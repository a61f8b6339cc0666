//! Version state engine for the zigvm CLI.
//!
//! Everything that reads or changes installed toolchains lives here; the
//! command layer only parses arguments and prints results.
//!
//! ## Module Structure
//!
//! - [`version`] - `major.minor.patch` identifiers and the `master` alias
//! - [`registry`] - Persisted list of installed versions and the current one
//! - [`index`] - Remote release index parsing and resolution
//! - [`download`] - HTTP fetch and streamed download
//! - [`verify`] - SHA256 checksum verification
//! - [`archive`] - tar.xz, tar.gz and ZIP extraction
//! - [`installer`] - The install sequence with rollback
//! - [`lifecycle`] - Remove, rename, use and update
//! - [`proxy`] - Forwarding invocations to the current `zig`
//! - [`session`] - Per-invocation context
//! - [`settings`], [`paths`], [`platform`] - Configuration and environment

pub mod archive;
pub mod download;
pub mod index;
pub mod installer;
pub mod lifecycle;
pub mod paths;
pub mod platform;
pub mod proxy;
pub mod registry;
pub mod session;
pub mod settings;
pub mod verify;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;

pub use download::HttpFetcher;
pub use index::fetch_index;
pub use installer::{InstallOutcome, install};
pub use lifecycle::UpdateOutcome;
pub use platform::Platform;
pub use session::Session;
pub use version::{VersionId, VersionRequest};
