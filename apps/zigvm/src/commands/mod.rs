//! Command modules for the zigvm CLI.
//!
//! Each command opens one [`Session`](crate::toolchain::Session), runs a
//! single engine operation and prints the result.
//!
//! ## Version Management Commands
//!
//! - [`install`] - Install a version or `master`
//! - [`use_cmd`] - Select the current version
//! - [`list`] - List installed versions
//! - [`remove`] - Remove an installed version
//! - [`rename`] - Rename an installed version
//! - [`update`] - Install the newest patch of a series
//!
//! ## Other Commands
//!
//! - [`version`] - Display version information
//! - [`passthrough`] - Forward unrecognized commands to the current `zig`

pub mod install;
pub mod list;
pub mod passthrough;
pub mod remove;
pub mod rename;
pub mod update;
pub mod use_cmd;
pub mod version;
