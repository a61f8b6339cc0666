//! Toolchain version identifiers.
//!
//! A [`VersionId`] is an exact `major.minor.patch` triple. Requests coming
//! from the command line are [`VersionRequest`]s, which additionally accept
//! the `master` alias; an alias is always resolved against the remote index
//! before anything is stored or compared.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{Result, ZigvmError};

/// The symbolic alias for the newest release in the index.
pub const MASTER_ALIAS: &str = "master";

/// An exact toolchain version.
///
/// Ordering is lexicographic over `(major, minor, patch)`; field order makes
/// the derived implementation do exactly that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionId {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionId {
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Returns whether `other` belongs to the same `major.minor` series.
    #[must_use]
    pub fn same_series(&self, other: &Self) -> bool {
        self.major == other.major && self.minor == other.minor
    }
}

impl FromStr for VersionId {
    type Err = ZigvmError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('.');
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ZigvmError::invalid_version(s));
        };

        Ok(Self {
            major: parse_component(major, s)?,
            minor: parse_component(minor, s)?,
            patch: parse_component(patch, s)?,
        })
    }
}

/// Parses one numeric component. `u64::from_str` alone would accept a
/// leading `+`, so the digit check comes first.
fn parse_component(part: &str, input: &str) -> Result<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ZigvmError::invalid_version(input));
    }
    part.parse().map_err(|_| ZigvmError::invalid_version(input))
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for VersionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A version as requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionRequest {
    /// The newest release in the remote index.
    Master,
    /// An exact version.
    Exact(VersionId),
}

impl FromStr for VersionRequest {
    type Err = ZigvmError;

    fn from_str(s: &str) -> Result<Self> {
        if s == MASTER_ALIAS {
            Ok(Self::Master)
        } else {
            s.parse().map(Self::Exact)
        }
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Master => f.write_str(MASTER_ALIAS),
            Self::Exact(version) => version.fmt(f),
        }
    }
}
