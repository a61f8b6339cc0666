//! In-memory fixtures shared by the engine tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::errors::{Result, ZigvmError};
use crate::toolchain::download::Fetch;
use crate::toolchain::index::RemoteIndex;
use crate::toolchain::paths::ToolchainPaths;
use crate::toolchain::platform::Platform;
use crate::toolchain::session::Session;
use crate::toolchain::settings::Settings;

pub const LINUX: Platform = Platform::new("linux", "x86_64");

/// Serves canned responses and records every URL requested.
#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, Vec<u8>>,
    max_body: Option<u64>,
    pub requests: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn with(mut self, url: &str, body: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), body);
        self
    }

    /// Caps every size limit at `max_body` bytes.
    pub fn with_max_body(mut self, max_body: u64) -> Self {
        self.max_body = Some(max_body);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn respond(&self, url: &str, limit: u64) -> Result<Vec<u8>> {
        self.requests.borrow_mut().push(url.to_string());
        let limit = self.max_body.map_or(limit, |max| max.min(limit));
        let body = self
            .responses
            .get(url)
            .cloned()
            .ok_or_else(|| ZigvmError::http_request_failed(url, "HTTP 404 Not Found"))?;
        if body.len() as u64 > limit {
            return Err(ZigvmError::response_too_large(url, limit));
        }
        Ok(body)
    }
}

impl Fetch for FakeFetcher {
    async fn fetch(&self, url: &str, limit: u64) -> Result<Vec<u8>> {
        self.respond(url, limit)
    }

    async fn download(&self, url: &str, dest: &Path, limit: u64) -> Result<u64> {
        let body = self.respond(url, limit)?;
        std::fs::write(dest, &body)
            .map_err(|e| ZigvmError::io(format!("Failed to write {}", dest.display()), e))?;
        Ok(body.len() as u64)
    }
}

/// URL the fixtures publish the archive for `version` under.
pub fn tarball_url(version: &str) -> String {
    format!("https://example.test/{version}/zig-linux-x86_64-{version}.tar.gz")
}

/// A `.tar.gz` shaped like a release: one top-level folder holding a `zig`
/// script that reports `version`.
pub fn toolchain_tar_gz(version: &str) -> Vec<u8> {
    let root = format!("zig-linux-x86_64-{version}");
    let script = format!("#!/bin/sh\necho {version}\n");

    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, content, mode) in [
        (format!("{root}/zig"), script.as_bytes(), 0o755),
        (format!("{root}/lib/std.zig"), b"pub const x = 1;\n".as_slice(), 0o644),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        builder.append_data(&mut header, path, content).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// An index listing `versions` for `x86_64-linux`, plus a `master` entry.
pub fn index_for(versions: &[&str]) -> RemoteIndex {
    let mut map = serde_json::Map::new();
    map.insert(
        "master".to_string(),
        serde_json::json!({ "version": "9.9.9-dev.1+abc" }),
    );
    for version in versions {
        map.insert(
            (*version).to_string(),
            serde_json::json!({
                "x86_64-linux": {
                    "tarball": tarball_url(version),
                    "shasum": sha256_hex(&toolchain_tar_gz(version)),
                }
            }),
        );
    }
    RemoteIndex::from_slice(&serde_json::to_vec(&serde_json::Value::Object(map)).unwrap())
        .unwrap()
}

/// A fetcher serving the archives for `versions`.
pub fn fetcher_for(versions: &[&str]) -> FakeFetcher {
    versions.iter().fold(FakeFetcher::default(), |fetcher, version| {
        fetcher.with(&tarball_url(version), toolchain_tar_gz(version))
    })
}

pub fn session_in(root: &Path) -> Session {
    Session::with_parts(
        ToolchainPaths::with_root(root.to_path_buf()),
        Settings::default(),
        LINUX,
    )
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(bytes))
}
