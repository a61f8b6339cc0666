//! Archive extraction for downloaded toolchains.
//!
//! Release archives wrap their contents in a single top-level folder
//! (`zig-linux-x86_64-0.13.0/zig`, `.../lib/...`). Extraction always strips
//! exactly one leading path component, so the folder's contents land directly
//! in the destination. Entries with nothing left after stripping (the folder
//! itself, or top-level files) are skipped.
//!
//! The format is chosen from the file name: `.tar.xz`/`.txz`, `.tar.gz`/`.tgz`
//! or `.zip`.

use std::io;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use xz2::read::XzDecoder;

use crate::errors::{Result, ZigvmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveFormat {
    TarXz,
    TarGz,
    Zip,
}

impl ArchiveFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();
        if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Some(Self::TarXz)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

/// Extracts `archive_path` into `dest_dir`, stripping one leading component.
///
/// `dest_dir` is created if it does not exist. Files already present in
/// `dest_dir` are overwritten.
///
/// # Errors
///
/// Returns [`ZigvmError::ExtractionFailed`] if the format is not recognized,
/// the archive is corrupt, an entry would escape `dest_dir`, or writing fails.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let format = ArchiveFormat::from_path(archive_path).ok_or_else(|| {
        ZigvmError::extraction_failed(archive_path, "unsupported archive format")
    })?;

    let result = std::fs::create_dir_all(dest_dir).and_then(|()| {
        let file = std::fs::File::open(archive_path)?;
        match format {
            ArchiveFormat::TarXz => extract_tar(XzDecoder::new(file), dest_dir),
            ArchiveFormat::TarGz => extract_tar(GzDecoder::new(file), dest_dir),
            ArchiveFormat::Zip => extract_zip(file, dest_dir),
        }
    });

    result.map_err(|e| ZigvmError::extraction_failed(archive_path, e))
}

fn extract_tar<R: io::Read>(reader: R, dest_dir: &Path) -> io::Result<()> {
    let mut archive = Archive::new(reader);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.into_owned();
        let Some(relative) = strip_first_component(&entry_path)? else {
            continue;
        };

        let output_path = dest_dir.join(&relative);
        if entry.header().entry_type().is_dir() {
            std::fs::create_dir_all(&output_path)?;
        } else {
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            entry.unpack(&output_path)?;
        }
    }

    Ok(())
}

fn extract_zip(file: std::fs::File, dest_dir: &Path) -> io::Result<()> {
    let mut archive = zip::ZipArchive::new(file).map_err(io::Error::other)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(io::Error::other)?;
        let entry_path = entry.enclosed_name().ok_or_else(|| {
            io::Error::other(format!("refusing to extract unsafe path: {}", entry.name()))
        })?;
        let Some(relative) = strip_first_component(&entry_path)? else {
            continue;
        };

        let output_path = dest_dir.join(&relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&output_path)?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut outfile = std::fs::File::create(&output_path)?;
        io::copy(&mut entry, &mut outfile)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode().filter(|mode| mode & 0o777 != 0) {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&output_path, std::fs::Permissions::from_mode(mode))?;
        }
    }

    Ok(())
}

/// Drops the leading component of an archive entry path.
///
/// Returns `Ok(None)` when nothing is left. Absolute paths and paths with
/// `..` are rejected so no entry can be written outside the destination.
fn strip_first_component(path: &Path) -> io::Result<Option<PathBuf>> {
    if path.is_absolute()
        || path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        })
    {
        return Err(io::Error::other(format!(
            "refusing to extract path with parent directory or absolute reference: {}",
            path.display()
        )));
    }

    let rest: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .skip(1)
        .collect();

    if rest.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(rest))
    }
}
