//! SHA-256 verification of downloaded archives.
//!
//! Only used when `verify_checksums` is enabled in the settings.

use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::errors::{Result, ZigvmError};

/// Verifies that a file matches the expected SHA-256 checksum.
///
/// `expected` is compared case-insensitively.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or
/// [`ZigvmError::ChecksumMismatch`] if the digest differs.
pub fn verify_checksum(file_path: &Path, expected: &str) -> Result<()> {
    let computed = compute_sha256(file_path)?;
    let expected = expected.trim().to_ascii_lowercase();

    if computed != expected {
        return Err(ZigvmError::ChecksumMismatch {
            archive: file_path.to_path_buf(),
            expected,
            actual: computed,
        });
    }

    Ok(())
}

/// Computes the SHA-256 of a file as a lowercase hex string.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn compute_sha256(file_path: &Path) -> Result<String> {
    let read_error = |e| {
        ZigvmError::io(
            format!("Failed to read file for checksum: {}", file_path.display()),
            e,
        )
    };

    let mut file = std::fs::File::open(file_path).map_err(read_error)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(read_error)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA-256 of "hello world"
    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn compute_sha256_produces_correct_hash() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.path().join("archive.tar.xz");
        std::fs::write(&file, b"hello world").unwrap();

        assert_eq!(compute_sha256(&file).unwrap(), HELLO_SHA256);
    }

    #[test]
    fn verify_checksum_accepts_uppercase_expected() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.path().join("archive.tar.xz");
        std::fs::write(&file, b"hello world").unwrap();

        verify_checksum(&file, &HELLO_SHA256.to_uppercase()).unwrap();
    }

    #[test]
    fn verify_checksum_reports_mismatch() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.path().join("archive.tar.xz");
        std::fs::write(&file, b"tampered").unwrap();

        let err = verify_checksum(&file, HELLO_SHA256).unwrap_err();
        match err {
            ZigvmError::ChecksumMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, HELLO_SHA256);
                assert_ne!(actual, HELLO_SHA256);
            }
            other => panic!("expected ChecksumMismatch, got {other:?}"),
        }
    }

    #[test]
    fn compute_sha256_fails_for_missing_file() {
        let err = compute_sha256(Path::new("/nonexistent/zigvm/archive")).unwrap_err();
        assert!(matches!(err, ZigvmError::Io { .. }));
    }
}
