//! HTTP access for the zigvm toolchain.
//!
//! [`Fetch`] is the seam between the version engine and the network: the
//! installer and index lookup are generic over it, and [`HttpFetcher`] is
//! the `reqwest`-backed implementation used by the CLI.
//!
//! Requests are made once. There are no retries and no timeouts; a failed
//! request surfaces as [`ZigvmError::HttpRequestFailed`] immediately.

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::time::Instant;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::errors::{Result, ZigvmError};

/// Upper bound for the release index body.
pub const INDEX_SIZE_LIMIT: u64 = 16 * 1024 * 1024;

/// Upper bound for a downloaded toolchain archive.
pub const ARCHIVE_SIZE_LIMIT: u64 = 1024 * 1024 * 1024;

/// Minimum interval between progress updates in milliseconds.
const CLI_PROGRESS_INTERVAL_MS: u128 = 250;

/// HTTP GET primitives used by the version engine.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// Fetches `url` into memory.
    ///
    /// # Errors
    ///
    /// `HttpRequestFailed` on transport errors or non-success status,
    /// `ResponseTooLarge` if the body exceeds `limit` bytes.
    async fn fetch(&self, url: &str, limit: u64) -> Result<Vec<u8>>;

    /// Streams `url` into the file at `dest`, returning the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// Same as [`Fetch::fetch`], plus `Io` if `dest` cannot be written.
    async fn download(&self, url: &str, dest: &Path, limit: u64) -> Result<u64>;
}

/// [`Fetch`] implementation backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    show_progress: bool,
}

impl HttpFetcher {
    /// Creates a fetcher. Download progress is printed only when stdout is a
    /// terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("zigvm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ZigvmError::http_request_failed("<client>", e))?;

        Ok(Self {
            client,
            show_progress: std::io::stdout().is_terminal(),
        })
    }

    async fn get(&self, url: &str, limit: u64) -> Result<reqwest::Response> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ZigvmError::http_request_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZigvmError::http_request_failed(url, format!("HTTP {status}")));
        }

        if response.content_length().is_some_and(|len| len > limit) {
            return Err(ZigvmError::response_too_large(url, limit));
        }

        Ok(response)
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str, limit: u64) -> Result<Vec<u8>> {
        let response = self.get(url, limit).await?;

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ZigvmError::http_request_failed(url, e))?;
            if body.len() as u64 + chunk.len() as u64 > limit {
                return Err(ZigvmError::response_too_large(url, limit));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }

    async fn download(&self, url: &str, dest: &Path, limit: u64) -> Result<u64> {
        let response = self.get(url, limit).await?;
        let total_size = response.content_length().unwrap_or(0);
        let write_error =
            |e| ZigvmError::io(format!("Failed to write to {}", dest.display()), e);

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| ZigvmError::io(format!("Failed to create file {}", dest.display()), e))?;

        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;
        let start_time = Instant::now();
        let mut last_update = Instant::now();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ZigvmError::http_request_failed(url, e))?;
            downloaded += chunk.len() as u64;
            if downloaded > limit {
                return Err(ZigvmError::response_too_large(url, limit));
            }
            file.write_all(&chunk).await.map_err(write_error)?;

            let now = Instant::now();
            if self.show_progress
                && now.duration_since(last_update).as_millis() >= CLI_PROGRESS_INTERVAL_MS
            {
                print_progress(downloaded, total_size, start_time.elapsed().as_secs_f64());
                last_update = now;
            }
        }

        file.flush().await.map_err(write_error)?;

        if self.show_progress {
            print_progress(downloaded, total_size, start_time.elapsed().as_secs_f64());
            println!();
        }
        debug!(url, bytes = downloaded, "download complete");

        Ok(downloaded)
    }
}

/// Prints a simple text-based progress line.
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn print_progress(downloaded: u64, total: u64, elapsed_secs: f64) {
    let percent = if total > 0 {
        (downloaded as f64 / total as f64 * 100.0) as u8
    } else {
        0
    };
    let speed = if elapsed_secs > 0.0 {
        downloaded as f64 / elapsed_secs
    } else {
        0.0
    };

    print!(
        "\r{}/{} ({percent}%) {}     ",
        format_bytes(downloaded),
        format_bytes(total),
        format_speed(speed)
    );
    let _ = std::io::stdout().flush();
}

/// Formats bytes into a human-readable string (KB, MB, GB).
fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    #[allow(clippy::cast_precision_loss)]
    let bytes_f = bytes as f64;

    if bytes_f >= GB {
        format!("{:.2} GB", bytes_f / GB)
    } else if bytes_f >= MB {
        format!("{:.2} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.2} KB", bytes_f / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Formats speed (bytes/sec) into a human-readable string.
fn format_speed(speed: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    if speed >= MB {
        format!("{:.2} MB/s", speed / MB)
    } else if speed >= KB {
        format!("{:.2} KB/s", speed / KB)
    } else {
        format!("{speed:.0} B/s")
    }
}
