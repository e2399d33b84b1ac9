//! HTTP retrieval for repository pages and package archives.
//!
//! Provides a trait-based abstraction over the two network operations the
//! pipeline needs, enabling dependency injection for testing.

use camino::Utf8Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout for repository lookups and archive downloads.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Trait for fetching repository pages and package archives.
///
/// Abstractions allow tests to stub HTTP behaviour without network access.
#[cfg_attr(test, mockall::automock)]
pub trait PackageDownloader {
    /// Fetch the page at `url` and return its body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the page is not found.
    fn fetch_page(&self, url: &str) -> Result<String, DownloadError>;

    /// Download the archive at `url` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the download or the file write fails.
    fn download_archive(&self, url: &str, dest: &Utf8Path) -> Result<(), DownloadError>;
}

/// Errors arising from download operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-based downloader using `ureq`.
#[derive(Debug, Default)]
pub struct HttpDownloader;

impl PackageDownloader for HttpDownloader {
    fn fetch_page(&self, url: &str) -> Result<String, DownloadError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| DownloadError::HttpError {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }

    fn download_archive(&self, url: &str, dest: &Utf8Path) -> Result<(), DownloadError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut file = std::fs::File::create(dest)?;
        std::io::copy(&mut response.into_body().as_reader(), &mut file)
            .map_err(DownloadError::Io)?;
        Ok(())
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
