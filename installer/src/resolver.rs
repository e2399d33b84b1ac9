//! Repository lookups against the Launchpad archive.
//!
//! Resolution is anchor scraping over the HTML pages Launchpad serves for a
//! source version and for a per-release binary package. The scraping is
//! isolated in the `first_*_anchor` helpers so the strategy can be swapped
//! for a structured API without touching pipeline logic.

use crate::download::PackageDownloader;
use crate::elf::Architecture;
use crate::error::{InstallerError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Base URL of the package repository.
const LAUNCHPAD_BASE: &str = "https://launchpad.net";

/// Source package name all lookups are keyed by.
const SOURCE_PACKAGE: &str = "glibc";

/// The binary packages the pipeline resolves.
///
/// The crossed kinds are the i386 userland packages, which Launchpad
/// publishes under the amd64 archive namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Debug symbols for the target architecture.
    DebugSymbols,
    /// i386 debug symbols hosted under the amd64 archive.
    CrossedDebugSymbols,
    /// Runtime package carrying the dynamic loader.
    Runtime,
    /// i386 runtime package hosted under the amd64 archive.
    CrossedRuntime,
}

impl PackageKind {
    /// Return the binary package name used in the download-page URL.
    #[must_use]
    pub fn package_name(self) -> &'static str {
        match self {
            Self::DebugSymbols => "libc6-dbg",
            Self::CrossedDebugSymbols => "libc6-i386-dbgsym",
            Self::Runtime => "libc6",
            Self::CrossedRuntime => "libc6-i386",
        }
    }

    /// Return the archive architecture segment for the download-page URL.
    #[must_use]
    pub fn archive_architecture(self, target: Architecture) -> &'static str {
        match self {
            Self::CrossedDebugSymbols | Self::CrossedRuntime => "amd64",
            Self::DebugSymbols | Self::Runtime => target.archive_name(),
        }
    }
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.package_name())
    }
}

/// URL of the per-version source page listing the publishing release.
#[must_use]
pub fn release_page_url(version: &str) -> String {
    format!("{LAUNCHPAD_BASE}/ubuntu/+source/{SOURCE_PACKAGE}/{version}")
}

/// URL of the per-release binary package page listing the download link.
#[must_use]
pub fn package_page_url(codename: &str, architecture: &str, package: &str, version: &str) -> String {
    format!("{LAUNCHPAD_BASE}/ubuntu/{codename}/{architecture}/{package}/{version}")
}

/// Discover the release codename that shipped `version`.
///
/// # Errors
///
/// Returns `DistroNotFound` when the page carries no release anchor, or a
/// download error when the page cannot be fetched.
pub fn resolve_release(downloader: &dyn PackageDownloader, version: &str) -> Result<String> {
    let url = release_page_url(version);
    let html = downloader.fetch_page(&url)?;
    first_release_anchor(&html).ok_or_else(|| InstallerError::DistroNotFound {
        version: version.to_owned(),
    })
}

/// Discover the concrete download URL for one binary package.
///
/// # Errors
///
/// Returns `PackageNotFound` when the page carries no download anchor, or a
/// download error when the page cannot be fetched.
pub fn resolve_download_url(
    downloader: &dyn PackageDownloader,
    codename: &str,
    architecture: &str,
    package: &str,
    version: &str,
) -> Result<String> {
    let url = package_page_url(codename, architecture, package, version);
    let html = downloader.fetch_page(&url)?;
    first_download_anchor(&html).ok_or_else(|| InstallerError::PackageNotFound {
        package: package.to_owned(),
        version: version.to_owned(),
    })
}

/// Return the target of the first release anchor on the source page.
#[must_use]
pub fn first_release_anchor(html: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r#"<a href="/ubuntu/(\w+)">"#).expect("hard-coded pattern"));
    re.captures(html).map(|captures| captures[1].to_owned())
}

/// Return the href of the first download anchor on the package page.
#[must_use]
pub fn first_download_anchor(html: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"<a class="sprite" href="([^"]+)">"#).expect("hard-coded pattern")
    });
    re.captures(html).map(|captures| captures[1].to_owned())
}
