//! Error types for the debug-symbol installer CLI.
//!
//! This module defines semantic error variants carrying the value that
//! failed to resolve, so every abort is reported with identifying context
//! before cleanup runs.

use crate::download::DownloadError;
use crate::extraction::ExtractionError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving and installing debug symbols.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The target binary's ELF header names a machine this tool does not
    /// support.
    #[error("unsupported architecture for {path}")]
    UnsupportedArchitecture {
        /// Path to the binary that was inspected.
        path: Utf8PathBuf,
    },

    /// No glibc version banner was found in the target binary.
    #[error("can't find glibc version in {path}")]
    VersionNotFound {
        /// Path to the binary that was inspected.
        path: Utf8PathBuf,
    },

    /// No build id note was found in the target binary.
    #[error("can't find build id in {path}")]
    BuildIdNotFound {
        /// Path to the binary that was inspected.
        path: Utf8PathBuf,
    },

    /// A build id was found but is not a well-formed identifier.
    #[error("invalid build id {value:?}: {reason}")]
    InvalidBuildId {
        /// The malformed value as captured from the notes dump.
        value: String,
        /// Description of the constraint that was violated.
        reason: String,
    },

    /// The repository has no release publishing the requested version.
    #[error("can't find distribution release for glibc {version}")]
    DistroNotFound {
        /// The version string that failed to resolve.
        version: String,
    },

    /// The release publishes no download for the requested package.
    #[error("can't find download url for {package} {version}")]
    PackageNotFound {
        /// Name of the package that failed to resolve.
        package: String,
        /// The version string used in the lookup.
        version: String,
    },

    /// An HTTP request or transfer failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Unpacking a downloaded archive failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The debug package contained no debug shared object at all.
    #[error("no debug artifact found in {package}")]
    NoDebugArtifactFound {
        /// Name of the package that was searched.
        package: String,
    },

    /// The runtime package contained no dynamic loader binary.
    #[error("no dynamic loader found in {package}")]
    LoaderNotFound {
        /// Name of the package that was searched.
        package: String,
    },

    /// The selected debug file does not carry the target's build id.
    #[error("debug symbol build id mismatch: expected {expected}, found {observed}")]
    BuildIdMismatch {
        /// The build id of the target binary.
        expected: String,
        /// The build id observed on the candidate, or a placeholder when
        /// none could be read.
        observed: String,
    },

    /// The installed copy failed re-verification after the filesystem copy.
    #[error("installed debug file {path} failed verification against {expected}")]
    InstallVerificationFailed {
        /// Path of the installed copy.
        path: Utf8PathBuf,
        /// The build id the copy was expected to carry.
        expected: String,
    },

    /// An external inspection tool could not be executed.
    #[error("failed to run {tool}: {reason}")]
    Inspection {
        /// Name of the tool that could not be run.
        tool: &'static str,
        /// Description of the failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
