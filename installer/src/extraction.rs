//! Nested archive unpacking for downloaded packages.
//!
//! A package archive is an `ar` container holding a compressed `data.tar.*`
//! member, which in turn holds the filesystem tree. Extraction unwraps both
//! layers, with path traversal protection on every tar entry.

use camino::{Utf8Path, Utf8PathBuf};
use std::io::Read;
use std::path::{Component, Path};

/// Trait for extracting package archives, enabling test mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the paths of the regular files that were extracted.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::MissingDataArchive`] when the container
    /// carries no data member, [`ExtractionError::PathTraversal`] if any
    /// entry attempts to escape the destination directory, and
    /// [`ExtractionError::Io`] on I/O failures.
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<Vec<Utf8PathBuf>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// A path in the archive is not valid UTF-8.
    #[error("non-UTF-8 path in archive: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// The outer container holds no `data.tar.*` member.
    #[error("no data archive found in {archive}")]
    MissingDataArchive {
        /// Path of the container that was searched.
        archive: Utf8PathBuf,
    },

    /// The data member uses a compression this tool does not decode.
    #[error("unsupported compression for archive member {member}")]
    UnsupportedCompression {
        /// Name of the data member.
        member: String,
    },
}

/// Default extractor for `.deb`-style packages.
///
/// Unwraps the outer `ar` container, locates the `data.tar.*` member and
/// decodes it by extension (`.xz`, `.zst`, `.gz`, or plain `.tar`).
#[derive(Debug, Default)]
pub struct DebExtractor;

impl ArchiveExtractor for DebExtractor {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<Vec<Utf8PathBuf>, ExtractionError> {
        let file = std::fs::File::open(archive_path)?;
        let mut container = ar::Archive::new(file);

        while let Some(entry_result) = container.next_entry() {
            let entry = entry_result?;
            let member = String::from_utf8_lossy(entry.header().identifier()).into_owned();
            if member.starts_with("data.tar") {
                return unpack_data_member(&member, entry, dest_dir);
            }
        }

        Err(ExtractionError::MissingDataArchive {
            archive: archive_path.to_owned(),
        })
    }
}

/// Decode the data member by extension and unpack the inner tar tree.
fn unpack_data_member(
    member: &str,
    reader: impl Read,
    dest_dir: &Utf8Path,
) -> Result<Vec<Utf8PathBuf>, ExtractionError> {
    match member {
        "data.tar.xz" => unpack_tar(xz2::read::XzDecoder::new(reader), dest_dir),
        "data.tar.zst" => unpack_tar(zstd::Decoder::new(reader)?, dest_dir),
        "data.tar.gz" => unpack_tar(flate2::read::GzDecoder::new(reader), dest_dir),
        "data.tar" => unpack_tar(reader, dest_dir),
        other => Err(ExtractionError::UnsupportedCompression {
            member: other.to_owned(),
        }),
    }
}

/// Unpack a tar stream into `dest_dir`, returning the regular files.
fn unpack_tar(reader: impl Read, dest_dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, ExtractionError> {
    let mut archive = tar::Archive::new(reader);
    let mut extracted = Vec::new();

    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        let entry_path = entry.path()?.into_owned();

        validate_entry_path(&entry_path)?;

        let relative =
            Utf8PathBuf::from_path_buf(entry_path).map_err(|p| ExtractionError::NonUtf8Path {
                path: p.display().to_string(),
            })?;
        let dest_path = dest_dir.join(&relative);
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let is_file = entry.header().entry_type().is_file();
        entry.unpack(&dest_path)?;

        if is_file {
            extracted.push(dest_path);
        }
    }

    Ok(extracted)
}

/// Validate that a tar entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    if path.is_absolute() {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    for component in path.components() {
        if matches!(component, Component::ParentDir) {
            return Err(ExtractionError::PathTraversal {
                path: path.display().to_string(),
            });
        }
    }
    Ok(())
}
