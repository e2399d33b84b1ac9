//! Package fetching: download, unpack, and artifact search.
//!
//! Composes the downloader and extractor to turn a download URL into a set
//! of candidate files matching a package-specific filename pattern. Zero
//! matches is a caller-visible condition, not a fetch failure; the
//! orchestrator decides whether it is fatal.

use crate::download::PackageDownloader;
use crate::error::Result;
use crate::extraction::ArchiveExtractor;
use camino::{Utf8Path, Utf8PathBuf};

/// Filename pattern selecting the artifact a package is fetched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactPattern {
    /// Debug shared objects, named `libc-*.so`.
    DebugLibrary,
    /// A crossed debug file, named `<buildid-suffix>.debug`.
    CrossedDebug {
        /// The build id suffix the filename must carry.
        suffix: String,
    },
    /// Dynamic loader binaries, named `ld-*.so`.
    Loader,
}

impl ArtifactPattern {
    /// Return whether `file_name` matches this pattern.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Self::DebugLibrary => file_name.starts_with("libc-") && file_name.ends_with(".so"),
            Self::CrossedDebug { suffix } => {
                file_name.strip_suffix(".debug") == Some(suffix.as_str())
            }
            Self::Loader => file_name.starts_with("ld-") && file_name.ends_with(".so"),
        }
    }
}

/// One fetched package and the artifact candidates found inside it.
#[derive(Debug)]
pub struct PackageCandidate {
    /// The URL the archive was downloaded from.
    pub source_url: String,
    /// Where the archive landed inside the workspace.
    pub archive_path: Utf8PathBuf,
    /// Root of the extracted filesystem tree.
    pub extracted_root: Utf8PathBuf,
    /// Extracted files matching the requested pattern.
    pub matches: Vec<Utf8PathBuf>,
}

/// Download the archive at `url` into the workspace, unpack it, and search
/// the extracted tree for files matching `pattern`.
///
/// `label` names the per-package subdirectory and archive file inside the
/// workspace, so successive fetches do not collide.
///
/// # Errors
///
/// Returns a download or extraction error; an empty match set is not an
/// error.
pub fn fetch_package(
    downloader: &dyn PackageDownloader,
    extractor: &dyn ArchiveExtractor,
    url: &str,
    workspace_root: &Utf8Path,
    label: &str,
    pattern: &ArtifactPattern,
) -> Result<PackageCandidate> {
    let archive_path = workspace_root.join(format!("{label}.deb"));
    downloader.download_archive(url, &archive_path)?;

    let extracted_root = workspace_root.join(label);
    std::fs::create_dir_all(&extracted_root)?;
    let files = extractor.extract(&archive_path, &extracted_root)?;

    let matches = files
        .into_iter()
        .filter(|path| path.file_name().is_some_and(|name| pattern.matches(name)))
        .collect();

    Ok(PackageCandidate {
        source_url: url.to_owned(),
        archive_path,
        extracted_root,
        matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::MockPackageDownloader;
    use crate::extraction::MockArchiveExtractor;
    use rstest::rstest;

    #[rstest]
    #[case::debug_library(ArtifactPattern::DebugLibrary, "libc-2.35.so", true)]
    #[case::debug_library_wrong_prefix(ArtifactPattern::DebugLibrary, "libpthread-2.35.so", false)]
    #[case::debug_library_wrong_suffix(ArtifactPattern::DebugLibrary, "libc-2.35.so.1", false)]
    #[case::loader(ArtifactPattern::Loader, "ld-2.35.so", true)]
    #[case::loader_not_a_library(ArtifactPattern::Loader, "ld-linux-x86-64.so.2", false)]
    fn pattern_matching(
        #[case] pattern: ArtifactPattern,
        #[case] file_name: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(pattern.matches(file_name), expected);
    }

    #[test]
    fn crossed_debug_pattern_requires_exact_name() {
        let pattern = ArtifactPattern::CrossedDebug {
            suffix: "adbeef".to_owned(),
        };
        assert!(pattern.matches("adbeef.debug"));
        assert!(!pattern.matches("deadbeef.debug"));
        assert!(!pattern.matches("adbeef.so"));
    }

    #[test]
    fn fetch_package_filters_extracted_files_by_pattern() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8Path::from_path(temp_dir.path())
            .expect("utf-8 temp path")
            .to_owned();

        let mut downloader = MockPackageDownloader::new();
        downloader
            .expect_download_archive()
            .withf(|url, dest| {
                url == "https://example.test/libc6-dbg.deb"
                    && dest.as_str().ends_with("libc6-dbg.deb")
            })
            .returning(|_, dest| {
                std::fs::write(dest, b"archive").map_err(Into::into)
            });

        let mut extractor = MockArchiveExtractor::new();
        extractor.expect_extract().returning(|_, dest| {
            Ok(vec![
                dest.join("usr/lib/debug/lib/libc-2.35.so"),
                dest.join("usr/lib/debug/lib/libpthread-2.35.so"),
            ])
        });

        let candidate = fetch_package(
            &downloader,
            &extractor,
            "https://example.test/libc6-dbg.deb",
            &root,
            "libc6-dbg",
            &ArtifactPattern::DebugLibrary,
        )
        .expect("expected fetch to succeed");

        assert_eq!(candidate.matches.len(), 1);
        assert!(candidate.matches[0].as_str().ends_with("libc-2.35.so"));
        assert_eq!(candidate.extracted_root, root.join("libc6-dbg"));
    }

    #[test]
    fn fetch_package_reports_empty_match_set_without_error() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8Path::from_path(temp_dir.path())
            .expect("utf-8 temp path")
            .to_owned();

        let mut downloader = MockPackageDownloader::new();
        downloader
            .expect_download_archive()
            .returning(|_, dest| std::fs::write(dest, b"archive").map_err(Into::into));

        let mut extractor = MockArchiveExtractor::new();
        extractor
            .expect_extract()
            .returning(|_, dest| Ok(vec![dest.join("usr/share/doc/changelog.gz")]));

        let candidate = fetch_package(
            &downloader,
            &extractor,
            "https://example.test/libc6.deb",
            &root,
            "libc6",
            &ArtifactPattern::Loader,
        )
        .expect("expected fetch to succeed");

        assert!(candidate.matches.is_empty());
    }
}
