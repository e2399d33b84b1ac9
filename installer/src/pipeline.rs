//! Resolution pipeline orchestration.
//!
//! Composes metadata extraction, release resolution, package fetching,
//! verification, and installation. This is the only module with branching
//! and fallback logic: every other component returns a definite result or
//! a definite error, and the pipeline alone decides abort-versus-fallback.

use crate::download::PackageDownloader;
use crate::elf::{self, Architecture, BinaryFingerprint, ElfInspector};
use crate::error::{InstallerError, Result};
use crate::extraction::ArchiveExtractor;
use crate::fetcher::{self, ArtifactPattern};
use crate::install;
use crate::output::write_stderr_line;
use crate::resolver::{self, PackageKind};
use crate::verify;
use crate::workspace::Workspace;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;

/// Collaborators and settings for one pipeline run.
pub struct PipelineContext<'a> {
    /// Capability for dumping binary metadata.
    pub inspector: &'a dyn ElfInspector,
    /// Capability for repository lookups and archive downloads.
    pub downloader: &'a dyn PackageDownloader,
    /// Capability for unpacking downloaded archives.
    pub extractor: &'a dyn ArchiveExtractor,
    /// Root of the build-id debug-symbol layout.
    pub debug_root: &'a Utf8Path,
    /// Directory receiving the fetched dynamic loader.
    pub output_dir: &'a Utf8Path,
    /// Directory under which the scratch workspace is created.
    pub scratch_parent: &'a Utf8Path,
    /// Suppress progress output.
    pub quiet: bool,
}

/// What a successful run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Where the verified debug file was installed.
    pub installed_debug_path: Utf8PathBuf,
    /// Where the dynamic loader was copied.
    pub loader_path: Utf8PathBuf,
    /// Whether the amd64-hosted i386 packages were used.
    pub used_crossed_packages: bool,
}

/// Run the full pipeline for the binary at `binary`.
///
/// Every abort reason is written to `stderr` before cleanup runs, and the
/// scratch workspace is torn down on every exit path after creation,
/// success and abort alike.
///
/// # Errors
///
/// Returns the first terminal error encountered; the only retry is the
/// documented i386 crossed-package fallback.
pub fn run(
    context: &PipelineContext<'_>,
    binary: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<PipelineOutcome> {
    let fingerprint = match elf::extract_fingerprint(context.inspector, binary) {
        Ok(fingerprint) => fingerprint,
        Err(error) => {
            report_abort(stderr, &error);
            return Err(error);
        }
    };
    report(context, stderr, format!("Target architecture: {}", fingerprint.architecture()));
    report(context, stderr, format!("Embedded glibc version: {}", fingerprint.version()));
    report(context, stderr, format!("Build id: {}", fingerprint.build_id()));

    let mut workspace = match Workspace::create(context.scratch_parent, fingerprint.version()) {
        Ok(workspace) => workspace,
        Err(error) => {
            report_abort(stderr, &error);
            return Err(error);
        }
    };
    let outcome = resolve_and_install(context, &fingerprint, workspace.root(), stderr);
    if let Err(ref error) = outcome {
        report_abort(stderr, error);
    }
    workspace.destroy();
    outcome
}

/// Write the abort reason; shown even in quiet mode.
fn report_abort(stderr: &mut dyn Write, error: &InstallerError) {
    write_stderr_line(stderr, format!("error: {error}"));
}

/// Everything between workspace creation and teardown.
fn resolve_and_install(
    context: &PipelineContext<'_>,
    fingerprint: &BinaryFingerprint,
    workspace_root: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<PipelineOutcome> {
    let codename = resolver::resolve_release(context.downloader, fingerprint.version())?;
    report(context, stderr, format!("Release codename: {codename}"));

    let (debug_file, used_crossed_packages) =
        locate_debug_file(context, fingerprint, &codename, workspace_root, stderr)?;

    report(
        context,
        stderr,
        format!(
            "Installing debug file to {}...",
            install::install_path(context.debug_root, fingerprint.build_id())
        ),
    );
    let installed_debug_path = install::install_debug_file(
        context.inspector,
        &debug_file,
        fingerprint.build_id(),
        context.debug_root,
    )?;

    let loader_path = fetch_loader(
        context,
        fingerprint,
        &codename,
        used_crossed_packages,
        workspace_root,
        stderr,
    )?;

    Ok(PipelineOutcome {
        installed_debug_path,
        loader_path,
        used_crossed_packages,
    })
}

/// Fetch the debug-symbol package and produce one verified debug file.
///
/// Returns the file and whether the crossed fallback was taken.
fn locate_debug_file(
    context: &PipelineContext<'_>,
    fingerprint: &BinaryFingerprint,
    codename: &str,
    workspace_root: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<(Utf8PathBuf, bool)> {
    let kind = PackageKind::DebugSymbols;
    let url = resolver::resolve_download_url(
        context.downloader,
        codename,
        kind.archive_architecture(fingerprint.architecture()),
        kind.package_name(),
        fingerprint.version(),
    )?;
    report(context, stderr, format!("Found {kind} at {url}"));

    let package = fetcher::fetch_package(
        context.downloader,
        context.extractor,
        &url,
        workspace_root,
        kind.package_name(),
        &ArtifactPattern::DebugLibrary,
    )?;

    let selected = select_candidate(context.inspector, &package.matches, fingerprint)
        .ok_or_else(|| InstallerError::NoDebugArtifactFound {
            package: kind.package_name().to_owned(),
        })?
        .to_owned();

    let result = verify::verify(context.inspector, &selected, fingerprint.build_id());
    if result.matched {
        return Ok((selected, false));
    }

    report(
        context,
        stderr,
        format!(
            "Debug symbol build id mismatch: expected {}, found {}",
            fingerprint.build_id(),
            result.observed_or_placeholder()
        ),
    );
    if fingerprint.architecture() != Architecture::I386 {
        return Err(InstallerError::BuildIdMismatch {
            expected: fingerprint.build_id().to_string(),
            observed: result.observed_or_placeholder(),
        });
    }

    report(
        context,
        stderr,
        "Retrying with the amd64-hosted i386 debug package...",
    );
    let crossed = fetch_crossed_debug_file(context, fingerprint, codename, workspace_root, stderr)?;
    Ok((crossed, true))
}

/// The i386 fallback: the crossed debug package names its debug files by
/// build-id suffix, so the search is exact rather than by library name.
fn fetch_crossed_debug_file(
    context: &PipelineContext<'_>,
    fingerprint: &BinaryFingerprint,
    codename: &str,
    workspace_root: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<Utf8PathBuf> {
    let kind = PackageKind::CrossedDebugSymbols;
    let url = resolver::resolve_download_url(
        context.downloader,
        codename,
        kind.archive_architecture(fingerprint.architecture()),
        kind.package_name(),
        fingerprint.version(),
    )?;
    report(context, stderr, format!("Found {kind} at {url}"));

    let pattern = ArtifactPattern::CrossedDebug {
        suffix: fingerprint.build_id().suffix().to_owned(),
    };
    let package = fetcher::fetch_package(
        context.downloader,
        context.extractor,
        &url,
        workspace_root,
        kind.package_name(),
        &pattern,
    )?;

    let candidate = package.matches.first().ok_or_else(|| {
        InstallerError::NoDebugArtifactFound {
            package: kind.package_name().to_owned(),
        }
    })?;

    let result = verify::verify(context.inspector, candidate, fingerprint.build_id());
    if !result.matched {
        return Err(InstallerError::BuildIdMismatch {
            expected: fingerprint.build_id().to_string(),
            observed: result.observed_or_placeholder(),
        });
    }
    Ok(candidate.clone())
}

/// Select among the debug package's shared-object variants.
///
/// A sole candidate is taken as-is. Among several, the first whose build id
/// verifies wins; with no verified match the first candidate falls through
/// and the pre-install verification decides its fate.
fn select_candidate<'a>(
    inspector: &dyn ElfInspector,
    candidates: &'a [Utf8PathBuf],
    fingerprint: &BinaryFingerprint,
) -> Option<&'a Utf8PathBuf> {
    match candidates {
        [] => None,
        [single] => Some(single),
        [first, ..] => Some(
            candidates
                .iter()
                .find(|candidate| {
                    verify::verify(inspector, candidate, fingerprint.build_id()).matched
                })
                .unwrap_or(first),
        ),
    }
}

/// Fetch the runtime package and copy its loader to the output directory.
///
/// No build-id verification here: the loader is trusted by coordinates,
/// having come from the same release, version, and archive already
/// validated for the debug package.
fn fetch_loader(
    context: &PipelineContext<'_>,
    fingerprint: &BinaryFingerprint,
    codename: &str,
    used_crossed_packages: bool,
    workspace_root: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<Utf8PathBuf> {
    let kind = if used_crossed_packages {
        PackageKind::CrossedRuntime
    } else {
        PackageKind::Runtime
    };
    let url = resolver::resolve_download_url(
        context.downloader,
        codename,
        kind.archive_architecture(fingerprint.architecture()),
        kind.package_name(),
        fingerprint.version(),
    )?;
    report(context, stderr, format!("Found {kind} at {url}"));

    let package = fetcher::fetch_package(
        context.downloader,
        context.extractor,
        &url,
        workspace_root,
        kind.package_name(),
        &ArtifactPattern::Loader,
    )?;

    let loader = package
        .matches
        .first()
        .ok_or_else(|| InstallerError::LoaderNotFound {
            package: kind.package_name().to_owned(),
        })?;

    std::fs::create_dir_all(context.output_dir)?;
    let dest = context.output_dir.join(loader.file_name().unwrap_or("ld.so"));
    std::fs::copy(loader, &dest)?;
    report(context, stderr, format!("Copied dynamic loader to {dest}"));

    Ok(dest)
}

fn report(context: &PipelineContext<'_>, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !context.quiet {
        write_stderr_line(stderr, message);
    }
}
