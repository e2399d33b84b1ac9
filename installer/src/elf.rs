//! Binary metadata extraction for the target shared library.
//!
//! This module derives an architecture tag, an embedded glibc version
//! string, and a build identifier from raw dumps of the binary. The dumps
//! come from external inspection tools behind the [`ElfInspector`] trait,
//! so tests can substitute canned output.

use crate::build_id::BuildId;
use crate::error::{InstallerError, Result};
use camino::Utf8Path;
use regex::Regex;
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;
use std::time::Duration;
use wait_timeout::ChildExt;

/// Timeout for external inspection tools.
const INSPECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Debian archive architecture of the target binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// 64-bit x86.
    Amd64,
    /// 32-bit x86.
    I386,
    /// 32-bit ARM hard-float.
    Armhf,
    /// 64-bit ARM.
    Arm64,
    /// 64-bit little-endian PowerPC.
    Ppc64el,
    /// IBM System z.
    S390x,
}

/// Machine markers as printed in an ELF header dump, checked in order.
const ARCHITECTURE_MARKERS: [(&str, Architecture); 6] = [
    ("X86-64", Architecture::Amd64),
    ("80386", Architecture::I386),
    ("ARM", Architecture::Armhf),
    ("AArch64", Architecture::Arm64),
    ("PowerPC64", Architecture::Ppc64el),
    ("IBM S/390", Architecture::S390x),
];

impl Architecture {
    /// Return the architecture name used by the package archive.
    #[must_use]
    pub fn archive_name(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::I386 => "i386",
            Self::Armhf => "armhf",
            Self::Arm64 => "arm64",
            Self::Ppc64el => "ppc64el",
            Self::S390x => "s390x",
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.archive_name())
    }
}

/// Identity of a target binary, derived once and never mutated.
#[derive(Debug, Clone)]
pub struct BinaryFingerprint {
    architecture: Architecture,
    version: String,
    build_id: BuildId,
}

impl BinaryFingerprint {
    /// Return the archive architecture of the binary.
    #[must_use]
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Return the glibc package version embedded in the binary.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Return the build identifier of the binary.
    #[must_use]
    pub fn build_id(&self) -> &BuildId {
        &self.build_id
    }
}

/// Capability for dumping raw metadata out of a binary.
///
/// Each method returns whatever text the underlying tool produced; parsing
/// and error classification happen in this module's free functions.
#[cfg_attr(test, mockall::automock)]
pub trait ElfInspector {
    /// Dump the ELF file header.
    ///
    /// # Errors
    ///
    /// Returns an error if the inspection tool cannot be executed.
    fn header_dump(&self, path: &Utf8Path) -> Result<String>;

    /// Dump the printable strings of the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the inspection tool cannot be executed.
    fn banner_dump(&self, path: &Utf8Path) -> Result<String>;

    /// Dump the ELF note sections.
    ///
    /// # Errors
    ///
    /// Returns an error if the inspection tool cannot be executed.
    fn notes_dump(&self, path: &Utf8Path) -> Result<String>;
}

/// Production inspector shelling out to `readelf` and `strings`.
#[derive(Debug, Default)]
pub struct ReadelfInspector;

impl ElfInspector for ReadelfInspector {
    fn header_dump(&self, path: &Utf8Path) -> Result<String> {
        run_tool("readelf", &["-h", path.as_str()])
    }

    fn banner_dump(&self, path: &Utf8Path) -> Result<String> {
        run_tool("strings", &[path.as_str()])
    }

    fn notes_dump(&self, path: &Utf8Path) -> Result<String> {
        run_tool("readelf", &["--notes", path.as_str()])
    }
}

/// Extract the full fingerprint of the target binary.
///
/// # Errors
///
/// Returns `UnsupportedArchitecture`, `VersionNotFound` or
/// `BuildIdNotFound` when the corresponding dump lacks the expected
/// content, and `InvalidBuildId` when the captured id is malformed.
pub fn extract_fingerprint(
    inspector: &dyn ElfInspector,
    path: &Utf8Path,
) -> Result<BinaryFingerprint> {
    let architecture = detect_architecture(&inspector.header_dump(path)?).ok_or_else(|| {
        InstallerError::UnsupportedArchitecture {
            path: path.to_owned(),
        }
    })?;

    let version = parse_version(&inspector.banner_dump(path)?).ok_or_else(|| {
        InstallerError::VersionNotFound {
            path: path.to_owned(),
        }
    })?;

    let raw_id = parse_build_id(&inspector.notes_dump(path)?).ok_or_else(|| {
        InstallerError::BuildIdNotFound {
            path: path.to_owned(),
        }
    })?;
    let build_id = BuildId::try_from(raw_id)?;

    Ok(BinaryFingerprint {
        architecture,
        version,
        build_id,
    })
}

/// Re-derive the build id of an arbitrary candidate file.
///
/// Unlike [`extract_fingerprint`], failures collapse to `None`: a candidate
/// without a discoverable build id is a non-match, not an abort.
#[must_use]
pub fn read_build_id(inspector: &dyn ElfInspector, path: &Utf8Path) -> Option<String> {
    inspector
        .notes_dump(path)
        .ok()
        .and_then(|dump| parse_build_id(&dump))
}

/// Recognize the architecture from a header dump by marker substring.
#[must_use]
pub fn detect_architecture(header_dump: &str) -> Option<Architecture> {
    ARCHITECTURE_MARKERS
        .iter()
        .find(|(marker, _)| header_dump.contains(marker))
        .map(|&(_, architecture)| architecture)
}

/// Parse the glibc package version out of the banner string dump.
#[must_use]
pub fn parse_version(banner_dump: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"GLIBC ([^)]*)\)").expect("hard-coded pattern"));
    re.captures(banner_dump)
        .map(|captures| captures[1].to_owned())
}

/// Parse the build id out of a notes dump.
#[must_use]
pub fn parse_build_id(notes_dump: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"Build ID: (\w+)").expect("hard-coded pattern"));
    re.captures(notes_dump)
        .map(|captures| captures[1].to_owned())
}

/// Run an inspection tool with a timeout and return its stdout.
///
/// A non-zero exit still yields whatever the tool wrote; the parsers above
/// classify missing content. Only a failure to execute the tool at all is
/// an error.
fn run_tool(program: &'static str, args: &[&str]) -> Result<String> {
    let output = run_with_timeout(program, args)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn run_with_timeout(program: &'static str, args: &[&str]) -> Result<Output> {
    let mut child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| InstallerError::Inspection {
            tool: program,
            reason: e.to_string(),
        })?;

    match child.wait_timeout(INSPECT_TIMEOUT)? {
        Some(status) => {
            let stdout = child
                .stdout
                .take()
                .map(std::io::read_to_string)
                .transpose()?
                .unwrap_or_default();
            let stderr = child
                .stderr
                .take()
                .map(std::io::read_to_string)
                .transpose()?
                .unwrap_or_default();

            Ok(Output {
                status,
                stdout: stdout.into_bytes(),
                stderr: stderr.into_bytes(),
            })
        }
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(InstallerError::Inspection {
                tool: program,
                reason: format!("timed out after {} seconds", INSPECT_TIMEOUT.as_secs()),
            })
        }
    }
}
