//! Build-id verification of candidate debug files.
//!
//! Re-derives a candidate's build id and compares it to the target's.
//! Verification never fails: a candidate whose id cannot be read is
//! reported as a non-match with no observed id.

use crate::build_id::BuildId;
use crate::elf::{self, ElfInspector};
use camino::{Utf8Path, Utf8PathBuf};

/// The outcome of one verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// The file that was verified.
    pub candidate: Utf8PathBuf,
    /// Whether the observed id equals the expected one.
    pub matched: bool,
    /// The id read from the candidate, if any.
    pub observed: Option<String>,
}

impl VerificationResult {
    /// Render the observed id for error reporting.
    #[must_use]
    pub fn observed_or_placeholder(&self) -> String {
        self.observed
            .clone()
            .unwrap_or_else(|| "<no build id>".to_owned())
    }
}

/// Compare the build id of `candidate` against `expected`.
///
/// Comparison is case-sensitive string equality.
#[must_use]
pub fn verify(
    inspector: &dyn ElfInspector,
    candidate: &Utf8Path,
    expected: &BuildId,
) -> VerificationResult {
    let observed = elf::read_build_id(inspector, candidate);
    let matched = observed.as_deref() == Some(expected.as_str());
    VerificationResult {
        candidate: candidate.to_owned(),
        matched,
        observed,
    }
}
