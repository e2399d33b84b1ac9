//! Build identifier newtype for debug-symbol matching.
//!
//! Validates that the value is a non-empty lowercase hexadecimal string of
//! even length, so it can be split into the two-character directory prefix
//! and the filename suffix used by the debug-symbol install layout.

use crate::error::{InstallerError, Result};
use std::fmt;

/// A validated hex-encoded build identifier.
///
/// # Examples
///
/// ```
/// use dbgsym_installer::build_id::BuildId;
///
/// let id: BuildId = "abcd1234".try_into().unwrap();
/// assert_eq!(id.prefix(), "ab");
/// assert_eq!(id.suffix(), "cd1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildId(String);

/// Length of the directory prefix in the install layout.
const PREFIX_LEN: usize = 2;

impl BuildId {
    /// Return the build id as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the two-character directory prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.0[..PREFIX_LEN]
    }

    /// Return the remainder of the id after the directory prefix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.0[PREFIX_LEN..]
    }
}

impl TryFrom<&str> for BuildId {
    type Error = InstallerError;

    fn try_from(value: &str) -> Result<Self> {
        validate_build_id(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for BuildId {
    type Error = InstallerError;

    fn try_from(value: String) -> Result<Self> {
        validate_build_id(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for BuildId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a well-formed build identifier.
fn validate_build_id(value: &str) -> Result<()> {
    let invalid = |reason: String| InstallerError::InvalidBuildId {
        value: value.to_owned(),
        reason,
    };

    if value.is_empty() {
        return Err(invalid("build id is empty".to_owned()));
    }
    if value.len() % 2 != 0 {
        return Err(invalid(format!("odd number of hex characters ({})", value.len())));
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(invalid(format!("non-hex character '{bad}'")));
    }
    if value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(invalid("build id must be lowercase".to_owned()));
    }
    Ok(())
}
