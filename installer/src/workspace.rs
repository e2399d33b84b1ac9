//! Scratch workspace lifecycle.
//!
//! One pipeline run owns one version-tagged scratch directory. Creation
//! removes any stale directory of the same name; teardown is best-effort
//! and idempotent, and runs on every exit path after creation.

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// A scratch directory owning all downloaded and extracted package data.
#[derive(Debug)]
pub struct Workspace {
    root: Utf8PathBuf,
    created: bool,
}

impl Workspace {
    /// Create a fresh scratch directory named by the library version under
    /// `parent`, removing any stale directory of the same name first.
    ///
    /// # Errors
    ///
    /// Returns an error if the stale directory cannot be removed or the
    /// fresh one cannot be created.
    pub fn create(parent: &Utf8Path, version: &str) -> Result<Self> {
        let root = parent.join(format!("{version}_tmp"));
        if root.exists() {
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            created: true,
        })
    }

    /// Return the workspace root path.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Recursively remove the scratch directory.
    ///
    /// Best-effort: removal failures are logged and swallowed so teardown
    /// never masks the pipeline's own outcome. Calling this twice is safe;
    /// the second call does nothing.
    pub fn destroy(&mut self) {
        if !self.created {
            return;
        }
        self.created = false;
        if let Err(error) = fs::remove_dir_all(&self.root) {
            log::debug!("failed to remove workspace {}: {error}", self.root);
        }
    }
}
