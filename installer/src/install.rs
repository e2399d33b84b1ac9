//! Debug-file installation under the build-id layout.
//!
//! The verified debug file is copied to a deterministic path keyed by the
//! build id, then the installed copy is verified again: the copy may fail
//! silently or collide with an existing file, so the on-disk bytes are
//! checked independently of the pre-install verification.

use crate::build_id::BuildId;
use crate::elf::ElfInspector;
use crate::error::{InstallerError, Result};
use crate::verify;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Default OS-wide root of the build-id debug-symbol layout.
pub const DEBUG_SYMBOL_ROOT: &str = "/usr/lib/debug/.build-id";

/// Return the install path for `build_id` under `debug_root`.
#[must_use]
pub fn install_path(debug_root: &Utf8Path, build_id: &BuildId) -> Utf8PathBuf {
    debug_root
        .join(build_id.prefix())
        .join(format!("{}.debug", build_id.suffix()))
}

/// Copy `source` to its build-id-keyed install path and re-verify the copy.
///
/// # Errors
///
/// Returns an I/O error if the copy fails, and
/// `InstallVerificationFailed` if the installed copy does not carry
/// `build_id`.
pub fn install_debug_file(
    inspector: &dyn ElfInspector,
    source: &Utf8Path,
    build_id: &BuildId,
    debug_root: &Utf8Path,
) -> Result<Utf8PathBuf> {
    let dest = install_path(debug_root, build_id);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, &dest)?;

    let check = verify::verify(inspector, &dest, build_id);
    if !check.matched {
        return Err(InstallerError::InstallVerificationFailed {
            path: dest,
            expected: build_id.to_string(),
        });
    }

    Ok(dest)
}
