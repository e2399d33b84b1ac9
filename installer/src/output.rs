//! Progress and result output for the installer CLI.
//!
//! All progress goes to a caller-supplied writer so tests can capture it;
//! write failures are swallowed because losing a progress line must never
//! abort an install.

use camino::Utf8Path;
use std::io::Write;

/// Write one line to the given writer, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format the final success message.
#[must_use]
pub fn success_message(debug_path: &Utf8Path, loader_path: &Utf8Path) -> String {
    format!(
        "Installed debug symbols to {debug_path} and dynamic loader to {loader_path}"
    )
}
