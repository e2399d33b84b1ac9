//! CLI argument definitions for the debug-symbol installer.
//!
//! This module defines the command-line interface using clap. It is
//! separated from the main entrypoint to keep the binary small and focused
//! on orchestration.

use camino::Utf8PathBuf;
use clap::Parser;

/// Install glibc debug symbols and the matching dynamic loader.
#[derive(Parser, Debug, Default)]
#[command(name = "dbgsym-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install glibc debug symbols and the matching dynamic loader.\n\n",
    "Given a shared C-library binary, the installer derives its architecture, ",
    "embedded glibc version, and build id, resolves the release that shipped ",
    "that version, downloads the matching debug-symbol package, verifies the ",
    "debug file against the binary's build id, installs it under the build-id ",
    "debug layout, and fetches the matching dynamic loader.\n\n",
    "For i386 binaries whose debug symbols are published under the amd64 ",
    "archive, the installer falls back to the crossed package automatically.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install symbols for a downloaded libc:\n",
    "    $ dbgsym-installer ./libc.so.6\n\n",
    "  Install under a user-writable debug root:\n",
    "    $ dbgsym-installer --debug-root ~/.local/lib/debug/.build-id ./libc.so.6\n",
))]
pub struct Cli {
    /// Path to the target libc shared library.
    pub binary: Option<Utf8PathBuf>,

    /// Root of the debug-symbol layout [default: /usr/lib/debug/.build-id].
    #[arg(long, value_name = "DIR")]
    pub debug_root: Option<Utf8PathBuf>,

    /// Directory receiving the fetched dynamic loader [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Directory under which the scratch workspace is created [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<Utf8PathBuf>,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}
