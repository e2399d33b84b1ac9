//! Debug-symbol installer CLI entrypoint.
//!
//! This binary resolves, downloads, verifies, and installs the debug
//! symbol file and dynamic loader matching a given glibc shared library.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{CommandFactory, Parser};
use dbgsym_installer::cli::Cli;
use dbgsym_installer::download::HttpDownloader;
use dbgsym_installer::elf::ReadelfInspector;
use dbgsym_installer::error::Result;
use dbgsym_installer::extraction::DebExtractor;
use dbgsym_installer::install::DEBUG_SYMBOL_ROOT;
use dbgsym_installer::output::{success_message, write_stderr_line};
use dbgsym_installer::pipeline::{self, PipelineContext};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();

    let Some(binary) = cli.binary.clone() else {
        // No argument prints usage and exits cleanly.
        let _ = Cli::command().print_long_help();
        return;
    };

    let run_result = run(&cli, &binary, &mut stderr);
    let exit_code = exit_code_for_run_result(&run_result);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, binary: &Utf8Path, stderr: &mut dyn Write) -> Result<()> {
    let inspector = ReadelfInspector;
    let downloader = HttpDownloader;
    let extractor = DebExtractor;

    let debug_root = directory_or(cli.debug_root.as_deref(), DEBUG_SYMBOL_ROOT);
    let output_dir = directory_or(cli.output_dir.as_deref(), ".");
    let scratch_parent = directory_or(cli.scratch_dir.as_deref(), ".");

    let context = PipelineContext {
        inspector: &inspector,
        downloader: &downloader,
        extractor: &extractor,
        debug_root: &debug_root,
        output_dir: &output_dir,
        scratch_parent: &scratch_parent,
        quiet: cli.quiet,
    };

    let outcome = pipeline::run(&context, binary, stderr)?;

    if !cli.quiet {
        write_stderr_line(
            stderr,
            success_message(&outcome.installed_debug_path, &outcome.loader_path),
        );
    }

    Ok(())
}

fn directory_or(selected: Option<&Utf8Path>, default: &str) -> Utf8PathBuf {
    selected.map_or_else(|| Utf8PathBuf::from(default), Utf8Path::to_owned)
}

// The pipeline reports every abort reason itself, before its cleanup
// runs; here the result only decides the exit code.
fn exit_code_for_run_result(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbgsym_installer::error::InstallerError;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        assert_eq!(exit_code_for_run_result(&Ok(())), 0);
    }

    #[test]
    fn exit_code_for_run_result_returns_one_on_abort() {
        let err = InstallerError::DistroNotFound {
            version: "9.99".to_owned(),
        };
        assert_eq!(exit_code_for_run_result(&Err(err)), 1);
    }

    #[test]
    fn directory_or_prefers_the_selected_path() {
        let selected = Utf8PathBuf::from("/tmp/debug");
        assert_eq!(
            directory_or(Some(&selected), DEBUG_SYMBOL_ROOT),
            Utf8PathBuf::from("/tmp/debug")
        );
    }

    #[test]
    fn directory_or_falls_back_to_the_default() {
        assert_eq!(
            directory_or(None, DEBUG_SYMBOL_ROOT),
            Utf8PathBuf::from("/usr/lib/debug/.build-id")
        );
    }
}
