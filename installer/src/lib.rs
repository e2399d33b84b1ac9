//! Debug-symbol installer library.
//!
//! This crate resolves and installs the debug symbol file and dynamic
//! loader matching a given glibc shared library, by deriving identifying
//! metadata from the binary and using it to locate, fetch, and verify the
//! artifacts from the Launchpad archive. It is used by the
//! `dbgsym-installer` CLI binary and can be consumed programmatically for
//! testing or custom workflows.
//!
//! # Modules
//!
//! - [`build_id`] - Validated build identifier newtype
//! - [`cli`] - Command-line argument definitions
//! - [`download`] - HTTP retrieval of pages and archives
//! - [`elf`] - Binary metadata extraction behind an inspector capability
//! - [`error`] - Semantic error types with identifying context
//! - [`extraction`] - Nested package archive unpacking
//! - [`fetcher`] - Package fetching and artifact search
//! - [`install`] - Debug-file installation under the build-id layout
//! - [`output`] - Progress and result output
//! - [`pipeline`] - Resolution pipeline orchestration
//! - [`resolver`] - Repository lookups against the package archive
//! - [`verify`] - Build-id verification of candidates
//! - [`workspace`] - Scratch workspace lifecycle

pub mod build_id;
pub mod cli;
pub mod download;
pub mod elf;
pub mod error;
pub mod extraction;
pub mod fetcher;
pub mod install;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod verify;
pub mod workspace;
