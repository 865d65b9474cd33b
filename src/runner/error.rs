//! Error types for the runner module.
//!
//! This submodule isolates derive-macro-affected code to scope lint suppressions
//! narrowly. The `unused_assignments` lint fires in some Rust versions due to
//! thiserror/miette derive macro expansion.

// `#[expect]` cannot be used because the lint only fires on some compiler
// versions.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use std::io;
use thiserror::Error;

/// Errors raised while moving data between the source and the dyndep sink.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The source file does not exist.
    #[error("no such file: {path}")]
    #[diagnostic(
        code(modscan::runner::source_not_found),
        help("check the SOURCE argument passed by the build rule")
    )]
    SourceNotFound {
        /// Path that was attempted.
        path: Utf8PathBuf,
    },

    /// The source file exists but could not be opened.
    #[error("failed to open source file: {path}")]
    #[diagnostic(code(modscan::runner::open_source))]
    OpenSource {
        /// Path that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// Reading the source failed part-way through.
    #[error("failed to read source file: {path}")]
    #[diagnostic(code(modscan::runner::read_source))]
    ReadSource {
        /// Path being read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The dyndep file or one of its parent directories could not be created.
    #[error("failed to open output file: {path}")]
    #[diagnostic(
        code(modscan::runner::create_output),
        help("make sure the --dyndep location is writable")
    )]
    CreateOutput {
        /// Path that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// Writing or flushing the dyndep output failed.
    #[error("failed to write dyndep output to {destination}")]
    #[diagnostic(code(modscan::runner::write_output))]
    WriteOutput {
        /// Output file path, or `<stdout>`.
        destination: String,
        /// Underlying I/O failure.
        source: io::Error,
    },
}
