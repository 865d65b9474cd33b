//! Command line interface definition using clap.
//!
//! Arguments arrive as UTF-8 [`Utf8PathBuf`] values; clap rejects anything
//! that cannot be decoded, so the rest of the crate only ever handles
//! already-decoded text.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;

/// Environment variable supplying the default module interface directory.
pub const MODULE_DIR_ENV: &str = "MODSCAN_MODULE_DIR";

/// Sentinel output path selecting standard output.
pub const STDOUT_SENTINEL: &str = "-";

/// Simple module scanner for C++20.
///
/// Scans SOURCE for module declarations and imports and writes a Ninja
/// dyndep file listing the module interfaces KEY depends on.
#[derive(Debug, Parser)]
#[command(name = "modscan", author, version, about, long_about = None)]
pub struct Cli {
    /// Input source file.
    #[arg(value_name = "SOURCE")]
    pub source: Utf8PathBuf,

    /// Rule output key file, usually an object file.
    #[arg(long, value_name = "KEY")]
    pub key: String,

    /// Directory holding compiled module interfaces.
    #[arg(
        long = "module-dir",
        visible_alias = "module_dir",
        value_name = "DIR",
        env = MODULE_DIR_ENV
    )]
    pub module_dir: Utf8PathBuf,

    /// Dyndep output file; empty or `-` writes to standard output.
    #[arg(long, value_name = "FILE")]
    pub dyndep: Option<Utf8PathBuf>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where the dyndep file is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output.
    Stdout,
    /// A file, created along with any missing parent directories.
    File(Utf8PathBuf),
}

impl Destination {
    /// Interpret the `--dyndep` argument.
    #[must_use]
    pub fn from_arg(arg: Option<&Utf8Path>) -> Self {
        match arg {
            Some(path) if !path.as_str().is_empty() && path.as_str() != STDOUT_SENTINEL => {
                Self::File(path.to_owned())
            }
            _ => Self::Stdout,
        }
    }
}

impl Cli {
    /// Resolve the output destination.
    #[must_use]
    pub fn destination(&self) -> Destination {
        Destination::from_arg(self.dyndep.as_deref())
    }
}
