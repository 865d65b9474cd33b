//! Ninja dyndep file writer.
//!
//! A dyndep file produced here always holds exactly one build statement for
//! the output key, with every discovered module interface listed as an
//! implicit input:
//!
//! ```text
//! ninja_dyndep_version = 1
//!
//! build out.o: dyndep | mods/M.ifc mods/A.ifc
//! ```
//!
//! Names are written in the order they are pushed. Nothing is sorted or
//! deduplicated, so the output is a pure function of the key, the module
//! directory and the name sequence.

use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

/// Version preamble written before the build statement.
pub const DYNDEP_VERSION_HEADER: &str = "ninja_dyndep_version = 1\n\n";

/// File suffix of compiled module interfaces.
pub const INTERFACE_SUFFIX: &str = ".ifc";

/// Whether the ` |` separator has been written for the current statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorState {
    /// No input path has been written yet.
    #[default]
    NoReferencesYet,
    /// The separator and at least one input path are written.
    AtLeastOneEmitted,
}

impl SeparatorState {
    /// Text to write before the next input path, paired with the state that
    /// follows it.
    #[must_use]
    pub const fn advance(self) -> (&'static str, Self) {
        match self {
            Self::NoReferencesYet => (" |", Self::AtLeastOneEmitted),
            Self::AtLeastOneEmitted => ("", Self::AtLeastOneEmitted),
        }
    }
}

/// Displays `<module_dir>/<name>.ifc`.
struct InterfacePath<'a> {
    module_dir: &'a str,
    name: &'a str,
}

impl Display for InterfacePath<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}{INTERFACE_SUFFIX}", self.module_dir, self.name)
    }
}

/// Resolve a module name to its interface file path.
///
/// The directory is used verbatim and joined with `/` on every platform.
///
/// ```
/// assert_eq!(modscan::dyndep::interface_path("build/mods", "foo.bar"), "build/mods/foo.bar.ifc");
/// ```
#[must_use]
pub fn interface_path(module_dir: &str, name: &str) -> String {
    InterfacePath { module_dir, name }.to_string()
}

/// Streams a single dyndep build statement into a sink.
///
/// [`DyndepWriter::begin`] writes the header and the statement prefix, each
/// [`DyndepWriter::push`] appends one input path and
/// [`DyndepWriter::finish`] terminates the line and flushes.
#[derive(Debug)]
pub struct DyndepWriter<W: Write> {
    sink: W,
    module_dir: String,
    state: SeparatorState,
    written: usize,
}

impl<W: Write> DyndepWriter<W> {
    /// Write the version header and `build <key>: dyndep`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the sink.
    pub fn begin(mut sink: W, key: &str, module_dir: &str) -> io::Result<Self> {
        sink.write_all(DYNDEP_VERSION_HEADER.as_bytes())?;
        write!(sink, "build {key}: dyndep")?;
        Ok(Self {
            sink,
            module_dir: module_dir.to_owned(),
            state: SeparatorState::default(),
            written: 0,
        })
    }

    /// Append the interface path for `name`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the sink.
    pub fn push(&mut self, name: &str) -> io::Result<()> {
        let (separator, next) = self.state.advance();
        write!(
            self.sink,
            "{separator} {}",
            InterfacePath {
                module_dir: &self.module_dir,
                name,
            }
        )?;
        self.state = next;
        self.written += 1;
        Ok(())
    }

    /// Number of input paths written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Terminate the statement, flush, and hand the sink back.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.sink.write_all(b"\n")?;
        self.sink.flush()?;
        Ok(self.sink)
    }
}

/// A complete dyndep file held in memory.
///
/// Renders byte-for-byte what [`DyndepWriter`] streams for the same inputs.
#[derive(Debug, Clone, Copy)]
pub struct DyndepFile<'a, S> {
    /// Output key the statement is written for.
    pub key: &'a str,
    /// Directory holding compiled module interfaces.
    pub module_dir: &'a str,
    /// Module names in discovery order.
    pub names: &'a [S],
}

impl<S: AsRef<str>> Display for DyndepFile<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{DYNDEP_VERSION_HEADER}build {}: dyndep", self.key)?;
        let mut state = SeparatorState::default();
        for name in self.names {
            let (separator, next) = state.advance();
            write!(
                f,
                "{separator} {}",
                InterfacePath {
                    module_dir: self.module_dir,
                    name: name.as_ref(),
                }
            )?;
            state = next;
        }
        writeln!(f)
    }
}

/// Render a dyndep file as a string.
#[must_use]
pub fn generate<S: AsRef<str>>(key: &str, module_dir: &str, names: &[S]) -> String {
    DyndepFile {
        key,
        module_dir,
        names,
    }
    .to_string()
}
