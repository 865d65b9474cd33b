//! Scan execution.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! opens the source, opens the destination, and streams every recognised
//! reference from [`Scanner`] into a [`DyndepWriter`].

mod error;
mod file_io;

pub use error::RunnerError;

use crate::cli::{Cli, Destination};
use crate::dyndep::DyndepWriter;
use crate::scanner::Scanner;
use camino::Utf8Path;
use file_io::{IgnoreBrokenPipe, STDOUT_LABEL, create_output, open_source};
use std::io::{self, BufRead, BufWriter, Write};
use tracing::{debug, info};

/// Execute the scan described by `cli`.
///
/// The source is opened before the destination so a missing source never
/// truncates an existing dyndep file.
///
/// # Errors
///
/// Returns [`RunnerError`] when the source cannot be opened or read, or when
/// the dyndep output cannot be created or written.
pub fn run(cli: &Cli) -> Result<(), RunnerError> {
    let reader = open_source(&cli.source)?;
    let job = ScanJob {
        source: &cli.source,
        key: &cli.key,
        module_dir: cli.module_dir.as_str(),
    };
    let (label, count) = match cli.destination() {
        Destination::Stdout => {
            let sink = IgnoreBrokenPipe::new(io::stdout().lock());
            (STDOUT_LABEL.to_owned(), job.stream(reader, sink, STDOUT_LABEL)?)
        }
        Destination::File(path) => {
            let sink = BufWriter::new(create_output(&path)?);
            let count = job.stream(reader, sink, path.as_str())?;
            (path.into_string(), count)
        }
    };
    info!(
        source = %cli.source,
        references = count,
        destination = %label,
        "wrote dyndep file"
    );
    Ok(())
}

/// Parameters of a single source-to-dyndep pass.
struct ScanJob<'a> {
    source: &'a Utf8Path,
    key: &'a str,
    module_dir: &'a str,
}

impl ScanJob<'_> {
    /// Stream references from `reader` into `sink`, returning how many were
    /// written.
    fn stream<R: BufRead, W: Write>(
        &self,
        reader: R,
        sink: W,
        destination: &str,
    ) -> Result<usize, RunnerError> {
        let write_failed = |source: io::Error| RunnerError::WriteOutput {
            destination: destination.to_owned(),
            source,
        };
        let mut writer =
            DyndepWriter::begin(sink, self.key, self.module_dir).map_err(write_failed)?;
        let mut scanner = Scanner::new(reader);
        for item in scanner.by_ref() {
            let (line, reference) = item.map_err(|source| RunnerError::ReadSource {
                path: self.source.to_owned(),
                source,
            })?;
            debug!(
                line = line + 1,
                kind = ?reference.kind,
                name = %reference.name,
                "found module reference"
            );
            writer.push(&reference.name).map_err(write_failed)?;
        }
        let count = writer.written();
        writer.finish().map_err(write_failed)?;
        debug!(lines = scanner.lines_read(), "finished scanning source");
        Ok(count)
    }
}
