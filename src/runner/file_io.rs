//! File helpers for the scan runner.
//! Opens the source file and creates dyndep files through capability-based
//! directories.

use super::RunnerError;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{
    ambient_authority,
    fs_utf8::{Dir, File as Utf8File},
};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};

/// Label used for standard output in logs and errors.
pub const STDOUT_LABEL: &str = "<stdout>";

pub fn open_source(path: &Utf8Path) -> Result<BufReader<File>, RunnerError> {
    File::open(path).map(BufReader::new).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            RunnerError::SourceNotFound {
                path: path.to_owned(),
            }
        } else {
            RunnerError::OpenSource {
                path: path.to_owned(),
                source,
            }
        }
    })
}

fn absolute(path: &Utf8Path) -> io::Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }
    let cwd = Utf8PathBuf::try_from(env::current_dir()?).map_err(|err| err.into_io_error())?;
    Ok(cwd.join(path))
}

/// Split `path` into the deepest existing ancestor directory and the
/// remaining relative path.
fn derive_dir_and_relative(path: &Utf8Path) -> io::Result<(Dir, Utf8PathBuf)> {
    let absolute_path = absolute(path)?;
    let mut ancestors = absolute_path.ancestors();
    ancestors.next();
    let (base, dir) = ancestors
        .find_map(|candidate| {
            Dir::open_ambient_dir(candidate, ambient_authority())
                .ok()
                .map(|dir| (candidate.to_owned(), dir))
        })
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no existing ancestor directory for {path}"),
            )
        })?;
    let relative = absolute_path
        .strip_prefix(&base)
        .map_err(io::Error::other)?
        .to_owned();
    Ok((dir, relative))
}

fn create_in(dir: &Dir, path: &Utf8Path) -> io::Result<Utf8File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        dir.create_dir_all(parent)?;
    }
    dir.create(path)
}

/// Create (or truncate) the dyndep file, creating missing parent directories.
pub fn create_output(path: &Utf8Path) -> Result<Utf8File, RunnerError> {
    derive_dir_and_relative(path)
        .and_then(|(dir, relative)| create_in(&dir, &relative))
        .map_err(|source| RunnerError::CreateOutput {
            path: path.to_owned(),
            source,
        })
}

fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}

/// Writer adapter that treats a closed pipe as a successful write.
///
/// A consumer that stops reading standard output early is not an error for
/// the scanner.
#[derive(Debug)]
pub struct IgnoreBrokenPipe<W>(W);

impl<W: Write> IgnoreBrokenPipe<W> {
    #[must_use]
    pub const fn new(inner: W) -> Self {
        Self(inner)
    }
}

impl<W: Write> Write for IgnoreBrokenPipe<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.write(buf) {
            Err(err) if is_broken_pipe(&err) => Ok(buf.len()),
            result => result,
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.0.flush() {
            Err(err) if is_broken_pipe(&err) => Ok(()),
            result => result,
        }
    }
}
