//! Defines the [`iterate_dir`] function which drives every pass of a build:
//! it lists the files directly inside a directory, reads each one into memory
//! and hands it to a [`Visitor`]. Subdirectories are skipped, never recursed
//! into.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A single file read from a source directory. Entries only live for the
/// duration of one [`Visitor::visit`] call.
#[derive(Debug)]
pub struct FileEntry {
    /// The file's base name, extension included (e.g., `intro.md`).
    pub name: String,

    /// The full path to the file on disk.
    pub path: PathBuf,

    /// The raw contents of the file.
    pub contents: Vec<u8>,
}

impl FileEntry {
    /// Returns the contents as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }
}

/// Processes one file per call. Implemented by the markdown and partial
/// collectors and by the template compiler.
pub trait Visitor {
    /// The error a visit can fail with. Infallible visitors use
    /// [`std::convert::Infallible`].
    type Error;

    fn visit(&mut self, entry: &FileEntry) -> std::result::Result<(), Self::Error>;
}

/// Calls `visitor` for every non-directory entry directly inside `dir`, in
/// file-name order, and returns the number of files visited. The first error
/// (listing the directory, reading a file, or returned by the visitor) stops
/// the iteration and is returned; no further entries are read.
pub fn iterate_dir<V: Visitor>(dir: &Path, visitor: &mut V) -> Result<usize, V::Error> {
    let mut visited = 0;
    for result in WalkDir::new(dir)
        .max_depth(1)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let dir_entry = result.map_err(|err| Error::ListDirectory {
            path: dir.to_owned(),
            err,
        })?;
        if dir_entry.depth() == 0 {
            // The root itself; it may be a symlink to a directory.
            if !dir_entry.file_type().is_dir() && !dir.is_dir() {
                return Err(Error::NotADirectory {
                    path: dir.to_owned(),
                });
            }
            continue;
        }
        if dir_entry.file_type().is_dir() {
            debug!(path = %dir_entry.path().display(), "skipping subdirectory");
            continue;
        }

        let entry = read_entry(dir_entry.path()).map_err(|err| Error::ReadFile {
            path: dir_entry.path().to_owned(),
            err,
        })?;
        debug!(path = %entry.path.display(), bytes = entry.contents.len(), "visiting");
        visitor.visit(&entry).map_err(Error::Visit)?;
        visited += 1;
    }

    Ok(visited)
}

// The handle is dropped before returning, so no file stays open across
// visits.
fn read_entry(path: &Path) -> std::io::Result<FileEntry> {
    let mut contents = Vec::new();
    File::open(path)?.read_to_end(&mut contents)?;

    Ok(FileEntry {
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_owned(),
        contents,
    })
}

/// The result of a directory pass.
pub type Result<T, E> = std::result::Result<T, Error<E>>;

/// Represents an error during a directory pass. `E` is the error type of the
/// [`Visitor`] driving the pass.
#[derive(Debug)]
pub enum Error<E> {
    /// Returned when the directory can't be opened or its listing can't be
    /// read.
    ListDirectory { path: PathBuf, err: walkdir::Error },

    /// Returned when the path to list exists but isn't a directory.
    NotADirectory { path: PathBuf },

    /// Returned when a file in the directory can't be opened or read.
    ReadFile { path: PathBuf, err: std::io::Error },

    /// Returned when the visitor fails on a file.
    Visit(E),
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ListDirectory { path, err } => {
                write!(f, "Listing directory '{}': {}", path.display(), err)
            }
            Error::NotADirectory { path } => {
                write!(f, "Listing directory '{}': not a directory", path.display())
            }
            Error::ReadFile { path, err } => {
                write!(f, "Reading file '{}': {}", path.display(), err)
            }
            Error::Visit(err) => err.fmt(f),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for Error<E> {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ListDirectory { path: _, err } => Some(err),
            Error::NotADirectory { .. } => None,
            Error::ReadFile { path: _, err } => Some(err),
            Error::Visit(err) => Some(err),
        }
    }
}
