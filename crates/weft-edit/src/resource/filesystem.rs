//! Filesystem seam used by the resource operation handler.

use std::fs;
use std::io;
use std::path::Path;

/// What currently exists at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Nothing exists at the path.
    Missing,
    /// A regular file (or anything that is not a directory).
    File,
    /// A directory.
    Directory,
}

impl EntryKind {
    /// Returns true when something exists at the path.
    #[must_use]
    pub const fn exists(self) -> bool {
        !matches!(self, Self::Missing)
    }
}

/// Fallible filesystem primitives needed by resource operations.
///
/// Tests substitute implementations to inject failures that are awkward to
/// provoke on a real filesystem.
pub trait FileSystem: Send + Sync {
    /// Reports what exists at `path` without following a missing entry into
    /// an error.
    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Removes a single file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Removes an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Removes a directory and everything below it.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Moves `from` to `to`, replacing `to` when it exists.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Creates an empty file, truncating any existing content.
    fn create_empty_file(&self, path: &Path) -> io::Result<()>;

    /// Creates a directory and any missing ancestors.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind> {
        match fs::symlink_metadata(path) {
            Ok(metadata) if metadata.is_dir() => Ok(EntryKind::Directory),
            Ok(_) => Ok(EntryKind::File),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(EntryKind::Missing),
            Err(error) => Err(error),
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn create_empty_file(&self, path: &Path) -> io::Result<()> {
        fs::write(path, b"")
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}
