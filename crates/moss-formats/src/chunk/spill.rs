//! Temporary storage for payloads too large to keep in memory

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Scratch directory holding spilled chunk payloads
///
/// File-backed chunks only keep the path of their data. The store owns the
/// files: dropping it removes the directory and everything spilled into it,
/// so it must outlive every chunk tree read with it.
#[derive(Debug)]
pub struct SpillStore {
    dir: TempDir,
}

impl SpillStore {
    /// Create a store in the system temporary directory
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("moss-chunks-").tempdir()?;
        Ok(Self { dir })
    }

    /// Create a store below `parent`
    pub fn new_in(parent: impl AsRef<Path>) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("moss-chunks-")
            .tempdir_in(parent)?;
        Ok(Self { dir })
    }

    /// Directory holding the spilled files
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a new empty file in the store
    pub fn create_file(&self) -> io::Result<(File, PathBuf)> {
        tempfile::Builder::new()
            .prefix("payload-")
            .suffix(".bin")
            .tempfile_in(self.dir.path())?
            .keep()
            .map_err(|e| e.error)
    }

    /// Delete the store now, reporting any cleanup error
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}
