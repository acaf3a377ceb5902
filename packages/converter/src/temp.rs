//! Temporary files created during a run.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Files to delete when the run ends.
///
/// Release happens on drop, so every exit path of a conversion, including
/// early returns on error, cleans up.
#[derive(Debug, Default)]
pub struct TempFiles {
    paths: Vec<PathBuf>,
}

impl TempFiles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file for deletion.
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    /// Files currently tracked.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Create `path` with `contents` and track it.
    ///
    /// A file that already exists belongs to someone else: it is neither
    /// overwritten nor tracked. Returns whether the file was created.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be created or written.
    pub fn write(&mut self, path: &Path, contents: &[u8]) -> std::io::Result<bool> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(path = %path.display(), "keeping existing file");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        self.track(path);
        file.write_all(contents)?;
        Ok(true)
    }

    /// Delete all tracked files now.
    ///
    /// Files that are already gone are ignored; other failures are logged.
    pub fn release(&mut self) {
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed temporary file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not remove temporary file");
                }
            }
        }
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        self.release();
    }
}
