//! Where a session reads source text from.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use weft_common::normalize_path;

/// Reads source files for a session.
pub trait SourceLoader {
    /// Returns the text of the file at `path`.
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// An in-memory file table.
///
/// Clones share the same table, so a caller can keep a handle and edit files
/// while a session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemoryLoader {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, builder style.
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.lock()
            .insert(normalize_path(path.as_ref()), content.into());
    }

    /// Removes a file. Returns `true` if it existed.
    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        self.lock().remove(&normalize_path(path.as_ref())).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SourceLoader for MemoryLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.lock()
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such file: {}", path.display()),
                )
            })
    }
}
