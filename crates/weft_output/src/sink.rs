//! Output files and the sinks that receive them.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Which of the two output streams a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Emitted code.
    Code,
    /// Emitted declaration text.
    Declaration,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Code => write!(f, "code"),
            OutputKind::Declaration => write!(f, "declaration"),
        }
    }
}

/// One output file ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    /// Destination path.
    pub path: PathBuf,
    /// The source it was produced from; `None` for bundles.
    pub source: Option<PathBuf>,
    /// The stream the file belongs to.
    pub kind: OutputKind,
    /// File contents.
    pub contents: String,
}

/// An append-only destination for one output stream.
///
/// A sink receives zero or more files followed by exactly one `finish` call
/// per cycle.
pub trait OutputSink {
    /// Appends a file to the stream.
    fn push(&mut self, file: OutputFile) -> io::Result<()>;

    /// Signals the end of the cycle.
    fn finish(&mut self) -> io::Result<()>;
}

/// A sink that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Vec<OutputFile>,
    finished: bool,
}

impl MemorySink {
    /// Creates an empty, unfinished sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files received so far, in push order.
    pub fn files(&self) -> &[OutputFile] {
        &self.files
    }

    /// Whether `finish` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the contents pushed for `path`.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<&str> {
        let path = path.as_ref();
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.contents.as_str())
    }

    /// Destination paths in push order.
    pub fn paths(&self) -> Vec<&Path> {
        self.files.iter().map(|f| f.path.as_path()).collect()
    }

    /// Consumes the sink, returning its files.
    pub fn into_files(self) -> Vec<OutputFile> {
        self.files
    }
}

impl OutputSink for MemorySink {
    fn push(&mut self, file: OutputFile) -> io::Result<()> {
        if self.finished {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "push after the sink was finished",
            ));
        }
        self.files.push(file);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}
