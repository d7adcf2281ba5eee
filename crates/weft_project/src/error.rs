//! Fatal session errors.

use std::path::PathBuf;

use weft_compiler::CompileError;
use weft_config::ConfigError;
use weft_output::OutputError;
use weft_source::ResolveError;

/// Errors that abort a session operation.
///
/// Everything else surfaces as a diagnostic of the cycle.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The project configuration is unusable.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// A file from the project's explicit file list cannot be read.
    #[error("cannot read source file '{}': {source}", .path.display())]
    MissingSource {
        /// The unreadable path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The compiler refused to run.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// An output sink failed.
    #[error(transparent)]
    Emit(#[from] OutputError),
}

impl From<ResolveError> for SessionError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::MissingFileList => SessionError::Configuration(ConfigError::MissingFileList),
            ResolveError::CurrentDir(io) => SessionError::Configuration(ConfigError::IoError(io)),
        }
    }
}
