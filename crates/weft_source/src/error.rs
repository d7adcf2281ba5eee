//! Errors raised while turning a configured file list into source paths.

/// Errors from [`SourceCache::resolve`](crate::SourceCache::resolve).
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The configuration has no explicit `files` list to resolve.
    #[error("no 'files' list is configured; supply the sources from a file glob instead")]
    MissingFileList,

    /// A relative base directory could not be anchored to the working directory.
    #[error("failed to determine the working directory: {0}")]
    CurrentDir(#[from] std::io::Error),
}
