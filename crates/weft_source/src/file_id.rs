//! Opaque identifier for source files tracked by a build session.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a source file in the [`SourceCache`](crate::SourceCache).
///
/// A path keeps the same `FileId` for the lifetime of the cache, including
/// cycles in which it was absent. Ids are never reused, even after a prune.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// A dummy file ID used for diagnostics that have no source location.
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw `u32` value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw `u32` value of this `FileId`.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
