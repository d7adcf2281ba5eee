//! The per-cycle summary of what changed in the source set.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Result of committing a build cycle in the [`SourceCache`](crate::SourceCache).
///
/// Every path staged for the cycle lands in exactly one of `added`, `modified`,
/// `reappeared` or `unchanged`. Paths that were part of the previous cycle but
/// were not staged again land in `removed`. All lists follow cycle order.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// The cycle number this change set opened (1 for the first cycle).
    pub cycle: u64,
    /// Paths never committed before.
    pub added: Vec<PathBuf>,
    /// Paths whose content hash differs from the previous cycle.
    pub modified: Vec<PathBuf>,
    /// Paths known to the cache that were absent from the previous cycle.
    pub reappeared: Vec<PathBuf>,
    /// Paths in the previous cycle that were not staged for this one.
    pub removed: Vec<PathBuf>,
    /// Paths whose content matches the previous cycle.
    pub unchanged: Vec<PathBuf>,
    dirty: HashSet<PathBuf>,
}

impl ChangeSet {
    /// Assembles a change set, indexing the dirty paths for constant-time lookup.
    pub fn new(
        cycle: u64,
        added: Vec<PathBuf>,
        modified: Vec<PathBuf>,
        reappeared: Vec<PathBuf>,
        removed: Vec<PathBuf>,
        unchanged: Vec<PathBuf>,
    ) -> Self {
        let dirty = added
            .iter()
            .chain(&modified)
            .chain(&reappeared)
            .chain(&removed)
            .cloned()
            .collect();
        Self {
            cycle,
            added,
            modified,
            reappeared,
            removed,
            unchanged,
            dirty,
        }
    }

    /// Returns `true` if nothing was added, modified, reappeared or removed.
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Iterates over the paths whose content needs re-analysis.
    pub fn changed(&self) -> impl Iterator<Item = &PathBuf> {
        self.added
            .iter()
            .chain(&self.modified)
            .chain(&self.reappeared)
    }

    /// Returns `true` if `path` was changed or removed in this cycle.
    pub fn contains(&self, path: &Path) -> bool {
        self.dirty.contains(path)
    }

    /// Returns the number of files that need re-analysis.
    pub fn dirty_count(&self) -> usize {
        self.added.len() + self.modified.len() + self.reappeared.len()
    }
}
