//! The authoritative set of source files across build cycles.
//!
//! Files are *staged* between cycles with [`SourceCache::upsert`]. Calling
//! [`SourceCache::reset`] commits the staged set as the next cycle and diffs it
//! against the previous one. Entries for paths missing from a cycle stay in the
//! cache until [`SourceCache::prune`] drops them, so a file that comes back keeps
//! its id and version history.
//!
//! Staged content is held apart from the committed file. [`SourceCache::iter`],
//! [`SourceCache::file`] and [`SourceCache::resolve_span`] always describe the
//! committed cycle; [`SourceCache::staged`] describes the upcoming one.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use weft_common::{normalize_path, resolve_path, ContentHash};

use crate::change_set::ChangeSet;
use crate::error::ResolveError;
use crate::file_id::FileId;
use crate::resolved_span::ResolvedSpan;
use crate::source_file::SourceFile;
use crate::span::Span;

/// Outcome of [`SourceCache::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upsert {
    /// The id of the inserted or updated file.
    pub id: FileId,
    /// Whether the content differs from what the previous cycle committed.
    ///
    /// A first-ever insertion counts as a change, and so does a path that was
    /// absent from the previous cycle.
    pub changed: bool,
}

struct Entry {
    /// The committed file, or the staged one for a path never committed.
    file: SourceFile,
    /// Staged content that differs from the committed `file`.
    pending: Option<SourceFile>,
    /// External flag for the staged content.
    external: bool,
    /// Hash committed by the last cycle this path took part in.
    committed: Option<ContentHash>,
    /// Staged for the upcoming cycle.
    staged: bool,
    /// Member of the most recently committed cycle.
    in_cycle: bool,
    /// Position in the committed cycle's iteration order.
    rank: usize,
    /// Cycle in which this path was last reported as changed.
    changed_in: u64,
}

impl Entry {
    fn new(file: SourceFile) -> Self {
        Self {
            file,
            pending: None,
            external: false,
            committed: None,
            staged: false,
            in_cycle: false,
            rank: usize::MAX,
            changed_in: 0,
        }
    }

    /// The content the upcoming cycle will commit.
    fn next(&self) -> &SourceFile {
        self.pending.as_ref().unwrap_or(&self.file)
    }

    fn stage(&mut self, content: String) {
        if self.committed.is_none() {
            self.file.replace_content(content);
            return;
        }
        match self.pending.as_mut() {
            Some(pending) => {
                pending.replace_content(content);
            }
            None if ContentHash::from_text(&content) != self.file.content_hash => {
                let mut next = SourceFile::new(
                    self.file.id,
                    self.file.path.clone(),
                    content,
                    self.file.version + 1,
                );
                next.is_external = self.external;
                self.pending = Some(next);
            }
            None => {}
        }
    }

    fn set_external(&mut self, external: bool) {
        self.external = external;
        match self.pending.as_mut() {
            Some(pending) => pending.is_external = external,
            None if self.committed.is_none() => self.file.is_external = external,
            None => {}
        }
    }
}

/// Commit markers of one entry before a [`SourceCache::reset`].
struct Saved {
    id: FileId,
    committed: Option<ContentHash>,
    in_cycle: bool,
    rank: usize,
    changed_in: u64,
    is_external: bool,
    /// The committed file that the reset replaced, if any.
    file: Option<SourceFile>,
}

/// State needed to undo the latest [`SourceCache::reset`].
struct Checkpoint {
    cycle: u64,
    members: Vec<FileId>,
    entries: Vec<Saved>,
}

/// Tracks source files, their versions and their membership in build cycles.
pub struct SourceCache {
    slots: Vec<Option<Entry>>,
    by_path: HashMap<PathBuf, FileId>,
    staged: Vec<FileId>,
    members: Vec<FileId>,
    cycle: u64,
    retired_versions: HashMap<PathBuf, u32>,
    checkpoint: Option<Checkpoint>,
}

impl SourceCache {
    /// Creates an empty cache that has not run a cycle yet.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            by_path: HashMap::new(),
            staged: Vec::new(),
            members: Vec::new(),
            cycle: 0,
            retired_versions: HashMap::new(),
            checkpoint: None,
        }
    }

    /// Resolves a configured relative file list against `base_dir`.
    ///
    /// Returns normalized absolute paths in list order with duplicates removed.
    /// Fails with [`ResolveError::MissingFileList`] when there is no list; finding
    /// files by glob is the caller's job in that case.
    pub fn resolve(
        files: Option<&[String]>,
        base_dir: &Path,
    ) -> Result<Vec<PathBuf>, ResolveError> {
        let files = files.ok_or(ResolveError::MissingFileList)?;
        let base = if base_dir.is_absolute() {
            normalize_path(base_dir)
        } else {
            resolve_path(&std::env::current_dir()?, base_dir)
        };

        let mut seen = HashSet::with_capacity(files.len());
        Ok(files
            .iter()
            .map(|file| resolve_path(&base, file))
            .filter(|path| seen.insert(path.clone()))
            .collect())
    }

    /// Stages `path` with `content` for the upcoming cycle.
    ///
    /// Inserts a new entry or updates the staged content of an existing one,
    /// bumping its version when the content differs. The committed file is left
    /// alone until [`reset`](Self::reset). Staging a path clears its external
    /// flag; call [`mark_external`](Self::mark_external) afterwards for
    /// referenced files.
    pub fn upsert(&mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Upsert {
        let path = normalize_path(path.as_ref());
        let content = content.into();

        let id = match self.by_path.get(&path) {
            Some(&id) => {
                if let Some(entry) = self.entry_mut(id) {
                    entry.stage(content);
                }
                id
            }
            None => {
                let id = FileId::from_raw(self.slots.len() as u32);
                let version = self.retired_versions.remove(&path).map_or(1, |v| v + 1);
                let file = SourceFile::new(id, path.clone(), content, version);
                self.slots.push(Some(Entry::new(file)));
                self.by_path.insert(path, id);
                id
            }
        };

        let mut newly_staged = false;
        let mut changed = true;
        if let Some(entry) = self.entry_mut(id) {
            entry.set_external(false);
            if !entry.staged {
                entry.staged = true;
                newly_staged = true;
            }
            changed = !(entry.in_cycle && entry.committed == Some(entry.next().content_hash));
        }
        if newly_staged {
            self.staged.push(id);
        }

        Upsert { id, changed }
    }

    /// Flags a file as resolved outside the project's declared file list.
    ///
    /// Returns `false` if the path is unknown.
    pub fn mark_external(&mut self, path: impl AsRef<Path>) -> bool {
        let path = normalize_path(path.as_ref());
        let Some(&id) = self.by_path.get(&path) else {
            return false;
        };
        match self.entry_mut(id) {
            Some(entry) => {
                entry.set_external(true);
                true
            }
            None => false,
        }
    }

    /// Commits the staged files as a new cycle and reports what changed.
    ///
    /// The staged set becomes the cycle's members in staging order, and staging
    /// starts over empty. Entries left out of the cycle are kept. The cycle can
    /// be undone with [`rollback`](Self::rollback) until the next reset.
    pub fn reset(&mut self) -> ChangeSet {
        self.checkpoint = Some(self.checkpoint());
        self.cycle += 1;
        let cycle = self.cycle;

        let removed: Vec<PathBuf> = self
            .members
            .iter()
            .filter_map(|id| self.slots[id.index()].as_ref())
            .filter(|entry| !entry.staged)
            .map(|entry| entry.file.path.clone())
            .collect();

        let mut added = Vec::new();
        let mut modified = Vec::new();
        let mut reappeared = Vec::new();
        let mut unchanged = Vec::new();

        // `in_cycle` still describes the previous cycle here.
        for &id in &self.staged {
            let Some(entry) = self.slots[id.index()].as_mut() else {
                continue;
            };
            let hash = entry.next().content_hash;
            let bucket = match entry.committed {
                None => &mut added,
                Some(_) if !entry.in_cycle => &mut reappeared,
                Some(prev) if prev != hash => &mut modified,
                Some(_) => {
                    unchanged.push(entry.file.path.clone());
                    continue;
                }
            };
            bucket.push(entry.file.path.clone());
            entry.changed_in = cycle;
        }

        for &id in &self.members {
            if let Some(entry) = self.slots[id.index()].as_mut() {
                entry.in_cycle = false;
                entry.rank = usize::MAX;
            }
        }

        let staged = std::mem::take(&mut self.staged);
        for (rank, &id) in staged.iter().enumerate() {
            if let Some(entry) = self.slots[id.index()].as_mut() {
                if let Some(pending) = entry.pending.take() {
                    entry.file = pending;
                }
                entry.file.is_external = entry.external;
                entry.committed = Some(entry.file.content_hash);
                entry.staged = false;
                entry.in_cycle = true;
                entry.rank = rank;
            }
        }
        self.members = staged;

        tracing::debug!(
            cycle,
            files = self.members.len(),
            added = added.len(),
            modified = modified.len(),
            reappeared = reappeared.len(),
            removed = removed.len(),
            "source cache cycle committed"
        );

        ChangeSet::new(cycle, added, modified, reappeared, removed, unchanged)
    }

    /// Undoes the latest [`reset`](Self::reset).
    ///
    /// The previous cycle becomes the committed one again, so the next reset
    /// reports changes against it. Staging is left empty, as after any reset.
    /// Returns `false` when there is nothing to undo.
    pub fn rollback(&mut self) -> bool {
        let Some(checkpoint) = self.checkpoint.take() else {
            return false;
        };

        for id in std::mem::take(&mut self.staged) {
            if let Some(entry) = self.entry_mut(id) {
                entry.staged = false;
                entry.pending = None;
            }
        }
        for id in self.members.clone() {
            if let Some(entry) = self.entry_mut(id) {
                entry.in_cycle = false;
                entry.rank = usize::MAX;
            }
        }
        for saved in checkpoint.entries {
            let Some(entry) = self.entry_mut(saved.id) else {
                continue;
            };
            if let Some(file) = saved.file {
                entry.file = file;
            }
            entry.file.is_external = saved.is_external;
            entry.external = saved.is_external;
            entry.committed = saved.committed;
            entry.in_cycle = saved.in_cycle;
            entry.rank = saved.rank;
            entry.changed_in = saved.changed_in;
        }
        self.members = checkpoint.members;
        self.cycle = checkpoint.cycle;

        tracing::debug!(cycle = self.cycle, "source cache cycle rolled back");
        true
    }

    fn checkpoint(&self) -> Checkpoint {
        let mut seen = HashSet::new();
        let entries = self
            .members
            .iter()
            .chain(&self.staged)
            .filter(|id| seen.insert(**id))
            .filter_map(|&id| {
                let entry = self.entry(id)?;
                Some(Saved {
                    id,
                    committed: entry.committed,
                    in_cycle: entry.in_cycle,
                    rank: entry.rank,
                    changed_in: entry.changed_in,
                    is_external: entry.file.is_external,
                    file: entry.pending.as_ref().map(|_| entry.file.clone()),
                })
            })
            .collect();
        Checkpoint {
            cycle: self.cycle,
            members: self.members.clone(),
            entries,
        }
    }

    /// Drops every entry whose path is not in `keep`.
    ///
    /// Dropped paths remember their last version, so re-adding one later keeps
    /// versions increasing. Returns the number of entries dropped.
    pub fn prune(&mut self, keep: &HashSet<PathBuf>) -> usize {
        let doomed: Vec<(PathBuf, FileId)> = self
            .by_path
            .iter()
            .filter(|(path, _)| !keep.contains(*path))
            .map(|(path, id)| (path.clone(), *id))
            .collect();

        self.checkpoint = None;
        for (path, id) in &doomed {
            if let Some(entry) = self.slots[id.index()].take() {
                self.retired_versions.insert(path.clone(), entry.next().version);
            }
            self.by_path.remove(path);
        }
        if !doomed.is_empty() {
            let slots = &self.slots;
            self.staged.retain(|id| slots[id.index()].is_some());
            self.members.retain(|id| slots[id.index()].is_some());
            for (rank, id) in self.members.iter().enumerate() {
                if let Some(entry) = self.slots[id.index()].as_mut() {
                    entry.rank = rank;
                }
            }
            tracing::debug!(pruned = doomed.len(), "source cache pruned");
        }
        doomed.len()
    }

    /// Returns `true` if `path` was reported as changed by the latest [`reset`](Self::reset).
    pub fn has_changed(&self, path: impl AsRef<Path>) -> bool {
        self.lookup(path.as_ref())
            .is_some_and(|entry| entry.in_cycle && entry.changed_in == self.cycle)
    }

    /// Iterates over the files of the committed cycle in deterministic input order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.members
            .iter()
            .filter_map(|id| self.slots[id.index()].as_ref().map(|e| &e.file))
    }

    /// Iterates over the files staged for the upcoming cycle, in staging order.
    pub fn staged(&self) -> impl Iterator<Item = &SourceFile> {
        self.staged
            .iter()
            .filter_map(|id| self.slots[id.index()].as_ref().map(Entry::next))
    }

    /// Returns the staged content of a file, if it is staged.
    pub fn staged_file(&self, id: FileId) -> Option<&SourceFile> {
        self.entry(id).filter(|e| e.staged).map(Entry::next)
    }

    /// Returns `true` if `path` is staged for the upcoming cycle.
    pub fn is_staged(&self, path: impl AsRef<Path>) -> bool {
        self.lookup(path.as_ref()).is_some_and(|entry| entry.staged)
    }

    /// Returns the position of a file in the committed cycle's order.
    pub fn position(&self, id: FileId) -> Option<usize> {
        self.entry(id)
            .filter(|entry| entry.in_cycle)
            .map(|entry| entry.rank)
    }

    /// Returns the committed file at `path`, whether or not it is in the current
    /// cycle. A path that was never committed yields its staged content.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&SourceFile> {
        self.lookup(path.as_ref()).map(|e| &e.file)
    }

    /// Returns the file with the given id, if it has not been pruned.
    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.entry(id).map(|e| &e.file)
    }

    /// Returns `true` if `path` is part of the committed cycle.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.lookup(path.as_ref()).is_some_and(|entry| entry.in_cycle)
    }

    /// Returns the number of files in the committed cycle.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the committed cycle has no files.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the number of entries held, including ones absent from the cycle.
    pub fn entry_count(&self) -> usize {
        self.by_path.len()
    }

    /// Returns the number of cycles committed so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Resolves a [`Span`] to line/column coordinates.
    pub fn resolve_span(&self, span: Span) -> Option<ResolvedSpan> {
        let file = self.file(span.file)?;
        let (start_line, start_col) = file.line_col(span.start);
        let (end_line, end_col) = file.line_col(span.end.saturating_sub(1).max(span.start));
        Some(ResolvedSpan {
            file_path: file.path.clone(),
            start_line,
            start_col,
            end_line,
            end_col,
        })
    }

    fn lookup(&self, path: &Path) -> Option<&Entry> {
        let id = match self.by_path.get(path) {
            Some(id) => *id,
            None => *self.by_path.get(&normalize_path(path))?,
        };
        self.entry(id)
    }

    fn entry(&self, id: FileId) -> Option<&Entry> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, id: FileId) -> Option<&mut Entry> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> PathBuf {
        PathBuf::from(format!("/proj/{name}"))
    }

    fn cycle_of(cache: &mut SourceCache, files: &[(&str, &str)]) -> ChangeSet {
        for (name, content) in files {
            cache.upsert(p(name), *content);
        }
        cache.reset()
    }

    // -- resolve --

    #[test]
    fn resolve_against_base() {
        let files = vec!["a.ts".to_string(), "./lib/../b.ts".to_string()];
        let resolved = SourceCache::resolve(Some(&files), Path::new("/proj")).unwrap();
        assert_eq!(resolved, vec![p("a.ts"), p("b.ts")]);
    }

    #[test]
    fn resolve_removes_duplicates_keeping_first() {
        let files = vec!["b.ts".to_string(), "a.ts".to_string(), "./b.ts".to_string()];
        let resolved = SourceCache::resolve(Some(&files), Path::new("/proj")).unwrap();
        assert_eq!(resolved, vec![p("b.ts"), p("a.ts")]);
    }

    #[test]
    fn resolve_without_list_fails() {
        let err = SourceCache::resolve(None, Path::new("/proj")).unwrap_err();
        assert!(matches!(err, ResolveError::MissingFileList));
    }

    #[test]
    fn resolve_relative_base_is_anchored() {
        let files = vec!["a.ts".to_string()];
        let resolved = SourceCache::resolve(Some(&files), Path::new("proj")).unwrap();
        assert!(resolved[0].is_absolute());
        assert!(resolved[0].ends_with("proj/a.ts"));
    }

    // -- upsert --

    #[test]
    fn first_insert_counts_as_change() {
        let mut cache = SourceCache::new();
        let up = cache.upsert(p("a.ts"), "let a;");
        assert!(up.changed);
        assert_eq!(cache.file(up.id).unwrap().version, 1);
        assert!(cache.is_staged(p("a.ts")));
    }

    #[test]
    fn unchanged_content_after_cycle() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "let a;")]);
        let up = cache.upsert(p("a.ts"), "let a;");
        assert!(!up.changed);
        assert_eq!(cache.staged_file(up.id).unwrap().version, 1);
    }

    #[test]
    fn modified_content_bumps_version() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "let a;")]);
        let up = cache.upsert(p("a.ts"), "let a = 2;");
        assert!(up.changed);
        assert_eq!(cache.staged_file(up.id).unwrap().version, 2);
        assert_eq!(cache.file(up.id).unwrap().version, 1);
    }

    #[test]
    fn reverting_within_staging_is_not_a_change() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "v1")]);
        cache.upsert(p("a.ts"), "v2");
        let up = cache.upsert(p("a.ts"), "v1");
        assert!(!up.changed);
        assert_eq!(cache.staged_file(up.id).unwrap().version, 3);
        assert!(cache.reset().is_empty());
        assert_eq!(cache.file(up.id).unwrap().version, 3);
    }

    #[test]
    fn paths_are_normalized() {
        let mut cache = SourceCache::new();
        let a = cache.upsert("/proj/src/../a.ts", "x");
        let b = cache.upsert("/proj/./a.ts", "x");
        assert_eq!(a.id, b.id);
        assert_eq!(cache.staged().count(), 1);
    }

    #[test]
    fn mark_external() {
        let mut cache = SourceCache::new();
        cache.upsert(p("typings/node.d.ts"), "declare var process: any;");
        assert!(cache.mark_external(p("typings/node.d.ts")));
        assert!(cache.get(p("typings/node.d.ts")).unwrap().is_external);
        assert!(!cache.mark_external(p("missing.ts")));

        // Staging the path again as a project file clears the flag.
        cache.upsert(p("typings/node.d.ts"), "declare var process: any;");
        assert!(!cache.get(p("typings/node.d.ts")).unwrap().is_external);
    }

    // -- reset --

    #[test]
    fn first_cycle_everything_added() {
        let mut cache = SourceCache::new();
        let cs = cycle_of(&mut cache, &[("a.ts", "a"), ("b.ts", "b")]);
        assert_eq!(cs.cycle, 1);
        assert_eq!(cs.added, vec![p("a.ts"), p("b.ts")]);
        assert!(cs.modified.is_empty() && cs.removed.is_empty());
        assert!(cache.has_changed(p("a.ts")));
    }

    #[test]
    fn only_modified_file_in_change_set() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "a"), ("b.ts", "b")]);
        let cs = cycle_of(&mut cache, &[("a.ts", "a"), ("b.ts", "b2")]);
        let changed: Vec<_> = cs.changed().cloned().collect();
        assert_eq!(changed, vec![p("b.ts")]);
        assert_eq!(cs.unchanged, vec![p("a.ts")]);
        assert!(cache.has_changed(p("b.ts")));
        assert!(!cache.has_changed(p("a.ts")));
    }

    #[test]
    fn unstaged_file_is_removed_but_kept() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "a"), ("b.ts", "b")]);
        let cs = cycle_of(&mut cache, &[("a.ts", "a")]);
        assert_eq!(cs.removed, vec![p("b.ts")]);
        assert!(!cache.contains(p("b.ts")));
        assert!(cache.get(p("b.ts")).is_some());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.entry_count(), 2);
    }

    #[test]
    fn reappearing_file_keeps_identity() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "a"), ("b.ts", "b")]);
        let id = cache.get(p("b.ts")).unwrap().id;
        cycle_of(&mut cache, &[("a.ts", "a")]);
        let up = cache.upsert(p("b.ts"), "b");
        assert!(up.changed);
        assert_eq!(up.id, id);
        cache.upsert(p("a.ts"), "a");
        let cs = cache.reset();
        assert_eq!(cs.reappeared, vec![p("b.ts")]);
        assert!(cs.added.is_empty());
        assert_eq!(cache.file(id).unwrap().version, 1);
    }

    #[test]
    fn iteration_follows_staging_order() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("z.ts", "z"), ("a.ts", "a"), ("m.ts", "m")]);
        let order: Vec<_> = cache.iter().map(|f| f.path.clone()).collect();
        assert_eq!(order, vec![p("z.ts"), p("a.ts"), p("m.ts")]);
        let a = cache.get(p("a.ts")).unwrap().id;
        assert_eq!(cache.position(a), Some(1));
    }

    #[test]
    fn staging_does_not_disturb_committed_view() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "a")]);
        cache.upsert(p("b.ts"), "b");
        assert_eq!(cache.len(), 1);
        assert!(!cache.contains(p("b.ts")));
        assert_eq!(cache.staged().count(), 1);
    }

    #[test]
    fn staged_content_stays_out_of_committed_view() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "let a;\n")]);
        let id = cache.upsert(p("a.ts"), "éééé").id;

        let committed: Vec<_> = cache.iter().map(|f| f.content.as_str()).collect();
        assert_eq!(committed, ["let a;\n"]);
        assert_eq!(cache.get(p("a.ts")).unwrap().content, "let a;\n");
        assert_eq!(cache.staged_file(id).unwrap().content, "éééé");
        let staged: Vec<_> = cache.staged().map(|f| f.content.as_str()).collect();
        assert_eq!(staged, ["éééé"]);

        let resolved = cache.resolve_span(Span::new(id, 4, 6)).unwrap();
        assert_eq!((resolved.start_line, resolved.start_col), (1, 5));

        cache.reset();
        assert_eq!(cache.get(p("a.ts")).unwrap().content, "éééé");
        assert!(cache.staged_file(id).is_none());
    }

    #[test]
    fn external_flag_applies_on_commit() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("lib.d.ts", "declare var x: any;")]);
        cache.upsert(p("lib.d.ts"), "declare var x: any;");
        cache.mark_external(p("lib.d.ts"));
        assert!(!cache.get(p("lib.d.ts")).unwrap().is_external);
        cache.reset();
        assert!(cache.get(p("lib.d.ts")).unwrap().is_external);
    }

    // -- rollback --

    #[test]
    fn rollback_restores_previous_cycle() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "v1"), ("b.ts", "b")]);
        let failed = cycle_of(&mut cache, &[("a.ts", "v2"), ("c.ts", "c")]);
        assert_eq!(failed.cycle, 2);

        assert!(cache.rollback());
        assert_eq!(cache.cycle(), 1);
        let paths: Vec<_> = cache.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![p("a.ts"), p("b.ts")]);
        assert_eq!(cache.get(p("a.ts")).unwrap().content, "v1");
        assert!(!cache.contains(p("c.ts")));
        assert_eq!(cache.staged().count(), 0);
        assert!(!cache.rollback());
    }

    #[test]
    fn changes_after_rollback_are_reported_again() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "v1"), ("b.ts", "b")]);
        cycle_of(&mut cache, &[("a.ts", "v2"), ("b.ts", "b"), ("c.ts", "c")]);
        cache.rollback();

        let cs = cycle_of(&mut cache, &[("a.ts", "v2"), ("b.ts", "b"), ("c.ts", "c")]);
        assert_eq!(cs.cycle, 2);
        assert_eq!(cs.modified, vec![p("a.ts")]);
        assert_eq!(cs.added, vec![p("c.ts")]);
        assert_eq!(cs.unchanged, vec![p("b.ts")]);
        assert!(cache.has_changed(p("a.ts")));
        assert_eq!(cache.get(p("a.ts")).unwrap().version, 2);
    }

    // -- prune --

    #[test]
    fn prune_drops_unkept_entries() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "a"), ("b.ts", "b")]);
        cycle_of(&mut cache, &[("a.ts", "a")]);
        let keep: HashSet<PathBuf> = [p("a.ts")].into_iter().collect();
        assert_eq!(cache.prune(&keep), 1);
        assert!(cache.get(p("b.ts")).is_none());
        assert_eq!(cache.entry_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn versions_survive_prune() {
        let mut cache = SourceCache::new();
        cycle_of(&mut cache, &[("a.ts", "v1")]);
        cycle_of(&mut cache, &[("a.ts", "v2")]);
        assert_eq!(cache.get(p("a.ts")).unwrap().version, 2);
        cache.prune(&HashSet::new());
        assert!(cache.is_empty());

        let up = cache.upsert(p("a.ts"), "v3");
        assert_eq!(cache.file(up.id).unwrap().version, 3);
        let cs = cache.reset();
        assert_eq!(cs.added, vec![p("a.ts")]);
    }

    // -- spans --

    #[test]
    fn resolve_span_to_line_col() {
        let mut cache = SourceCache::new();
        let up = cache.upsert(p("a.ts"), "abc\ndef\nghi");
        let resolved = cache.resolve_span(Span::new(up.id, 4, 7)).unwrap();
        assert_eq!(resolved.file_path, p("a.ts"));
        assert_eq!((resolved.start_line, resolved.start_col), (2, 1));
        assert_eq!((resolved.end_line, resolved.end_col), (2, 3));
        assert!(cache.resolve_span(Span::DUMMY).is_none());
    }
}
