//! A tracked source file with its version history and header references.

use crate::file_id::FileId;
use crate::references::{parse_references, Reference};
use std::path::{Path, PathBuf};
use weft_common::ContentHash;

/// A source file tracked by the [`SourceCache`](crate::SourceCache).
///
/// The path is the file's identity. Each content change bumps `version`; the
/// version never decreases for a given path.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// The identifier of this file within its cache.
    pub id: FileId,
    /// The normalized absolute path of the file.
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Monotonic content version, starting at 1.
    pub version: u32,
    /// Hash of the current content.
    pub content_hash: ContentHash,
    /// Header reference markers, in declaration order.
    pub references: Vec<Reference>,
    /// Whether the file was pulled in by reference rather than listed by the project.
    pub is_external: bool,
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Creates a file at `version`, parsing its header references.
    pub fn new(id: FileId, path: PathBuf, content: String, version: u32) -> Self {
        let references = parse_references(id, &path, &content);
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::from_text(&content);
        Self {
            id,
            path,
            content,
            version,
            content_hash,
            references,
            is_external: false,
            line_starts,
        }
    }

    /// Replaces the content if it differs, bumping the version.
    ///
    /// Returns `true` when the content actually changed.
    pub(crate) fn replace_content(&mut self, content: String) -> bool {
        let hash = ContentHash::from_text(&content);
        if hash == self.content_hash {
            return false;
        }
        self.references = parse_references(self.id, &self.path, &content);
        self.line_starts = compute_line_starts(&content);
        self.content_hash = hash;
        self.content = content;
        self.version += 1;
        true
    }

    /// Returns `true` for ambient declaration files (`*.d.ts`).
    pub fn is_declaration(&self) -> bool {
        is_declaration_path(&self.path)
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns the length of the content in bytes.
    pub fn len(&self) -> u32 {
        self.content.len() as u32
    }

    /// Returns `true` if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Returns `true` if `path` names a declaration file (`*.d.ts`).
pub fn is_declaration_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".d.ts"))
}

fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}
