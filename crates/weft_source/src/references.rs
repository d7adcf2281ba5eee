//! Header reference markers.
//!
//! A source file may begin with triple-slash markers such as
//! `/// <reference path="lib/util.ts" />`. They declare that the file depends on
//! another file for output ordering purposes. Only the file header is scanned:
//! blank lines, `//` line comments and `/* */` block comments. The first line of
//! code ends the header.

use std::path::{Path, PathBuf};

use weft_common::resolve_path;

use crate::file_id::FileId;
use crate::span::Span;

/// A reference marker found in a file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The path exactly as written between the quotes.
    pub raw: String,
    /// The referenced path, resolved against the referencing file's directory.
    pub path: PathBuf,
    /// The span of the quoted path text.
    pub span: Span,
}

/// Parses the header reference markers of a file.
///
/// `file_path` is the (normalized, absolute) path of the referencing file; each
/// reference is resolved relative to its parent directory. Markers that are
/// malformed or use another attribute (`types=`, `lib=`) are skipped.
pub fn parse_references(file: FileId, file_path: &Path, content: &str) -> Vec<Reference> {
    let dir = file_path.parent().unwrap_or_else(|| Path::new(""));
    let mut refs = Vec::new();
    let mut offset = 0usize;
    let mut in_block_comment = false;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim();

        if in_block_comment {
            if let Some(end) = trimmed.find("*/") {
                in_block_comment = false;
                if !trimmed[end + 2..].trim().is_empty() {
                    break;
                }
            }
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("///") {
            let lead = line.len() - line.trim_start().len() + 3;
            if let Some((start, end)) = directive_path_range(rest) {
                let raw = &rest[start..end];
                let abs_start = line_start + lead + start;
                let abs_end = line_start + lead + end;
                refs.push(Reference {
                    raw: raw.to_string(),
                    path: resolve_path(dir, raw),
                    span: Span::new(file, abs_start as u32, abs_end as u32),
                });
            }
            continue;
        }
        if trimmed.starts_with("//") {
            continue;
        }
        if let Some(body) = trimmed.strip_prefix("/*") {
            match body.find("*/") {
                Some(end) if body[end + 2..].trim().is_empty() => continue,
                Some(_) => break,
                None => {
                    in_block_comment = true;
                    continue;
                }
            }
        }
        break;
    }

    refs
}

/// Returns the byte range of the quoted path in `<reference path="..." />`.
///
/// `text` is everything after the leading `///`. The `path` attribute must come
/// first and the marker must be closed with `/>`.
fn directive_path_range(text: &str) -> Option<(usize, usize)> {
    let body_start = text.len() - text.trim_start().len();
    let after_tag = text[body_start..].strip_prefix("<reference")?;

    let attr = after_tag.trim_start();
    if attr.len() == after_tag.len() {
        // `<referencepath=` or `<reference>` is not a marker
        return None;
    }
    let after_name = attr.strip_prefix("path")?.trim_start();
    let after_eq = after_name.strip_prefix('=')?.trim_start();

    let quote = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &after_eq[1..];
    let close = value.find(quote)?;
    if close == 0 || !value[close + 1..].contains("/>") {
        return None;
    }

    let value_start = text.len() - value.len();
    Some((value_start, value_start + close))
}
