//! Lexical path normalization.
//!
//! Source identity is the normalized absolute path. Normalization is purely
//! lexical: `.` components are dropped and `..` pops the previous component.
//! The filesystem is never consulted, so symlinks are not resolved.

use std::path::{Component, Path, PathBuf};

/// Normalizes `path` lexically, removing `.` and folding `..` components.
///
/// A `..` at the root of an absolute path is discarded; a leading `..` in a
/// relative path is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolves `target` against `base` and normalizes the result.
///
/// Absolute targets ignore `base`.
pub fn resolve_path(base: &Path, target: impl AsRef<Path>) -> PathBuf {
    let target = target.as_ref();
    if target.is_absolute() {
        normalize_path(target)
    } else {
        normalize_path(&base.join(target))
    }
}
