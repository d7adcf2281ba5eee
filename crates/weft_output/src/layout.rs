//! Where outputs land on disk.

use std::path::{Path, PathBuf};

use weft_config::BuildConfiguration;

/// Maps sources to output paths.
///
/// Per-file outputs go next to their source, or under `outDir` with the
/// source's path relative to the base directory preserved. A bundle writes the
/// configured `out` path plus a `.d.ts` sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    base_dir: PathBuf,
    out_dir: Option<PathBuf>,
    bundle: Option<PathBuf>,
}

impl OutputLayout {
    /// Creates a layout from explicit directories.
    pub fn new(base_dir: PathBuf, out_dir: Option<PathBuf>, bundle: Option<PathBuf>) -> Self {
        Self {
            base_dir,
            out_dir,
            bundle,
        }
    }

    /// Derives the layout from a build configuration.
    pub fn from_config(config: &BuildConfiguration) -> Self {
        Self::new(config.base_dir(), config.out_dir(), config.out_path())
    }

    /// Code output path for `source`.
    pub fn code_path(&self, source: &Path) -> PathBuf {
        self.relocate(source).with_extension("js")
    }

    /// Declaration output path for `source`.
    pub fn declaration_path(&self, source: &Path) -> PathBuf {
        self.relocate(source).with_extension("d.ts")
    }

    /// The bundle's code and declaration paths, if bundling.
    pub fn bundle_paths(&self) -> Option<(PathBuf, PathBuf)> {
        self.bundle
            .as_ref()
            .map(|out| (out.clone(), out.with_extension("d.ts")))
    }

    fn relocate(&self, source: &Path) -> PathBuf {
        let Some(out_dir) = &self.out_dir else {
            return source.to_path_buf();
        };
        match source.strip_prefix(&self.base_dir) {
            Ok(relative) => out_dir.join(relative),
            Err(_) => out_dir.join(source.file_name().unwrap_or(source.as_os_str())),
        }
    }
}
