//! The immutable configuration a build session runs with.

use crate::types::{BuildSettings, CompilerOptions, OrderingPolicy, ProjectConfig};
use std::path::{Path, PathBuf};
use weft_common::{normalize_path, resolve_path};

/// Project file, orchestrator settings and the values derived from them.
///
/// Constructed once per session and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfiguration {
    config_path: PathBuf,
    project: ProjectConfig,
    settings: BuildSettings,
    single_output: bool,
}

impl BuildConfiguration {
    /// Combines a parsed project file with orchestrator settings.
    ///
    /// `config_path` is the location of the project file; relative paths in the
    /// configuration are resolved against its directory.
    pub fn new(
        config_path: impl Into<PathBuf>,
        project: ProjectConfig,
        settings: BuildSettings,
    ) -> Self {
        let single_output = project.compiler_options.out.is_some();
        Self {
            config_path: normalize_path(&config_path.into()),
            project,
            settings,
            single_output,
        }
    }

    /// The parsed project file.
    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    /// The compiler options, including the ones passed through untouched.
    pub fn options(&self) -> &CompilerOptions {
        &self.project.compiler_options
    }

    /// The configured file list, if the project has one.
    pub fn files(&self) -> Option<&[String]> {
        self.project.files.as_deref()
    }

    /// The orchestrator settings.
    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Whether referenced files outside the project are reported instead of loaded.
    pub fn no_external_resolve(&self) -> bool {
        self.settings.no_external_resolve
    }

    /// Whether per-file outputs are pushed in reference order.
    pub fn sort_output(&self) -> bool {
        self.settings.sort_output
    }

    /// Tie-break rule for unrelated files.
    pub fn ordering(&self) -> OrderingPolicy {
        self.settings.ordering
    }

    /// Whether all sources are bundled into one code and one declaration output.
    pub fn single_output(&self) -> bool {
        self.single_output
    }

    /// Whether declaration text is produced.
    pub fn declaration(&self) -> bool {
        self.project.compiler_options.declaration
    }

    /// Path of the project file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Directory containing the project file.
    pub fn config_dir(&self) -> &Path {
        match self.config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// Directory sources are resolved against: the config directory, or `rootDir`
    /// relative to it when set.
    pub fn base_dir(&self) -> PathBuf {
        match &self.project.compiler_options.root_dir {
            Some(root) => resolve_path(self.config_dir(), root),
            None => self.config_dir().to_path_buf(),
        }
    }

    /// The bundle output path, resolved against the config directory.
    pub fn out_path(&self) -> Option<PathBuf> {
        self.project
            .compiler_options
            .out
            .as_ref()
            .map(|out| resolve_path(self.config_dir(), out))
    }

    /// The per-file output directory, resolved against the config directory.
    pub fn out_dir(&self) -> Option<PathBuf> {
        self.project
            .compiler_options
            .out_dir
            .as_ref()
            .map(|dir| resolve_path(self.config_dir(), dir))
    }

    /// Returns a copy with different settings, used to apply command-line overrides.
    pub fn with_settings(mut self, settings: BuildSettings) -> Self {
        self.settings = settings;
        self
    }
}
