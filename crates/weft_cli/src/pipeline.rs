//! Shared pipeline helpers for CLI commands.
//!
//! Contains project file discovery, configuration loading with command-line
//! overrides, and the sink that writes outputs to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use weft_config::BuildConfiguration;
use weft_output::{OutputFile, OutputSink};

use crate::{BuildArgs, GlobalArgs};

/// File name searched for when no `--project` is given.
pub const PROJECT_FILE: &str = "tsconfig.json";

/// Walks up from `start` looking for the nearest `tsconfig.json`.
pub fn find_project_file(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(PROJECT_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {PROJECT_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project file from global CLI args.
///
/// `--project` may name the file itself or a directory containing
/// `tsconfig.json`. Without it, walks up from the current directory.
pub fn resolve_project_file(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    match global.project {
        Some(ref project) => {
            let path = cwd.join(project);
            if path.is_dir() {
                Ok(path.join(PROJECT_FILE))
            } else {
                Ok(path)
            }
        }
        None => find_project_file(&cwd),
    }
}

/// Loads the configuration for the project named by the global args.
pub fn load_build_configuration(
    global: &GlobalArgs,
) -> Result<BuildConfiguration, Box<dyn std::error::Error>> {
    let path = resolve_project_file(global)?;
    tracing::debug!(path = %path.display(), "loading project file");
    Ok(weft_config::load_configuration(&path)?)
}

/// Applies `weft build` flags on top of the settings from `weft.toml`.
///
/// Flags can only switch behavior on; `--ordering` replaces the policy.
pub fn apply_overrides(config: BuildConfiguration, args: &BuildArgs) -> BuildConfiguration {
    let mut settings = config.settings().clone();
    settings.no_external_resolve |= args.no_external_resolve;
    settings.sort_output |= args.sort_output;
    if let Some(ordering) = args.ordering {
        settings.ordering = ordering.into();
    }
    config.with_settings(settings)
}

/// Writes each output file to its path, creating parent directories.
#[derive(Debug, Default)]
pub struct DirectorySink {
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Creates a sink that has written nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl OutputSink for DirectorySink {
    fn push(&mut self, file: OutputFile) -> io::Result<()> {
        if let Some(parent) = file.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file.path, file.contents.as_bytes())?;
        self.written.push(file.path);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}
