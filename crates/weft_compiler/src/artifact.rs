//! Per-file compiler output.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use weft_diagnostics::Diagnostic;

/// The code and declaration text emitted for one source file in one cycle.
///
/// Either part may be absent: ambient declaration files produce no code, and
/// declaration text is only produced when the configuration asks for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitArtifact {
    /// The source file this artifact was produced from.
    pub source: PathBuf,
    /// Emitted code, if any.
    pub code: Option<String>,
    /// Emitted declaration text, if any.
    pub declaration: Option<String>,
}

impl EmitArtifact {
    /// Creates an artifact with no output for `source`.
    pub fn empty(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            code: None,
            declaration: None,
        }
    }

    /// Returns `true` if neither code nor declaration text was emitted.
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.declaration.is_none()
    }
}

/// Everything a compiler produced for one cycle.
#[derive(Debug, Clone, Default)]
pub struct CompileResult {
    /// Artifacts keyed by source path.
    pub artifacts: BTreeMap<PathBuf, EmitArtifact>,
    /// Diagnostics in the order the compiler reported them.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an artifact, replacing any earlier one for the same source.
    pub fn insert(&mut self, artifact: EmitArtifact) {
        self.artifacts.insert(artifact.source.clone(), artifact);
    }

    /// Returns the artifact for `source`.
    pub fn artifact(&self, source: &Path) -> Option<&EmitArtifact> {
        self.artifacts.get(source)
    }

    /// Returns `true` if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}
