//! A deterministic backend that passes sources through unchanged.
//!
//! Code output is the source text itself. Declaration output is the file's
//! reference header followed by every `export` and `declare` line, which is
//! enough to exercise ordering and bundling end to end without a real
//! type checker.

use std::collections::HashMap;
use std::path::PathBuf;

use weft_common::ContentHash;
use weft_config::BuildConfiguration;
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode};
use weft_source::{ChangeSet, FileId, SourceCache, SourceFile, Span};

use crate::artifact::{CompileResult, EmitArtifact};
use crate::compiler::Compiler;
use crate::error::CompileError;

/// A line starts with a merge-conflict marker.
pub const MERGE_CONFLICT: DiagnosticCode = DiagnosticCode::new(Category::Compiler, 1);

const CONFLICT_MARKER: &str = "<<<<<<<";

/// Memoized analysis of one file.
struct Analysis {
    id: FileId,
    hash: ContentHash,
    declaration: bool,
    artifact: EmitArtifact,
    diagnostics: Vec<Diagnostic>,
}

/// The built-in pass-through compiler.
///
/// Files missing from the cycle's [`ChangeSet`] are served from the previous
/// analysis when their content hash still matches.
#[derive(Default)]
pub struct IdentityCompiler {
    memo: HashMap<PathBuf, Analysis>,
    analyzed: Vec<PathBuf>,
}

impl IdentityCompiler {
    /// Creates a compiler with an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths that were analyzed (not served from the memo) by the last compile.
    pub fn last_analyzed(&self) -> &[PathBuf] {
        &self.analyzed
    }
}

impl Compiler for IdentityCompiler {
    fn name(&self) -> &str {
        "identity"
    }

    fn compile(
        &mut self,
        sources: &SourceCache,
        config: &BuildConfiguration,
        changes: &ChangeSet,
    ) -> Result<CompileResult, CompileError> {
        if let Some(target) = config.options().target.as_deref() {
            validate_target(target)?;
        }

        let declaration = config.declaration();
        let mut result = CompileResult::new();
        self.analyzed.clear();

        for file in sources.iter() {
            let fresh = !changes.contains(&file.path)
                && self.memo.get(&file.path).is_some_and(|memo| {
                    memo.id == file.id
                        && memo.hash == file.content_hash
                        && memo.declaration == declaration
                });
            if !fresh {
                self.memo
                    .insert(file.path.clone(), analyze(file, declaration));
                self.analyzed.push(file.path.clone());
            }
            if let Some(memo) = self.memo.get(&file.path) {
                result.insert(memo.artifact.clone());
                result.diagnostics.extend(memo.diagnostics.iter().cloned());
            }
        }

        self.memo.retain(|path, _| sources.contains(path));

        tracing::debug!(
            compiler = self.name(),
            files = sources.len(),
            analyzed = self.analyzed.len(),
            "compile finished"
        );
        Ok(result)
    }
}

fn validate_target(target: &str) -> Result<(), CompileError> {
    let lower = target.to_ascii_lowercase();
    let known = match lower.as_str() {
        "es3" | "es5" | "es6" | "esnext" => true,
        other => other
            .strip_prefix("es")
            .and_then(|year| year.parse::<u32>().ok())
            .is_some_and(|year| year >= 2015),
    };
    if known {
        Ok(())
    } else {
        Err(CompileError::InvalidOption {
            option: "target".to_string(),
            message: format!("unknown target '{target}'"),
        })
    }
}

fn analyze(file: &SourceFile, declaration: bool) -> Analysis {
    let mut diagnostics = Vec::new();
    let mut offset = 0u32;
    for line in file.content.split_inclusive('\n') {
        if line.starts_with(CONFLICT_MARKER) {
            let span = Span::new(file.id, offset, offset + CONFLICT_MARKER.len() as u32);
            diagnostics.push(
                Diagnostic::warning(MERGE_CONFLICT, "merge conflict marker", span)
                    .with_help("resolve the conflict before building"),
            );
        }
        offset += line.len() as u32;
    }

    let artifact = if file.is_declaration() {
        EmitArtifact::empty(file.path.clone())
    } else {
        EmitArtifact {
            source: file.path.clone(),
            code: Some(file.content.clone()),
            declaration: declaration.then(|| declaration_text(file)),
        }
    };

    Analysis {
        id: file.id,
        hash: file.content_hash,
        declaration,
        artifact,
        diagnostics,
    }
}

fn declaration_text(file: &SourceFile) -> String {
    let mut out = String::new();
    for reference in &file.references {
        out.push_str(&format!("/// <reference path=\"{}\" />\n", reference.raw));
    }
    for line in file.content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("export ") || trimmed.starts_with("declare ") {
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}
