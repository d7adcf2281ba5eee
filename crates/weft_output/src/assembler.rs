//! Turning one cycle's compiler artifacts into the code and declaration streams.

use std::path::{Path, PathBuf};

use serde::Serialize;
use weft_compiler::{CompileResult, EmitArtifact};
use weft_config::BuildConfiguration;
use weft_diagnostics::Diagnostic;
use weft_source::SourceCache;

use crate::error::{CyclicReferenceError, OutputError};
use crate::graph::ReferenceGraph;
use crate::layout::OutputLayout;
use crate::sink::{OutputFile, OutputKind, OutputSink};

/// Counts of files pushed by [`OutputAssembler::emit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmitStats {
    /// Files pushed into the code sink.
    pub code_files: usize,
    /// Files pushed into the declaration sink.
    pub declaration_files: usize,
}

impl EmitStats {
    /// Total number of files pushed.
    pub fn total(&self) -> usize {
        self.code_files + self.declaration_files
    }
}

/// The outputs of one build cycle, in emission order.
///
/// Read-only once built. A session keeps the previous cycle's assembler around
/// for inspection.
#[derive(Debug, Clone)]
pub struct OutputAssembler {
    artifacts: Vec<EmitArtifact>,
    layout: OutputLayout,
    bundle: Option<(PathBuf, PathBuf)>,
    cycles: Vec<CyclicReferenceError>,
    diagnostics: Vec<Diagnostic>,
}

impl OutputAssembler {
    /// Orders `result`'s artifacts for the committed cycle of `sources`.
    ///
    /// Files keep cycle order unless the configuration bundles or sorts output,
    /// in which case referenced files come first. Artifacts for files outside
    /// the cycle go last.
    pub fn new(sources: &SourceCache, config: &BuildConfiguration, result: CompileResult) -> Self {
        let CompileResult {
            mut artifacts,
            mut diagnostics,
        } = result;
        let layout = OutputLayout::from_config(config);
        let bundle = if config.single_output() {
            layout.bundle_paths()
        } else {
            None
        };

        let (order, cycles) = if config.single_output() || config.sort_output() {
            let order = ReferenceGraph::build(sources).order(config.ordering());
            (order.files, order.cycles)
        } else {
            (sources.iter().map(|f| f.id).collect(), Vec::new())
        };
        diagnostics.extend(cycles.iter().map(CyclicReferenceError::to_diagnostic));

        let mut ordered = Vec::with_capacity(artifacts.len());
        for id in order {
            if let Some(artifact) = sources.file(id).and_then(|f| artifacts.remove(&f.path)) {
                ordered.push(artifact);
            }
        }
        ordered.extend(artifacts.into_values());

        tracing::debug!(
            artifacts = ordered.len(),
            bundle = bundle.is_some(),
            cycles = cycles.len(),
            "outputs assembled"
        );

        Self {
            artifacts: ordered,
            layout,
            bundle,
            cycles,
            diagnostics,
        }
    }

    /// The artifacts in emission order.
    pub fn artifacts(&self) -> &[EmitArtifact] {
        &self.artifacts
    }

    /// Returns the artifact produced for `source`.
    pub fn artifact(&self, source: &Path) -> Option<&EmitArtifact> {
        self.artifacts.iter().find(|a| a.source == source)
    }

    /// Source paths in emission order.
    pub fn order(&self) -> impl Iterator<Item = &Path> {
        self.artifacts.iter().map(|a| a.source.as_path())
    }

    /// Whether this cycle produces a single bundle.
    pub fn is_bundle(&self) -> bool {
        self.bundle.is_some()
    }

    /// Reference cycles that forced the fallback order.
    pub fn cycles(&self) -> &[CyclicReferenceError] {
        &self.cycles
    }

    /// Compiler diagnostics followed by ordering diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The files this cycle produces, built on demand.
    ///
    /// Per-file mode yields each artifact's code then declaration. Bundle mode
    /// yields the code bundle then the declaration bundle; either is skipped
    /// when no artifact contributes to it.
    pub fn outputs(&self) -> impl Iterator<Item = OutputFile> + '_ {
        let per_file = self
            .bundle
            .is_none()
            .then(|| self.artifacts.iter().flat_map(move |a| self.file_outputs(a)));
        let bundled = self.bundle.as_ref().map(|(code, declaration)| {
            std::iter::once_with(move || self.concat(code, OutputKind::Code))
                .chain(std::iter::once_with(move || {
                    self.concat(declaration, OutputKind::Declaration)
                }))
                .flatten()
        });
        per_file
            .into_iter()
            .flatten()
            .chain(bundled.into_iter().flatten())
    }

    /// Pushes every output into its sink, then finishes both sinks.
    ///
    /// Both sinks are finished even when a push fails; the first error wins.
    pub fn emit(
        &self,
        code: &mut dyn OutputSink,
        declarations: &mut dyn OutputSink,
    ) -> Result<EmitStats, OutputError> {
        let mut stats = EmitStats::default();
        let pushed = self.push_all(code, declarations, &mut stats);
        let code_done = code.finish().map_err(|source| OutputError::Sink {
            stream: OutputKind::Code,
            source,
        });
        let declarations_done = declarations.finish().map_err(|source| OutputError::Sink {
            stream: OutputKind::Declaration,
            source,
        });
        pushed?;
        code_done?;
        declarations_done?;

        tracing::debug!(
            code_files = stats.code_files,
            declaration_files = stats.declaration_files,
            "outputs emitted"
        );
        Ok(stats)
    }

    fn push_all(
        &self,
        code: &mut dyn OutputSink,
        declarations: &mut dyn OutputSink,
        stats: &mut EmitStats,
    ) -> Result<(), OutputError> {
        for file in self.outputs() {
            let stream = file.kind;
            let (sink, count): (&mut dyn OutputSink, &mut usize) = match stream {
                OutputKind::Code => (&mut *code, &mut stats.code_files),
                OutputKind::Declaration => (&mut *declarations, &mut stats.declaration_files),
            };
            sink.push(file)
                .map_err(|source| OutputError::Sink { stream, source })?;
            *count += 1;
        }
        Ok(())
    }

    fn file_outputs(&self, artifact: &EmitArtifact) -> impl Iterator<Item = OutputFile> {
        let source = &artifact.source;
        let code = artifact.code.as_ref().map(|contents| OutputFile {
            path: self.layout.code_path(source),
            source: Some(source.clone()),
            kind: OutputKind::Code,
            contents: contents.clone(),
        });
        let declaration = artifact.declaration.as_ref().map(|contents| OutputFile {
            path: self.layout.declaration_path(source),
            source: Some(source.clone()),
            kind: OutputKind::Declaration,
            contents: contents.clone(),
        });
        [code, declaration].into_iter().flatten()
    }

    fn concat(&self, path: &Path, kind: OutputKind) -> Option<OutputFile> {
        let mut contents = String::new();
        let mut any = false;
        for artifact in &self.artifacts {
            let fragment = match kind {
                OutputKind::Code => artifact.code.as_deref(),
                OutputKind::Declaration => artifact.declaration.as_deref(),
            };
            let Some(fragment) = fragment else {
                continue;
            };
            any = true;
            contents.push_str(fragment);
            if !fragment.is_empty() && !fragment.ends_with('\n') {
                contents.push('\n');
            }
        }
        any.then(|| OutputFile {
            path: path.to_path_buf(),
            source: None,
            kind,
            contents,
        })
    }
}
