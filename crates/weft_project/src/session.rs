//! The build session state machine.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use weft_compiler::Compiler;
use weft_config::BuildConfiguration;
use weft_diagnostics::{sort_diagnostics, Diagnostic, DiagnosticSink, Reporter};
use weft_output::{EmitStats, OutputAssembler, OutputSink};
use weft_source::{ChangeSet, SourceCache, Upsert};

use crate::discovery::stage_externals;
use crate::error::SessionError;
use crate::loader::{FsLoader, SourceLoader};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed; no cycle has completed.
    Idle,
    /// At least one cycle has completed.
    Cycled {
        /// Number of completed cycles.
        cycles: u64,
    },
}

/// Everything one completed cycle produced.
#[derive(Debug, Clone)]
pub struct CycleOutput {
    /// The cycle number, starting at 1.
    pub cycle: u64,
    /// What changed since the previous cycle.
    pub changes: ChangeSet,
    /// The cycle's diagnostics in file-then-position order.
    pub diagnostics: Vec<Diagnostic>,
    /// The assembled outputs.
    pub assembler: OutputAssembler,
    /// What was pushed into the sinks.
    pub stats: EmitStats,
}

impl CycleOutput {
    /// Returns `true` if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// An incremental build session.
///
/// Sources are staged with [`load_sources`](Self::load_sources) or
/// [`add_source`](Self::add_source), then [`reset`](Self::reset) runs a cycle.
/// Cycles run one at a time; `reset` takes `&mut self`.
pub struct Project {
    config: BuildConfiguration,
    compiler: Box<dyn Compiler>,
    loader: Box<dyn SourceLoader>,
    cache: SourceCache,
    current: Option<CycleOutput>,
    previous: Option<CycleOutput>,
    completed: u64,
}

impl Project {
    /// Creates an idle session that reads sources from the filesystem.
    pub fn new(config: BuildConfiguration, compiler: Box<dyn Compiler>) -> Self {
        Self {
            config,
            compiler,
            loader: Box::new(FsLoader),
            cache: SourceCache::new(),
            current: None,
            previous: None,
            completed: 0,
        }
    }

    /// Replaces the source loader.
    pub fn with_loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// The session's configuration.
    pub fn config(&self) -> &BuildConfiguration {
        &self.config
    }

    /// The source cache.
    pub fn sources(&self) -> &SourceCache {
        &self.cache
    }

    /// Resolves the configured file list into absolute paths.
    ///
    /// Fails with a configuration error when the project has no file list.
    pub fn resolve_sources(&self) -> Result<Vec<PathBuf>, SessionError> {
        Ok(SourceCache::resolve(
            self.config.files(),
            &self.config.base_dir(),
        )?)
    }

    /// Resolves the file list and stages every file for the next cycle.
    ///
    /// Nothing is staged unless every file can be read.
    pub fn load_sources(&mut self) -> Result<Vec<PathBuf>, SessionError> {
        let paths = self.resolve_sources()?;
        let mut contents = Vec::with_capacity(paths.len());
        for path in &paths {
            let content = self
                .loader
                .read(path)
                .map_err(|source| SessionError::MissingSource {
                    path: path.clone(),
                    source,
                })?;
            contents.push(content);
        }
        for (path, content) in paths.iter().zip(contents) {
            self.cache.upsert(path, content);
        }
        tracing::debug!(files = paths.len(), "project sources staged");
        Ok(paths)
    }

    /// Stages one source for the next cycle.
    pub fn add_source(&mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Upsert {
        self.cache.upsert(path, content)
    }

    /// Runs one build cycle and pushes its outputs into the sinks.
    ///
    /// Referenced files are staged first, then the cycle is committed, compiled
    /// and assembled. Once the compiler has produced a result the outputs are
    /// emitted; after a successful emit the current cycle becomes the previous
    /// one. A fatal error leaves both slots untouched and rolls the source cache
    /// back, so the next cycle reports changes against the last completed one.
    pub fn reset(
        &mut self,
        code: &mut dyn OutputSink,
        declarations: &mut dyn OutputSink,
    ) -> Result<&CycleOutput, SessionError> {
        let sink = DiagnosticSink::new();
        let externals = stage_externals(
            &mut self.cache,
            self.loader.as_ref(),
            self.config.no_external_resolve(),
            &sink,
        );
        if externals > 0 {
            tracing::debug!(externals, "referenced files staged");
        }

        let changes = self.cache.reset();
        match self.run(changes, sink, code, declarations) {
            Ok(output) => {
                self.completed += 1;
                self.previous = self.current.take();
                Ok(&*self.current.insert(output))
            }
            Err(err) => {
                self.cache.rollback();
                tracing::warn!(
                    cycle = self.cache.cycle() + 1,
                    error = %err,
                    "build cycle failed"
                );
                Err(err)
            }
        }
    }

    fn run(
        &mut self,
        changes: ChangeSet,
        sink: DiagnosticSink,
        code: &mut dyn OutputSink,
        declarations: &mut dyn OutputSink,
    ) -> Result<CycleOutput, SessionError> {
        tracing::debug!(
            cycle = changes.cycle,
            compiler = self.compiler.name(),
            changed = changes.dirty_count(),
            "compiling"
        );
        let result = self.compiler.compile(&self.cache, &self.config, &changes)?;
        let assembler = OutputAssembler::new(&self.cache, &self.config, result);
        sink.extend(assembler.diagnostics().iter().cloned());

        let mut diagnostics = sink.take_all();
        sort_diagnostics(&mut diagnostics, &self.cache);

        let stats = assembler.emit(code, declarations)?;

        tracing::info!(
            cycle = changes.cycle,
            files = self.cache.len(),
            changed = changes.dirty_count(),
            removed = changes.removed.len(),
            diagnostics = diagnostics.len(),
            outputs = stats.total(),
            "build cycle finished"
        );

        Ok(CycleOutput {
            cycle: changes.cycle,
            changes,
            diagnostics,
            assembler,
            stats,
        })
    }

    /// The most recent completed cycle.
    pub fn output(&self) -> Option<&CycleOutput> {
        self.current.as_ref()
    }

    /// The cycle completed before the current one.
    pub fn previous_output(&self) -> Option<&CycleOutput> {
        self.previous.as_ref()
    }

    /// The session's lifecycle state.
    pub fn state(&self) -> SessionState {
        match self.completed {
            0 => SessionState::Idle,
            cycles => SessionState::Cycled { cycles },
        }
    }

    /// Delivers the current cycle's diagnostics to `reporter`.
    pub fn report(&self, reporter: &mut dyn Reporter) -> io::Result<()> {
        match &self.current {
            Some(output) => reporter.report(&output.diagnostics, &self.cache),
            None => Ok(()),
        }
    }

    /// Drops cached files that are not part of the current cycle.
    pub fn prune(&mut self) -> usize {
        let keep: HashSet<PathBuf> = self.cache.iter().map(|f| f.path.clone()).collect();
        self.cache.prune(&keep)
    }
}
