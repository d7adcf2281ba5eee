//! The reporter boundary: where each cycle's diagnostics are delivered.

use std::io::{self, Write};

use crate::diagnostic::Diagnostic;
use crate::renderer::{DiagnosticRenderer, TerminalRenderer};
use weft_source::SourceCache;

/// Receives the ordered diagnostics of a build cycle.
///
/// The orchestrator only guarantees the order (file, then position); how the
/// diagnostics are shown is entirely up to the implementation.
pub trait Reporter {
    /// Delivers one cycle's diagnostics, already sorted.
    fn report(&mut self, diagnostics: &[Diagnostic], sources: &SourceCache) -> io::Result<()>;
}

/// Writes rustc-style renderings of each diagnostic to a writer.
pub struct TerminalReporter<W: Write> {
    renderer: TerminalRenderer,
    out: W,
}

impl<W: Write> TerminalReporter<W> {
    /// Creates a reporter writing to `out`.
    pub fn new(out: W, color: bool) -> Self {
        Self {
            renderer: TerminalRenderer::new(color),
            out,
        }
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TerminalReporter<W> {
    fn report(&mut self, diagnostics: &[Diagnostic], sources: &SourceCache) -> io::Result<()> {
        for diag in diagnostics {
            writeln!(self.out, "{}", self.renderer.render(diag, sources))?;
        }
        self.out.flush()
    }
}

/// Sorts diagnostics by file, then by position within the file.
///
/// Files rank by their position in the cache's committed cycle. Diagnostics
/// without a location come first. The sort is stable, so diagnostics at the
/// same position keep their emission order.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic], sources: &SourceCache) {
    diagnostics.sort_by_key(|diag| {
        let span = diag.primary_span;
        if span.is_dummy() {
            return (0u8, 0usize, 0u32, 0u32);
        }
        let rank = sources.position(span.file).unwrap_or(usize::MAX);
        (1, rank, span.file.as_raw(), span.start)
    });
}
