//! Ordering and emission errors.

use std::path::PathBuf;

use weft_diagnostics::{codes, Diagnostic, Label};
use weft_source::Span;

use crate::sink::OutputKind;

/// One step of a reference cycle: `path` references `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleMember {
    /// The referencing file.
    pub path: PathBuf,
    /// Span of the reference marker's path text.
    pub reference: Span,
    /// The referenced file, the next member of the cycle.
    pub target: PathBuf,
}

/// Header references that form a cycle, so no dependency order exists.
///
/// Never fatal: the assembler keeps resolution order and reports it through
/// [`to_diagnostic`](Self::to_diagnostic).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("reference cycle: {}", chain(.members))]
pub struct CyclicReferenceError {
    /// One closed walk around the cycle, starting at its earliest file.
    pub members: Vec<CycleMember>,
    /// Every reference between files of the cycle, by file then declaration.
    pub references: Vec<CycleMember>,
}

impl CyclicReferenceError {
    /// Converts the cycle into an error diagnostic pointing at every reference
    /// between the files of the cycle.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let primary = self.members.first();
        let span = primary.map_or(Span::DUMMY, |m| m.reference);
        let mut diag = Diagnostic::error(codes::CYCLIC_REFERENCE, self.to_string(), span);
        if let Some(member) = primary {
            diag = diag.with_label(Label::primary(member.reference, references(member)));
        }

        let rest = if self.references.is_empty() {
            &self.members
        } else {
            &self.references
        };
        for member in rest.iter().filter(|m| Some(*m) != primary) {
            diag = diag.with_label(Label::secondary(member.reference, references(member)));
        }
        diag.with_note("files are emitted in resolution order")
    }
}

fn references(member: &CycleMember) -> String {
    format!("references `{}`", member.target.display())
}

fn chain(members: &[CycleMember]) -> String {
    let mut out: Vec<String> = members.iter().map(|m| m.path.display().to_string()).collect();
    if let Some(last) = members.last() {
        out.push(last.target.display().to_string());
    }
    out.join(" -> ")
}

/// Errors raised while pushing outputs into sinks.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// A sink rejected an output or failed to finish.
    #[error("failed to write {stream} output: {source}")]
    Sink {
        /// The stream whose sink failed.
        stream: OutputKind,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
