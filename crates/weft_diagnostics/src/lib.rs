//! Structured diagnostics and the reporter boundary.
//!
//! This crate provides [`Diagnostic`] messages with severity levels, codes and
//! source labels. The thread-safe [`DiagnosticSink`] accumulates diagnostics
//! during a build cycle, [`sort_diagnostics`] puts them in file-then-position
//! order, and a [`Reporter`] receives each cycle's ordered list. How they are
//! displayed is up to the reporter; [`TerminalReporter`] renders them rustc-style.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod reporter;
pub mod severity;
pub mod sink;

pub use code::{codes, Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use reporter::{sort_diagnostics, Reporter, TerminalReporter};
pub use severity::Severity;
pub use sink::DiagnosticSink;
