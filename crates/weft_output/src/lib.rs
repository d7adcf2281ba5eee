//! Output assembly for a build cycle.
//!
//! The [`OutputAssembler`] turns a cycle's compiler artifacts into two output
//! streams, code and declarations. Per-file outputs keep the cycle's input order
//! unless output sorting is on; bundle mode concatenates every fragment into one
//! code file and one declaration file. Both sorting and bundling order files by
//! their header references using a [`ReferenceGraph`], so a referenced file
//! always precedes the files that reference it.

#![warn(missing_docs)]

pub mod assembler;
pub mod error;
pub mod graph;
pub mod layout;
pub mod sink;

pub use assembler::{EmitStats, OutputAssembler};
pub use error::{CyclicReferenceError, OutputError};
pub use graph::{OutputOrder, ReferenceGraph};
pub use layout::OutputLayout;
pub use sink::{MemorySink, OutputFile, OutputKind, OutputSink};
