//! Source file tracking across incremental build cycles.
//!
//! This crate provides the [`SourceCache`], which owns every source file seen by a
//! build session and answers "what changed since the last cycle", together with
//! [`FileId`] and [`Span`] for source locations, [`ResolvedSpan`] for line/column
//! coordinates, and the header [`Reference`] markers that drive output ordering.

#![warn(missing_docs)]

pub mod change_set;
pub mod error;
pub mod file_id;
pub mod references;
pub mod resolved_span;
pub mod source_cache;
pub mod source_file;
pub mod span;

pub use change_set::ChangeSet;
pub use error::ResolveError;
pub use file_id::FileId;
pub use references::{parse_references, Reference};
pub use resolved_span::ResolvedSpan;
pub use source_cache::{SourceCache, Upsert};
pub use source_file::SourceFile;
pub use span::Span;
