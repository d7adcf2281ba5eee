//! The compiler backend boundary.
//!
//! A build session hands the committed [`SourceCache`](weft_source::SourceCache),
//! its configuration and the cycle's [`ChangeSet`](weft_source::ChangeSet) to a
//! [`Compiler`] and gets back one [`EmitArtifact`] per source plus diagnostics.
//! Backends are injected, so sessions can run different compilers side by side.
//! [`IdentityCompiler`] is the built-in deterministic backend.

#![warn(missing_docs)]

pub mod artifact;
pub mod compiler;
pub mod error;
pub mod identity;

pub use artifact::{CompileResult, EmitArtifact};
pub use compiler::Compiler;
pub use error::CompileError;
pub use identity::{IdentityCompiler, MERGE_CONFLICT};
