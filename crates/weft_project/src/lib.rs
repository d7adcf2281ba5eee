//! The incremental build session.
//!
//! A [`Project`] owns one [`SourceCache`](weft_source::SourceCache), an injected
//! [`Compiler`](weft_compiler::Compiler) and the outputs of the current and
//! previous cycles. Each [`Project::reset`] stages referenced external files,
//! commits the cycle, compiles, assembles and pushes the outputs into the
//! caller's sinks.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod session;

mod discovery;

pub use error::SessionError;
pub use loader::{FsLoader, MemoryLoader, SourceLoader};
pub use session::{CycleOutput, Project, SessionState};
