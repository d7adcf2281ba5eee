//! The injectable compiler capability.

use weft_config::BuildConfiguration;
use weft_source::{ChangeSet, SourceCache};

use crate::artifact::CompileResult;
use crate::error::CompileError;

/// A compiler backend.
///
/// `compile` sees the committed cycle of `sources` and must be deterministic
/// for identical contents and configuration. `changes` names the files that
/// differ from the previous cycle; a backend may skip re-analysis of everything
/// else. Source problems are diagnostics in the result. Only configuration-level
/// failures are returned as errors.
pub trait Compiler {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Compiles every file in the current cycle of `sources`.
    fn compile(
        &mut self,
        sources: &SourceCache,
        config: &BuildConfiguration,
        changes: &ChangeSet,
    ) -> Result<CompileResult, CompileError>;
}
