//! Pulling referenced files into the staged set before a cycle commits.

use weft_diagnostics::{codes, Diagnostic, DiagnosticSink};
use weft_source::{FileId, Reference, SourceCache};

use crate::loader::SourceLoader;

/// Stages every file reachable through header references from the staged set.
///
/// Loaded files are marked external. A reference that cannot be read becomes an
/// `R001` warning. With `no_external_resolve` nothing is loaded and each
/// reference outside the staged set becomes an `R002` warning instead.
pub(crate) fn stage_externals(
    cache: &mut SourceCache,
    loader: &dyn SourceLoader,
    no_external_resolve: bool,
    sink: &DiagnosticSink,
) -> usize {
    let mut queue: Vec<FileId> = cache.staged().map(|f| f.id).collect();
    let mut loaded = 0;
    let mut next = 0;

    while let Some(&id) = queue.get(next) {
        next += 1;
        let pending: Vec<Reference> = match cache.staged_file(id) {
            Some(file) => file
                .references
                .iter()
                .filter(|r| !cache.is_staged(&r.path))
                .cloned()
                .collect(),
            None => continue,
        };

        for reference in pending {
            if cache.is_staged(&reference.path) {
                continue;
            }
            let shown = reference.path.display().to_string();
            if no_external_resolve {
                sink.emit(
                    Diagnostic::warning(
                        codes::UNRESOLVED_EXTERNAL,
                        format!("referenced file `{shown}` is not part of the project"),
                        reference.span,
                    )
                    .with_help(format!("add `{shown}` to the project's source list")),
                );
                continue;
            }
            match loader.read(&reference.path) {
                Ok(content) => {
                    let upsert = cache.upsert(&reference.path, content);
                    cache.mark_external(&reference.path);
                    queue.push(upsert.id);
                    loaded += 1;
                    tracing::debug!(path = %shown, "staged external file");
                }
                Err(err) => sink.emit(Diagnostic::warning(
                    codes::MISSING_REFERENCE,
                    format!("cannot read referenced file `{shown}`: {err}"),
                    reference.span,
                )),
            }
        }
    }

    loaded
}
