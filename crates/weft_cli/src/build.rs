//! `weft build`: run one build cycle and write its outputs.
//!
//! Loads the project, stages its sources, runs a cycle with the identity
//! compiler, writes code and declaration outputs to disk (or only lists them
//! with `--dry-run`) and reports the cycle's diagnostics.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use weft_compiler::IdentityCompiler;
use weft_diagnostics::{Diagnostic, Severity, TerminalReporter};
use weft_output::{EmitStats, MemorySink};
use weft_project::{CycleOutput, Project};
use weft_source::SourceCache;

use crate::pipeline::{apply_overrides, load_build_configuration, DirectorySink};
use crate::{BuildArgs, GlobalArgs, ReportFormat};

/// Machine-readable summary of a cycle.
#[derive(Serialize)]
struct JsonReport<'a> {
    cycle: u64,
    dry_run: bool,
    outputs: &'a [PathBuf],
    stats: EmitStats,
    diagnostics: Vec<JsonDiagnostic<'a>>,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
    location: Option<String>,
}

/// Runs the `weft build` command.
///
/// Returns exit code 0 on success, 1 if the cycle reported any error.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = apply_overrides(load_build_configuration(global)?, args);
    let text = args.format == ReportFormat::Text;

    let mut project = Project::new(config, Box::new(IdentityCompiler::new()));
    let sources = project.load_sources()?;
    if !global.quiet && text {
        eprintln!("   Building {} source file(s)", sources.len());
    }

    let written = if args.dry_run {
        let mut code = MemorySink::new();
        let mut declarations = MemorySink::new();
        project.reset(&mut code, &mut declarations)?;
        code.into_files()
            .into_iter()
            .chain(declarations.into_files())
            .map(|file| file.path)
            .collect()
    } else {
        let mut code = DirectorySink::new();
        let mut declarations = DirectorySink::new();
        project.reset(&mut code, &mut declarations)?;
        let mut written = code.written().to_vec();
        written.extend_from_slice(declarations.written());
        written
    };

    let Some(output) = project.output() else {
        return Err("build cycle produced no output".into());
    };

    if text {
        project.report(&mut TerminalReporter::new(io::stderr(), global.color))?;
        if !global.quiet {
            let verb = if args.dry_run { "Would write" } else { "Wrote" };
            for path in &written {
                eprintln!("   {verb} {}", path.display());
            }
            print_summary(output);
        }
    } else {
        let report = json_report(output, &written, args.dry_run, project.sources());
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(if output.has_errors() { 1 } else { 0 })
}

fn print_summary(output: &CycleOutput) {
    let errors = count(&output.diagnostics, Severity::Error);
    let warnings = count(&output.diagnostics, Severity::Warning);
    eprintln!(
        "   Result: {} changed, {} output(s), {} error(s), {} warning(s)",
        output.changes.dirty_count(),
        output.stats.total(),
        errors,
        warnings
    );
}

fn count(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}

fn json_report<'a>(
    output: &'a CycleOutput,
    written: &'a [PathBuf],
    dry_run: bool,
    sources: &SourceCache,
) -> JsonReport<'a> {
    JsonReport {
        cycle: output.cycle,
        dry_run,
        outputs: written,
        stats: output.stats,
        diagnostics: output
            .diagnostics
            .iter()
            .map(|diagnostic| JsonDiagnostic {
                diagnostic,
                location: sources
                    .resolve_span(diagnostic.primary_span)
                    .map(|span| span.to_string()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_config::{load_project_from_str, BuildConfiguration, BuildSettings};
    use weft_project::MemoryLoader;

    #[test]
    fn json_report_locates_diagnostics() {
        let loader = MemoryLoader::new().with_file("/p/a.ts", "let a;\n<<<<<<< ours\n");
        let config = BuildConfiguration::new(
            "/p/tsconfig.json",
            load_project_from_str(r#"{ "files": ["a.ts"] }"#).unwrap(),
            BuildSettings::default(),
        );
        let mut project =
            Project::new(config, Box::new(IdentityCompiler::new())).with_loader(loader);
        project.load_sources().unwrap();
        let mut code = MemorySink::new();
        let mut declarations = MemorySink::new();
        project.reset(&mut code, &mut declarations).unwrap();

        let written = vec![PathBuf::from("/p/a.js")];
        let output = project.output().unwrap();
        let report = json_report(output, &written, true, project.sources());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["cycle"], 1);
        assert_eq!(json["stats"]["code_files"], 1);
        assert_eq!(json["outputs"][0], "/p/a.js");
        assert_eq!(json["diagnostics"][0]["location"], "/p/a.ts:2:1");
        assert_eq!(json["diagnostics"][0]["message"], "merge conflict marker");
        assert_eq!(count(&output.diagnostics, Severity::Warning), 1);
    }
}
