//! End-to-end build cycles driven through the public session API.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use weft_compiler::{CompileError, CompileResult, Compiler, IdentityCompiler};
use weft_config::{load_project_from_str, BuildConfiguration, BuildSettings, ConfigError};
use weft_output::MemorySink;
use weft_project::{MemoryLoader, Project, SessionError};
use weft_source::{ChangeSet, SourceCache};

/// What the compiler was told about one cycle.
#[derive(Debug, Clone)]
struct Seen {
    changed: Vec<PathBuf>,
    unchanged: Vec<PathBuf>,
}

/// Wraps the identity backend and records every change set it receives.
struct Recording {
    inner: IdentityCompiler,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Compiler for Recording {
    fn name(&self) -> &str {
        "recording"
    }

    fn compile(
        &mut self,
        sources: &SourceCache,
        config: &BuildConfiguration,
        changes: &ChangeSet,
    ) -> Result<CompileResult, CompileError> {
        self.seen.lock().unwrap().push(Seen {
            changed: changes.changed().cloned().collect(),
            unchanged: changes.unchanged.clone(),
        });
        self.inner.compile(sources, config, changes)
    }
}

struct Harness {
    project: Project,
    files: MemoryLoader,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Harness {
    fn new(json: &str, settings: BuildSettings, files: &[(&str, &str)]) -> Self {
        let loader = MemoryLoader::new();
        for (path, content) in files {
            loader.insert(Path::new("/proj").join(path), *content);
        }
        let config = BuildConfiguration::new(
            "/proj/tsconfig.json",
            load_project_from_str(json).unwrap(),
            settings,
        );
        let seen = Arc::new(Mutex::new(Vec::new()));
        let compiler = Recording {
            inner: IdentityCompiler::new(),
            seen: Arc::clone(&seen),
        };
        let project = Project::new(config, Box::new(compiler)).with_loader(loader.clone());
        Self {
            project,
            files: loader,
            seen,
        }
    }

    fn cycle(&mut self) -> (MemorySink, MemorySink) {
        self.project.load_sources().unwrap();
        let mut code = MemorySink::new();
        let mut decls = MemorySink::new();
        self.project.reset(&mut code, &mut decls).unwrap();
        (code, decls)
    }

    fn last_seen(&self) -> Seen {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

fn reference(target: &str) -> String {
    format!("/// <reference path=\"{target}\" />\n")
}

fn sorted(on: bool) -> BuildSettings {
    BuildSettings {
        sort_output: on,
        ..BuildSettings::default()
    }
}

const TWO_FILES: &str = r#"{ "files": ["a.ts", "b.ts"], "compilerOptions": { "declaration": true } }"#;

// -- scenario 1: per-file output order --

#[test]
fn unsorted_output_keeps_list_order() {
    let a = format!("{}export const a = b;\n", reference("b.ts"));
    let mut h = Harness::new(
        TWO_FILES,
        sorted(false),
        &[("a.ts", &a), ("b.ts", "export const b = 1;\n")],
    );
    let (code, decls) = h.cycle();

    assert_eq!(code.paths(), [Path::new("/proj/a.js"), Path::new("/proj/b.js")]);
    assert_eq!(decls.paths(), [Path::new("/proj/a.d.ts"), Path::new("/proj/b.d.ts")]);
    assert!(code.is_finished() && decls.is_finished());
}

#[test]
fn sorted_output_puts_referenced_file_first() {
    let a = format!("{}export const a = b;\n", reference("b.ts"));
    let mut h = Harness::new(
        TWO_FILES,
        sorted(true),
        &[("a.ts", &a), ("b.ts", "export const b = 1;\n")],
    );
    let (code, decls) = h.cycle();

    assert_eq!(code.paths(), [Path::new("/proj/b.js"), Path::new("/proj/a.js")]);
    assert_eq!(decls.paths(), [Path::new("/proj/b.d.ts"), Path::new("/proj/a.d.ts")]);
}

// -- scenario 2: bundle with a reference cycle --

#[test]
fn bundle_with_cycle_reports_and_keeps_list_order() {
    let a = format!("{}const a = 1;\n", reference("b.ts"));
    let b = format!("{}const b = 2;\n", reference("a.ts"));
    let mut h = Harness::new(
        r#"{ "files": ["a.ts", "b.ts"], "compilerOptions": { "out": "bundle.js" } }"#,
        BuildSettings::default(),
        &[("a.ts", &a), ("b.ts", &b)],
    );
    let (code, decls) = h.cycle();

    assert_eq!(code.files().len(), 1);
    assert!(decls.files().is_empty());
    let bundle = code.contents("/proj/bundle.js").unwrap();
    assert!(bundle.find("const a").unwrap() < bundle.find("const b").unwrap());

    let output = h.project.output().unwrap();
    let cycles: Vec<_> = output
        .diagnostics
        .iter()
        .filter(|d| d.code.to_string() == "O001")
        .collect();
    assert_eq!(cycles.len(), 1);
    assert!(output.has_errors());
    assert_eq!(output.assembler.cycles().len(), 1);
}

// -- scenario 3: change detection across cycles --

#[test]
fn only_the_edited_file_is_changed() {
    let mut h = Harness::new(
        TWO_FILES,
        BuildSettings::default(),
        &[("a.ts", "let a = 1;\n"), ("b.ts", "let b = 1;\n")],
    );
    h.cycle();
    h.files.insert("/proj/b.ts", "let b = 2;\n");
    h.cycle();

    let changes = &h.project.output().unwrap().changes;
    let changed: Vec<&PathBuf> = changes.changed().collect();
    assert_eq!(changed, [&PathBuf::from("/proj/b.ts")]);
    assert!(changes.removed.is_empty());
    assert_eq!(changes.unchanged, [PathBuf::from("/proj/a.ts")]);
}

// -- properties --

#[test]
fn unchanged_cycles_are_idempotent() {
    let a = format!("{}export const a = b;\n", reference("b.ts"));
    let mut h = Harness::new(
        r#"{ "files": ["a.ts", "b.ts"], "compilerOptions": { "out": "all.js", "declaration": true } }"#,
        BuildSettings::default(),
        &[("a.ts", &a), ("b.ts", "export const b = 1;\n")],
    );
    let (code1, decls1) = h.cycle();
    let (code2, decls2) = h.cycle();

    assert_eq!(code1.files(), code2.files());
    assert_eq!(decls1.files(), decls2.files());
    assert!(h.project.output().unwrap().changes.is_empty());
}

#[test]
fn compiler_is_told_which_files_are_unchanged() {
    let mut h = Harness::new(
        r#"{ "files": ["a.ts", "b.ts", "c.ts"] }"#,
        BuildSettings::default(),
        &[("a.ts", "a"), ("b.ts", "b"), ("c.ts", "c")],
    );
    h.cycle();
    assert_eq!(h.last_seen().changed.len(), 3);

    h.files.insert("/proj/c.ts", "c2");
    h.cycle();
    let seen = h.last_seen();
    assert_eq!(seen.changed, [PathBuf::from("/proj/c.ts")]);
    assert_eq!(
        seen.unchanged,
        [PathBuf::from("/proj/a.ts"), PathBuf::from("/proj/b.ts")]
    );
    for path in &seen.unchanged {
        assert!(!h.project.sources().has_changed(path));
    }
}

#[test]
fn bundle_respects_every_reference() {
    // e -> {c, d}, d -> b, c -> {a, b}, b -> a
    let files = [
        ("e.ts", format!("{}{}const e = 0;\n", reference("c.ts"), reference("d.ts"))),
        ("d.ts", format!("{}const d = 0;\n", reference("b.ts"))),
        ("c.ts", format!("{}{}const c = 0;\n", reference("a.ts"), reference("b.ts"))),
        ("b.ts", format!("{}const b = 0;\n", reference("a.ts"))),
        ("a.ts", "const a = 0;\n".to_string()),
    ];
    let edges = [("e", "c"), ("e", "d"), ("d", "b"), ("c", "a"), ("c", "b"), ("b", "a")];
    let borrowed: Vec<(&str, &str)> = files.iter().map(|(p, c)| (*p, c.as_str())).collect();
    let mut h = Harness::new(
        r#"{ "files": ["e.ts", "d.ts", "c.ts", "b.ts", "a.ts"], "compilerOptions": { "out": "all.js" } }"#,
        BuildSettings::default(),
        &borrowed,
    );
    let (code, _) = h.cycle();

    let bundle = code.contents("/proj/all.js").unwrap();
    let at = |name: &str| bundle.find(&format!("const {name} = ")).unwrap();
    for (from, to) in edges {
        assert!(at(to) < at(from), "{to} must precede {from}");
    }
    assert!(h.project.output().unwrap().diagnostics.is_empty());
}

#[test]
fn cycles_never_abort_and_fall_back_deterministically() {
    let files = [
        ("x.ts", format!("{}const x = 0;\n", reference("y.ts"))),
        ("y.ts", format!("{}const y = 0;\n", reference("z.ts"))),
        ("z.ts", format!("{}const z = 0;\n", reference("x.ts"))),
    ];
    let borrowed: Vec<(&str, &str)> = files.iter().map(|(p, c)| (*p, c.as_str())).collect();
    let mut h = Harness::new(
        r#"{ "files": ["z.ts", "x.ts", "y.ts"] }"#,
        sorted(true),
        &borrowed,
    );

    let (first, _) = h.cycle();
    let (second, _) = h.cycle();
    let expected = [
        Path::new("/proj/z.js"),
        Path::new("/proj/x.js"),
        Path::new("/proj/y.js"),
    ];
    assert_eq!(first.paths(), expected);
    assert_eq!(second.paths(), expected);
    assert_eq!(h.project.output().unwrap().assembler.cycles().len(), 1);
}

#[test]
fn resolution_without_file_list_fails_without_staging() {
    let mut h = Harness::new("{}", BuildSettings::default(), &[("a.ts", "a")]);
    let err = h.project.load_sources().unwrap_err();

    assert!(matches!(
        err,
        SessionError::Configuration(ConfigError::MissingFileList)
    ));
    assert_eq!(h.project.sources().entry_count(), 0);
}

#[test]
fn removed_file_reappears_with_its_history() {
    let mut h = Harness::new(
        TWO_FILES,
        BuildSettings::default(),
        &[("a.ts", "a"), ("b.ts", "b")],
    );
    h.cycle();
    let id = h.project.sources().get("/proj/b.ts").unwrap().id;

    h.project.add_source("/proj/a.ts", "a");
    let mut code = MemorySink::new();
    let mut decls = MemorySink::new();
    h.project.reset(&mut code, &mut decls).unwrap();
    assert_eq!(
        h.project.output().unwrap().changes.removed,
        [PathBuf::from("/proj/b.ts")]
    );

    h.cycle();
    let changes = &h.project.output().unwrap().changes;
    assert_eq!(changes.reappeared, [PathBuf::from("/proj/b.ts")]);
    assert_eq!(h.project.sources().get("/proj/b.ts").unwrap().id, id);
}
