//! Weft CLI, the command-line front end of the weft build orchestrator.
//!
//! Provides `weft build` to run one build cycle for a project and write its
//! outputs, and `weft files` to print the project's resolved source list.

#![warn(missing_docs)]

mod build;
mod files;
mod pipeline;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use weft_config::OrderingPolicy;

/// Weft, an incremental build orchestrator.
#[derive(Parser, Debug)]
#[command(name = "weft", version, about = "Weft build orchestrator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to the project file (default: nearest `tsconfig.json` upwards).
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one build cycle and write the outputs.
    Build(BuildArgs),
    /// Print the resolved source files, one per line.
    Files,
}

/// Arguments for the `weft build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Report referenced files outside the project instead of loading them.
    #[arg(long)]
    pub no_external_resolve: bool,

    /// Push per-file outputs in reference order.
    #[arg(long)]
    pub sort_output: bool,

    /// Tie-break rule for files with no reference between them.
    #[arg(long, value_enum)]
    pub ordering: Option<CliOrdering>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Compute the outputs but do not write them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Tie-break rule as given on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliOrdering {
    /// Keep the order of the project's file list.
    Resolution,
    /// Sort by path.
    Path,
}

impl From<CliOrdering> for OrderingPolicy {
    fn from(value: CliOrdering) -> Self {
        match value {
            CliOrdering::Resolution => OrderingPolicy::Resolution,
            CliOrdering::Path => OrderingPolicy::Path,
        }
    }
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to the project file.
    pub project: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        project: cli.project,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Files => files::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if global.verbose {
            "debug"
        } else if global.quiet {
            "error"
        } else {
            "warn"
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["weft", "build"]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(!args.no_external_resolve);
                assert!(!args.sort_output);
                assert!(args.ordering.is_none());
                assert_eq!(args.format, ReportFormat::Text);
                assert!(!args.dry_run);
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_build_with_args() {
        let cli = Cli::parse_from([
            "weft",
            "build",
            "--no-external-resolve",
            "--sort-output",
            "--ordering",
            "path",
            "--format",
            "json",
            "--dry-run",
        ]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(args.no_external_resolve);
                assert!(args.sort_output);
                assert_eq!(args.ordering, Some(CliOrdering::Path));
                assert_eq!(args.format, ReportFormat::Json);
                assert!(args.dry_run);
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_files() {
        let cli = Cli::parse_from(["weft", "files"]);
        assert!(matches!(cli.command, Command::Files));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["weft", "--quiet", "--color", "never", "build"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["weft", "files", "-v", "--project", "app/tsconfig.json"]);
        assert!(cli.verbose);
        assert_eq!(cli.project.as_deref(), Some("app/tsconfig.json"));
    }

    #[test]
    fn parse_color_always() {
        let cli = Cli::parse_from(["weft", "--color", "always", "files"]);
        assert_eq!(cli.color, ColorChoice::Always);
    }

    #[test]
    fn ordering_converts() {
        assert_eq!(OrderingPolicy::from(CliOrdering::Path), OrderingPolicy::Path);
        assert_eq!(
            OrderingPolicy::from(CliOrdering::Resolution),
            OrderingPolicy::Resolution
        );
    }
}
