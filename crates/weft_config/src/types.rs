//! Configuration types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The project file: the file list and the compiler options.
///
/// Keys the orchestrator does not read are kept in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Source paths relative to the base directory, in build order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    /// Options handed to the compiler backend.
    #[serde(default)]
    pub compiler_options: CompilerOptions,
    /// Unrecognized top-level keys (`include`, `exclude`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Compiler options with the fields the orchestrator interprets.
///
/// Everything else lands in `extra` and is passed through to the compiler
/// backend without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Overrides the base directory sources are resolved against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<String>,
    /// Single bundle output path. Its presence switches on bundle mode.
    #[serde(default, alias = "outFile", skip_serializing_if = "Option::is_none")]
    pub out: Option<String>,
    /// Directory for per-file outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
    /// Whether to produce declaration text.
    #[serde(default)]
    pub declaration: bool,
    /// Language level of the emitted code (`es5`, `es2015`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Module system of the emitted code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Unrecognized options.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Tie-break rule for files with no reference relationship between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// Keep the order in which sources were resolved.
    #[default]
    Resolution,
    /// Sort by path.
    Path,
}

/// Orchestrator switches that are not compiler options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Do not load referenced files that are missing from the project;
    /// report them instead so the caller can add them explicitly.
    #[serde(default)]
    pub no_external_resolve: bool,
    /// Order streamed per-file outputs by their reference markers.
    #[serde(default)]
    pub sort_output: bool,
    /// Tie-break rule for unrelated files.
    #[serde(default)]
    pub ordering: OrderingPolicy,
}

/// On-disk shape of `weft.toml`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SettingsFile {
    #[serde(default)]
    pub build: BuildSettings,
}
