//! Project configuration for the weft build orchestrator.
//!
//! This crate reads a `tsconfig.json`-style project file (JSON with comments)
//! into a typed [`ProjectConfig`], reads orchestrator switches from an optional
//! `weft.toml` into [`BuildSettings`], and combines both into the immutable
//! [`BuildConfiguration`] a build session runs with.

#![warn(missing_docs)]

pub mod build;
pub mod error;
pub mod loader;
pub mod types;

pub use build::BuildConfiguration;
pub use error::ConfigError;
pub use loader::{
    load_configuration, load_project, load_project_from_str, load_settings,
    load_settings_from_str, strip_json_comments, SETTINGS_FILE,
};
pub use types::*;
