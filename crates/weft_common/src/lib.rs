//! Shared foundational types used across the weft build orchestrator.
//!
//! This crate provides content hashing for change detection and lexical path
//! normalization so every crate agrees on the identity of a source file.

#![warn(missing_docs)]

pub mod hash;
pub mod path;

pub use hash::ContentHash;
pub use path::{normalize_path, resolve_path};
