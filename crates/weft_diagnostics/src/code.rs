//! Diagnostic codes with category prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Source resolution problems, prefixed with `R`.
    Resolution,
    /// Output ordering problems, prefixed with `O`.
    Ordering,
    /// Diagnostics produced by a compiler backend, prefixed with `C`.
    Compiler,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Resolution => 'R',
            Category::Ordering => 'O',
            Category::Compiler => 'C',
        }
    }
}

/// A diagnostic code: a category prefix and a number, displayed as e.g. `R001`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// Codes raised by the orchestrator itself.
pub mod codes {
    use super::{Category, DiagnosticCode};

    /// A referenced file could not be found.
    pub const MISSING_REFERENCE: DiagnosticCode = DiagnosticCode::new(Category::Resolution, 1);

    /// A referenced file lies outside the project while external resolution is off.
    pub const UNRESOLVED_EXTERNAL: DiagnosticCode = DiagnosticCode::new(Category::Resolution, 2);

    /// Reference markers form a cycle, so no dependency order exists.
    pub const CYCLIC_REFERENCE: DiagnosticCode = DiagnosticCode::new(Category::Ordering, 1);
}
