//! Human-readable diagnostic rendering.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;
use crate::severity::Severity;
use weft_source::SourceCache;

/// Formats a diagnostic into a string.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic against the sources it points into.
    fn render(&self, diag: &Diagnostic, sources: &SourceCache) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// ```text
/// error[O001]: reference cycle between a.ts and b.ts
///   --> /proj/a.ts:1:22
///   |
/// 1 | /// <reference path="b.ts" />
///   |                      ^^^^ references b.ts
///   |
///   = note: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity_label(&self, severity: Severity) -> String {
        if !self.color {
            return severity.to_string();
        }
        let color = match severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
        };
        format!("\x1b[1;{color}m{severity}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, sources: &SourceCache) -> String {
        let mut out = format!(
            "{}[{}]: {}\n",
            self.severity_label(diag.severity),
            diag.code,
            diag.message
        );

        let span = diag.primary_span;
        if let (false, Some(resolved), Some(file)) = (
            span.is_dummy(),
            sources.resolve_span(span),
            sources.file(span.file),
        ) {
            out.push_str(&format!("  --> {resolved}\n"));

            let (line, col) = file.line_col(span.start);
            let line_num = line.to_string();
            let padding = " ".repeat(line_num.len());
            let line_content = get_source_line(&file.content, span.start);

            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {line_content}\n"));

            let carets = "^".repeat(span.len().max(1) as usize);
            let col_padding = " ".repeat((col as usize).saturating_sub(1));
            let primary_msg = diag
                .labels
                .iter()
                .find(|l| l.style == LabelStyle::Primary)
                .map(|l| format!(" {}", l.message))
                .unwrap_or_default();
            out.push_str(&format!("{padding} | {col_padding}{carets}{primary_msg}\n"));
        }

        for label in diag.labels.iter().filter(|l| l.style == LabelStyle::Secondary) {
            match sources.resolve_span(label.span) {
                Some(resolved) => out.push_str(&format!("   - {resolved}: {}\n", label.message)),
                None => out.push_str(&format!("   - {}\n", label.message)),
            }
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

/// Extracts the line of source text containing `byte_offset`, without its terminator.
fn get_source_line(content: &str, byte_offset: u32) -> &str {
    let mut offset = (byte_offset as usize).min(content.len());
    while !content.is_char_boundary(offset) {
        offset -= 1;
    }
    let start = content[..offset].rfind('\n').map_or(0, |pos| pos + 1);
    let end = content[offset..]
        .find('\n')
        .map_or(content.len(), |pos| offset + pos);
    content[start..end].trim_end_matches('\r')
}
