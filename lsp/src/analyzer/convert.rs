use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

use tantrums_core::{Diagnostic as CoreDiagnostic, Severity};

pub const DIAGNOSTIC_SOURCE: &str = "tantrums";

/// UTF-16 offset of the `char` column `col` within `line`, clamped to the line end.
pub fn utf16_col(line: &str, col: usize) -> u32 {
    if line.is_ascii() {
        return col.min(line.len()) as u32;
    }
    line.chars().take(col).map(char::len_utf16).sum::<usize>() as u32
}

pub fn severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    }
}

/// Convert one core diagnostic, given the lines of the analysed text.
pub fn to_lsp(diag: &CoreDiagnostic, lines: &[&str]) -> Diagnostic {
    let line = lines.get(diag.line).copied().unwrap_or("");
    let row = diag.line as u32;
    Diagnostic {
        range: Range::new(
            Position::new(row, utf16_col(line, diag.start)),
            Position::new(row, utf16_col(line, diag.end)),
        ),
        severity: Some(severity(diag.severity)),
        code: Some(NumberOrString::String(diag.rule.code().to_string())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: diag.message.clone(),
        ..Default::default()
    }
}

/// Lines exactly as the core splits them.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect()
}
