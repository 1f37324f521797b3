use serde::Serialize;

use tantrums_core::{Analysis, Diagnostic, RuleId};

/// Diagnostics found in one input file.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FileReport {
    pub(crate) file: String,
    pub(crate) diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub(crate) truncated: bool,
}

impl FileReport {
    pub(crate) fn new(file: impl Into<String>, analysis: Analysis, errors_only: bool) -> Self {
        let mut diagnostics = analysis.diagnostics;
        if errors_only {
            diagnostics.retain(Diagnostic::is_error);
        }
        Self {
            file: file.into(),
            diagnostics,
            truncated: analysis.truncated,
        }
    }

    pub(crate) fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

pub(crate) fn render_text(reports: &[FileReport]) -> String {
    let mut out = String::new();
    for report in reports {
        for diag in &report.diagnostics {
            out.push_str(&format!("{}:{}\n", report.file, diag));
        }
        if report.truncated {
            out.push_str(&format!("{}: too many diagnostics, output truncated\n", report.file));
        }
    }
    let errors: usize = reports.iter().map(FileReport::error_count).sum();
    let total: usize = reports.iter().map(|r| r.diagnostics.len()).sum();
    out.push_str(&format!(
        "{} file(s) checked: {} error(s), {} warning(s)\n",
        reports.len(),
        errors,
        total - errors
    ));
    out
}

pub(crate) fn render_json(reports: &[FileReport]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

/// One line per rule: code, default severity and a short description.
pub(crate) fn render_rules() -> String {
    RuleId::ALL
        .iter()
        .map(|rule| format!("{:<28}{:<9}{}\n", rule.code(), rule.default_severity().to_string(), rule.description()))
        .collect()
}
