use serde::Serialize;
use tower_lsp::lsp_types::*;

use tantrums_core::{Analysis, Analyzer, LanguageMode, LintConfig};

pub mod convert;

/// Result of analysing one document, in LSP terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub diagnostics: Vec<Diagnostic>,
    pub mode: LanguageMode,
    pub truncated: bool,
}

impl AnalysisResult {
    fn from_core(analysis: Analysis, text: &str) -> Self {
        let lines = convert::split_lines(text);
        Self {
            diagnostics: analysis
                .diagnostics
                .iter()
                .map(|d| convert::to_lsp(d, &lines))
                .collect(),
            mode: analysis.mode,
            truncated: analysis.truncated,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Some(DiagnosticSeverity::ERROR))
    }
}

/// Tantrums analyzer for the language server.
#[derive(Debug, Clone, Default)]
pub struct TantrumsAnalyzer {
    inner: Analyzer,
}

impl TantrumsAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LintConfig) -> Self {
        Self {
            inner: Analyzer::with_config(config),
        }
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        AnalysisResult::from_core(self.inner.analyze(text), text)
    }

    /// Fails instead of panicking if the pass hits an internal fault.
    pub fn try_analyze(&self, text: &str) -> anyhow::Result<AnalysisResult> {
        let analysis = self.inner.try_analyze(text)?;
        Ok(AnalysisResult::from_core(analysis, text))
    }
}
