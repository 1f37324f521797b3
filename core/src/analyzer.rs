//! One full analysis pass: collect symbols, run the rules, order the result.

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::debug;

use crate::config::LintConfig;
use crate::diagnostic::Diagnostic;
use crate::lang::LanguageMode;
use crate::rules::{self, RuleContext};
use crate::source::SourceFile;
use crate::symbols::SymbolTable;

/// Outcome of analysing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub diagnostics: Vec<Diagnostic>,
    pub mode: LanguageMode,
    pub line_count: usize,
    /// True when the configured cap dropped diagnostics.
    pub truncated: bool,
}

impl Analysis {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: LintConfig,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LintConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Analyse `text`. Pure: the same text always yields the same list.
    pub fn analyze(&self, text: &str) -> Analysis {
        let source = SourceFile::new(text);
        let symbols = SymbolTable::collect(&source);
        let ctx = RuleContext::new(&source, &symbols, &self.config);

        let mut diagnostics = Vec::new();
        rules::run_all(&ctx, &mut diagnostics);

        for diag in &mut diagnostics {
            if let Some(severity) = self.config.severity_for(diag.rule) {
                diag.severity = severity;
            }
        }
        // stable: equal positions keep rule order
        diagnostics.sort_by_key(|d| (d.line, d.start));

        let truncated = diagnostics.len() > self.config.max_diagnostics;
        diagnostics.truncate(self.config.max_diagnostics);

        debug!(
            lines = source.len(),
            diagnostics = diagnostics.len(),
            mode = %ctx.mode,
            truncated,
            "analysis finished"
        );

        Analysis {
            diagnostics,
            mode: ctx.mode,
            line_count: source.len(),
            truncated,
        }
    }

    /// Like [`Analyzer::analyze`], but an internal fault comes back as an
    /// error instead of unwinding into the caller.
    pub fn try_analyze(&self, text: &str) -> Result<Analysis> {
        panic::catch_unwind(AssertUnwindSafe(|| self.analyze(text))).map_err(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            anyhow!("analysis aborted: {}", reason)
        })
    }
}

/// Analyse with the default configuration.
pub fn analyze(text: &str) -> Analysis {
    Analyzer::new().analyze(text)
}
