//! A document split into lines, each paired with its lexical classification.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lang::LanguageMode;
use crate::lex::{self, LineScan};

pub(crate) static MODE_DIRECTIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#mode\s+(static|dynamic|both)\s*;?\s*$").unwrap());

/// One line of the document. Columns are `char` indices into `text`.
#[derive(Debug, Clone)]
pub struct SourceLine {
    pub index: usize,
    pub text: String,
    /// `text` with string bodies and comments blanked, same column layout.
    pub code: String,
    pub scan: LineScan,
}

impl SourceLine {
    pub fn len(&self) -> usize {
        self.scan.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scan.regions.is_empty()
    }

    /// Trimmed code view.
    pub fn trimmed(&self) -> &str {
        self.code.trim()
    }

    /// True when nothing but whitespace and braces remains after stripping.
    pub fn is_blank_or_braces(&self) -> bool {
        self.code.chars().all(|c| c.is_whitespace() || c == '{' || c == '}')
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    text: String,
    lines: Vec<SourceLine>,
}

impl SourceFile {
    /// Split on `\n` or `\r\n` and classify every line.
    pub fn new(text: &str) -> Self {
        let raw: Vec<&str> = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
        let scans = lex::scan_lines(raw.iter().copied());
        let lines = raw
            .into_iter()
            .zip(scans)
            .enumerate()
            .map(|(index, (line, scan))| SourceLine {
                index,
                text: line.to_string(),
                code: lex::strip_line(line, &scan),
                scan,
            })
            .collect();
        Self {
            text: text.to_string(),
            lines,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&SourceLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Mode selected by the first well-formed `#mode` directive, `Both` when absent.
    pub fn mode(&self) -> LanguageMode {
        self.lines
            .iter()
            .find_map(|l| {
                MODE_DIRECTIVE
                    .captures(l.text.trim())
                    .and_then(|c| c.get(1))
                    .and_then(|m| m.as_str().parse().ok())
            })
            .unwrap_or_default()
    }
}

/// Convert a byte offset within `s` to a `char` column.
pub fn char_col(s: &str, byte: usize) -> usize {
    s.get(..byte).map(|p| p.chars().count()).unwrap_or_else(|| s.chars().count())
}
