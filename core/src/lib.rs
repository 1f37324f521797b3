//! Heuristic static analysis for Tantrums (`.42AHH`) source files.
//!
//! The engine never builds a syntax tree. Each pass splits the document into
//! lines, classifies strings and comments, collects symbols and a brace scope
//! tree, then runs an ordered set of independent rules over that shared view.

pub mod analyzer;
pub mod config;
pub mod diagnostic;
pub mod infer;
pub mod lang;
pub mod lex;
pub mod rules;
pub mod source;
pub mod store;
pub mod symbols;

pub use analyzer::{analyze, Analysis, Analyzer};
pub use config::{LintConfig, UnusedPolicy};
pub use diagnostic::{Diagnostic, RuleId, Severity};
pub use lang::LanguageMode;
pub use store::DiagnosticStore;
