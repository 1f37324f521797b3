//! Diagnostic records produced by the rule set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// Stable identifier of each check, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    ModeDirective,
    BracketMismatch,
    UnterminatedString,
    InvalidEscape,
    MissingSemicolon,
    EmptyCondition,
    CallMismatch,
    AssignmentType,
    DuplicateFunction,
    DuplicateVariable,
    UndefinedFunction,
    UndefinedVariable,
    ReturnOutsideFunction,
    DeadCode,
    DivisionByZero,
    MissingReturn,
    UnusedVariable,
    ShadowedBuiltin,
    EmptyBlock,
    StaticUntypedAssignment,
    StaticMissingReturnType,
}

impl RuleId {
    pub const ALL: [RuleId; 21] = [
        RuleId::ModeDirective,
        RuleId::BracketMismatch,
        RuleId::UnterminatedString,
        RuleId::InvalidEscape,
        RuleId::MissingSemicolon,
        RuleId::EmptyCondition,
        RuleId::CallMismatch,
        RuleId::AssignmentType,
        RuleId::DuplicateFunction,
        RuleId::DuplicateVariable,
        RuleId::UndefinedFunction,
        RuleId::UndefinedVariable,
        RuleId::ReturnOutsideFunction,
        RuleId::DeadCode,
        RuleId::DivisionByZero,
        RuleId::MissingReturn,
        RuleId::UnusedVariable,
        RuleId::ShadowedBuiltin,
        RuleId::EmptyBlock,
        RuleId::StaticUntypedAssignment,
        RuleId::StaticMissingReturnType,
    ];

    pub fn code(self) -> &'static str {
        match self {
            RuleId::ModeDirective => "mode-directive",
            RuleId::BracketMismatch => "bracket-mismatch",
            RuleId::UnterminatedString => "unterminated-string",
            RuleId::InvalidEscape => "invalid-escape",
            RuleId::MissingSemicolon => "missing-semicolon",
            RuleId::EmptyCondition => "empty-condition",
            RuleId::CallMismatch => "call-mismatch",
            RuleId::AssignmentType => "assignment-type",
            RuleId::DuplicateFunction => "duplicate-function",
            RuleId::DuplicateVariable => "duplicate-variable",
            RuleId::UndefinedFunction => "undefined-function",
            RuleId::UndefinedVariable => "undefined-variable",
            RuleId::ReturnOutsideFunction => "return-outside-function",
            RuleId::DeadCode => "dead-code",
            RuleId::DivisionByZero => "division-by-zero",
            RuleId::MissingReturn => "missing-return",
            RuleId::UnusedVariable => "unused-variable",
            RuleId::ShadowedBuiltin => "shadowed-builtin",
            RuleId::EmptyBlock => "empty-block",
            RuleId::StaticUntypedAssignment => "static-untyped-assignment",
            RuleId::StaticMissingReturnType => "static-missing-return-type",
        }
    }

    /// Severity used when the configuration does not override it.
    /// `mode-directive` also reports a missing `;` as a warning.
    pub fn default_severity(self) -> Severity {
        match self {
            RuleId::MissingSemicolon
            | RuleId::DuplicateVariable
            | RuleId::UndefinedVariable
            | RuleId::DeadCode
            | RuleId::MissingReturn
            | RuleId::UnusedVariable
            | RuleId::ShadowedBuiltin
            | RuleId::EmptyBlock => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RuleId::ModeDirective => "`#` directives must read `#mode static|dynamic|both;`",
            RuleId::BracketMismatch => "unmatched or mismatched (), [] and {}",
            RuleId::UnterminatedString => "string literal still open at end of line",
            RuleId::InvalidEscape => "escape sequence other than \\n \\t \\\\ \\\" \\r \\0",
            RuleId::MissingSemicolon => "statement not terminated by `;`",
            RuleId::EmptyCondition => "`if ()` or `while ()` without a condition",
            RuleId::CallMismatch => "call arity or literal argument type differs from the declaration",
            RuleId::AssignmentType => "literal assigned to a typed variable has the wrong type",
            RuleId::DuplicateFunction => "function declared more than once",
            RuleId::DuplicateVariable => "typed variable declared twice in the same block",
            RuleId::UndefinedFunction => "call to a function that is never declared",
            RuleId::UndefinedVariable => "identifier that is never bound anywhere in the file",
            RuleId::ReturnOutsideFunction => "`return` outside any function body",
            RuleId::DeadCode => "statements after `return` in the same block",
            RuleId::DivisionByZero => "division by a literal zero",
            RuleId::MissingReturn => "function with a return type that never returns",
            RuleId::UnusedVariable => "variable never referenced after its declaration",
            RuleId::ShadowedBuiltin => "variable named after a built-in function",
            RuleId::EmptyBlock => "control-structure block with no body",
            RuleId::StaticUntypedAssignment => "static mode: assignment to a variable without a declared type",
            RuleId::StaticMissingReturnType => "static mode: function without a declared return type",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleId::ALL
            .into_iter()
            .find(|r| r.code() == s)
            .ok_or_else(|| format!("Unknown rule: {}", s))
    }
}

/// A single finding on one line. Columns are `char` indices, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub message: String,
    pub severity: Severity,
    pub rule: RuleId,
}

impl Diagnostic {
    pub fn new(rule: RuleId, line: usize, start: usize, end: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            start,
            end: end.max(start),
            message: message.into(),
            severity: rule.default_severity(),
            rule,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}[{}]: {}",
            self.line + 1,
            self.start + 1,
            self.severity,
            self.rule,
            self.message
        )
    }
}
