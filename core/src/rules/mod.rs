//! The diagnostic rule set.
//!
//! Every rule is a plain function over a shared, read-only [`RuleContext`].
//! Rules never see each other's output; [`RULES`] fixes the order in which
//! they run, which is also the tie-break order for diagnostics that land on
//! the same column.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::config::LintConfig;
use crate::diagnostic::{Diagnostic, RuleId};
use crate::lang::LanguageMode;
use crate::source::{char_col, SourceFile};
use crate::symbols::{SymbolTable, FUNCTION_HEADER, HEADER_START};

mod flow;
mod names;
mod syntax;
mod types;

#[cfg(test)]
mod rules_test;

/// Everything a rule may read. Nothing in here changes while rules run.
pub struct RuleContext<'a> {
    pub source: &'a SourceFile,
    pub symbols: &'a SymbolTable,
    pub mode: LanguageMode,
    pub config: &'a LintConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(source: &'a SourceFile, symbols: &'a SymbolTable, config: &'a LintConfig) -> Self {
        Self {
            source,
            symbols,
            mode: source.mode(),
            config,
        }
    }
}

pub type RuleFn = fn(&RuleContext<'_>, &mut Vec<Diagnostic>);

pub const RULES: &[(RuleId, RuleFn)] = &[
    (RuleId::ModeDirective, syntax::check_mode_directive),
    (RuleId::BracketMismatch, syntax::check_brackets),
    (RuleId::UnterminatedString, syntax::check_unterminated_strings),
    (RuleId::InvalidEscape, syntax::check_escapes),
    (RuleId::MissingSemicolon, syntax::check_semicolons),
    (RuleId::EmptyCondition, syntax::check_empty_conditions),
    (RuleId::CallMismatch, types::check_calls),
    (RuleId::AssignmentType, types::check_assignments),
    (RuleId::DuplicateFunction, names::check_duplicate_functions),
    (RuleId::DuplicateVariable, names::check_duplicate_variables),
    (RuleId::UndefinedFunction, names::check_undefined_functions),
    (RuleId::UndefinedVariable, names::check_undefined_variables),
    (RuleId::ReturnOutsideFunction, flow::check_return_outside_function),
    (RuleId::DeadCode, flow::check_dead_code),
    (RuleId::DivisionByZero, flow::check_division_by_zero),
    (RuleId::MissingReturn, flow::check_missing_return),
    (RuleId::UnusedVariable, names::check_unused_variables),
    (RuleId::ShadowedBuiltin, names::check_shadowed_builtins),
    (RuleId::EmptyBlock, flow::check_empty_blocks),
    (RuleId::StaticUntypedAssignment, types::check_static_untyped_assignments),
    (RuleId::StaticMissingReturnType, types::check_static_return_types),
];

/// Run every enabled rule in order, appending to `out`.
pub fn run_all(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for (rule, check) in RULES {
        if !ctx.config.is_enabled(*rule) {
            continue;
        }
        let before = out.len();
        check(ctx, out);
        trace!(rule = rule.code(), found = out.len() - before, "rule finished");
    }
}

/// Run a single rule, ignoring whether it is enabled.
pub fn run_one(ctx: &RuleContext<'_>, rule: RuleId) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    if let Some((_, check)) = RULES.iter().find(|(r, _)| *r == rule) {
        check(ctx, &mut out);
    }
    out
}

/// Char columns covered by a function header on this line. A header whose
/// parameter list does not close here covers the rest of the line.
pub(crate) fn header_span(code: &str) -> Option<Range<usize>> {
    if let Some(m) = FUNCTION_HEADER.find(code) {
        return Some(char_col(code, m.start())..char_col(code, m.end()));
    }
    HEADER_START
        .find(code)
        .map(|m| char_col(code, m.start())..usize::MAX)
}

static CALL_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*\(").unwrap());

/// A call expression found on one stripped line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call<'a> {
    pub name: &'a str,
    /// Char column of the callee name.
    pub col: usize,
    /// Text between the parentheses; `None` when the `)` is not on this line.
    pub args: Option<&'a str>,
    /// Char column just past the closing `)`, or past the `(` when unclosed.
    pub end: usize,
}

/// Every `name(` on a stripped line, nested calls included.
pub(crate) fn find_calls(code: &str) -> Vec<Call<'_>> {
    CALL_START
        .captures_iter(code)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            let open = whole.end() - 1;
            let close = matching_paren(code, open);
            let (args, end_byte) = match close {
                Some(close) => (Some(&code[open + 1..close]), close + 1),
                None => (None, whole.end()),
            };
            Some(Call {
                name: name.as_str(),
                col: char_col(code, name.start()),
                args,
                end: char_col(code, end_byte),
            })
        })
        .collect()
}

/// Byte index of the `)` closing the `(` at `open`.
fn matching_paren(code: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in code[open..].char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (c == ')').then_some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split an argument list on top-level commas. A blank list has no arguments.
pub(crate) fn split_args(src: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in src.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                args.push(src[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = src[start..].trim();
    if !last.is_empty() {
        args.push(last);
    }
    args
}
