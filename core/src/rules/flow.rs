//! Control-flow approximations driven by the scope tree.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::RuleContext;
use crate::diagnostic::{Diagnostic, RuleId};
use crate::lang::ReturnType;
use crate::source::{char_col, SourceLine};
use crate::symbols::ScopeId;

static RETURN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\breturn\b").unwrap());
static DIVIDE_BY_ZERO: Lazy<Regex> = Lazy::new(|| Regex::new(r"/=?\s*(0(?:\.0+)?)\s*(?:[;),\]]|\s|$)").unwrap());
static CONTROL_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:if|else|while|for|try|catch)\b").unwrap());

/// Char columns of `return` keywords that start a statement.
fn statement_returns(code: &str) -> Vec<usize> {
    RETURN
        .find_iter(code)
        .filter(|m| {
            let before = code[..m.start()].trim_end();
            before.is_empty() || before.ends_with(['{', '}', ';'])
        })
        .map(|m| char_col(code, m.start()))
        .collect()
}

fn indent(line: &SourceLine) -> usize {
    line.text.chars().take_while(|c| c.is_whitespace()).count()
}

pub(super) fn check_return_outside_function(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let tree = ctx.symbols.scopes();
    for line in ctx.source.lines() {
        for col in statement_returns(&line.code) {
            if tree.enclosing_function(tree.scope_at(line.index, col)).is_some() {
                continue;
            }
            out.push(Diagnostic::new(
                RuleId::ReturnOutsideFunction,
                line.index,
                col,
                col + "return".len(),
                "'return' used outside of a function.",
            ));
        }
    }
}

/// Lines after a `return` up to the `}` closing the block the return sits in.
pub(super) fn check_dead_code(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let tree = ctx.symbols.scopes();
    let lines = ctx.source.lines();
    let mut dead: BTreeSet<usize> = BTreeSet::new();

    for line in lines {
        for col in statement_returns(&line.code) {
            let scope = tree.scope_at(line.index, col);
            if tree.enclosing_function(scope).is_none() {
                continue;
            }
            let (close_line, close_col) = tree.get(scope).close.unwrap_or((lines.len(), 0));

            for after in lines.iter().skip(line.index + 1).take_while(|l| l.index <= close_line) {
                let reachable_end = if after.index == close_line { close_col } else { after.len() };
                let has_code = after
                    .code
                    .chars()
                    .take(reachable_end)
                    .any(|c| !c.is_whitespace() && c != '{' && c != '}');
                if has_code {
                    dead.insert(after.index);
                }
            }
        }
    }

    for index in dead {
        let line = &lines[index];
        out.push(Diagnostic::new(
            RuleId::DeadCode,
            index,
            indent(line),
            line.len(),
            "Unreachable code after 'return'.",
        ));
    }
}

pub(super) fn check_division_by_zero(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for line in ctx.source.lines() {
        let code = line.code.as_str();
        for caps in DIVIDE_BY_ZERO.captures_iter(code) {
            let (Some(whole), Some(zero)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push(Diagnostic::new(
                RuleId::DivisionByZero,
                line.index,
                char_col(code, whole.start()),
                char_col(code, zero.end()),
                "Division by zero.",
            ));
        }
    }
}

/// Functions with a value return type whose own body never says `return`.
pub(super) fn check_missing_return(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let tree = ctx.symbols.scopes();
    let headers = ctx.symbols.headers();

    for function in tree.functions() {
        let Some(header) = function.header_index().and_then(|i| headers.get(i)) else {
            continue;
        };
        if !matches!(header.return_type, Some(ReturnType::Value(_))) {
            continue;
        }
        let Some(open) = function.open else {
            continue;
        };
        if returns_within(ctx, function.id, open, function.close) {
            continue;
        }
        out.push(Diagnostic::new(
            RuleId::MissingReturn,
            header.line,
            header.col,
            header.col + header.name.chars().count(),
            format!("Function '{}' has return type but may not return a value.", header.name),
        ));
    }
}

fn returns_within(
    ctx: &RuleContext<'_>,
    function: ScopeId,
    open: (usize, usize),
    close: Option<(usize, usize)>,
) -> bool {
    let tree = ctx.symbols.scopes();
    let last_line = close.map_or(usize::MAX, |(line, _)| line);

    ctx.source
        .lines()
        .iter()
        .skip(open.0)
        .take_while(|l| l.index <= last_line)
        .any(|line| {
            RETURN.find_iter(&line.code).any(|m| {
                let col = char_col(&line.code, m.start());
                let scope = tree.scope_at(line.index, col);
                tree.enclosing_function(scope) == Some(function)
            })
        })
}

/// A control-structure line ending in `{` whose next line is only `}`.
pub(super) fn check_empty_blocks(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for pair in ctx.source.lines().windows(2) {
        let (line, next) = (&pair[0], &pair[1]);
        let trimmed = line.trimmed();
        if !trimmed.ends_with('{') || next.trimmed() != "}" {
            continue;
        }
        if !CONTROL_BLOCK.is_match(trimmed) {
            continue;
        }
        out.push(Diagnostic::new(
            RuleId::EmptyBlock,
            line.index,
            indent(line),
            line.len(),
            "Empty block body.",
        ));
    }
}
