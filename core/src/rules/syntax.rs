//! Lexical and statement-shape checks.

use once_cell::sync::Lazy;
use regex::Regex;

use super::RuleContext;
use crate::diagnostic::{Diagnostic, RuleId, Severity};
use crate::lex::Region;
use crate::source::{char_col, MODE_DIRECTIVE};

const VALID_ESCAPES: [char; 6] = ['n', 't', '\\', '"', 'r', '0'];

static EXEMPT_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\}?\s*else\b|(?:if|while|for)\b|tantrum\s|try\b|catch\b|#|\})").unwrap());
static NEEDS_TERMINATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:return|throw|print|append|use|free)\b",
        r"|^\w+\s*=",
        r"|^(?:int|float|string|bool|list|map)\s+\w+",
        r"|^\w+\s*\(",
        r"|\+\+|--",
        r"|(?:\+|-|\*|/|%)=",
    ))
    .unwrap()
});
static EMPTY_CONDITION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(if|while)\s*\(\s*\)").unwrap());

pub(super) fn check_mode_directive(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for line in ctx.source.lines() {
        if !line.code.trim_start().starts_with('#') {
            continue;
        }
        let directive = line.text.trim();
        if !MODE_DIRECTIVE.is_match(directive) {
            out.push(Diagnostic::new(
                RuleId::ModeDirective,
                line.index,
                0,
                line.len(),
                "Invalid directive. Valid: #mode static; / #mode dynamic; / #mode both;",
            ));
        } else if !directive.contains(';') {
            out.push(
                Diagnostic::new(
                    RuleId::ModeDirective,
                    line.index,
                    0,
                    line.len(),
                    "Missing semicolon after #mode directive.",
                )
                .with_severity(Severity::Warning),
            );
        }
    }
}

/// One stack for the whole document; strings and comments are already blanked.
pub(super) fn check_brackets(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let mut stack: Vec<(char, usize, usize)> = Vec::new();

    for line in ctx.source.lines() {
        for (col, c) in line.code.chars().enumerate() {
            match c {
                '(' | '[' | '{' => stack.push((c, line.index, col)),
                ')' | ']' | '}' => {
                    let expected = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match stack.pop() {
                        None => out.push(Diagnostic::new(
                            RuleId::BracketMismatch,
                            line.index,
                            col,
                            col + 1,
                            format!("Unexpected '{}': no matching opener.", c),
                        )),
                        Some((open, open_line, _)) if open != expected => out.push(Diagnostic::new(
                            RuleId::BracketMismatch,
                            line.index,
                            col,
                            col + 1,
                            format!(
                                "Mismatched '{}': expected closing for '{}' from line {}.",
                                c,
                                open,
                                open_line + 1
                            ),
                        )),
                        Some(_) => {}
                    }
                }
                _ => {}
            }
        }
    }

    for (open, line, col) in stack {
        out.push(Diagnostic::new(
            RuleId::BracketMismatch,
            line,
            col,
            col + 1,
            format!("Unclosed '{}'.", open),
        ));
    }
}

pub(super) fn check_unterminated_strings(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for line in ctx.source.lines() {
        if let Some(col) = line.scan.unterminated_string {
            out.push(Diagnostic::new(
                RuleId::UnterminatedString,
                line.index,
                col,
                line.len(),
                "Unterminated string literal.",
            ));
        }
    }
}

pub(super) fn check_escapes(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for line in ctx.source.lines() {
        let chars: Vec<char> = line.text.chars().collect();
        let mut col = 0;
        while col < chars.len() {
            if chars[col] != '\\' || line.scan.region(col) != Some(Region::String) {
                col += 1;
                continue;
            }
            if let Some(&next) = chars.get(col + 1) {
                if !VALID_ESCAPES.contains(&next) {
                    out.push(Diagnostic::new(
                        RuleId::InvalidEscape,
                        line.index,
                        col,
                        col + 2,
                        format!("Invalid escape sequence '\\{}'. Valid: \\n \\t \\\\ \\\" \\r \\0", next),
                    ));
                }
            }
            col += 2;
        }
    }
}

pub(super) fn check_semicolons(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for line in ctx.source.lines() {
        if line.is_blank_or_braces() {
            continue;
        }
        let trimmed = line.trimmed();
        if EXEMPT_HEADER.is_match(trimmed) || !NEEDS_TERMINATOR.is_match(trimmed) {
            continue;
        }
        if trimmed.ends_with([';', '{', '}']) {
            continue;
        }
        // statement continues on the next line
        if open_parens(trimmed) > 0 {
            continue;
        }
        let end = char_col(&line.code, line.code.trim_end().len());
        out.push(Diagnostic::new(
            RuleId::MissingSemicolon,
            line.index,
            end,
            end,
            "Missing ';' at end of statement.",
        ));
    }
}

fn open_parens(code: &str) -> i32 {
    code.chars().fold(0, |depth, c| match c {
        '(' | '[' => depth + 1,
        ')' | ']' => depth - 1,
        _ => depth,
    })
}

pub(super) fn check_empty_conditions(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for line in ctx.source.lines() {
        for caps in EMPTY_CONDITION.captures_iter(&line.code) {
            let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push(Diagnostic::new(
                RuleId::EmptyCondition,
                line.index,
                char_col(&line.code, whole.start()),
                char_col(&line.code, whole.end()),
                format!("Empty condition in '{}' statement.", keyword.as_str()),
            ));
        }
    }
}
