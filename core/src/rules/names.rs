//! Name-level checks: duplicates, unresolved names, unused and shadowing bindings.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{find_calls, header_span, RuleContext};
use crate::config::UnusedPolicy;
use crate::diagnostic::{Diagnostic, RuleId};
use crate::lang::{self, BUILTINS, KEYWORDS};
use crate::source::char_col;
use crate::symbols::{DeclKind, DYNAMIC_DECL, TYPED_DECL};

/// The undefined-variable rule skips any line whose checked text holds a
/// string literal. Accepted approximation: it hides real misses on such lines.
pub const SKIP_LINES_WITH_STRING_LITERALS: bool = true;

static ASSIGNED_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"=\s*(.+?);\s*$").unwrap());
static LEADING_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\w+\s*\(").unwrap());
static FIRST_ARGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").unwrap());
static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z_]\w*\b").unwrap());
static SKIPPED_STATEMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:#|tantrum\s|use\s)").unwrap());

pub(super) fn check_duplicate_functions(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for sig in ctx.symbols.functions() {
        for &(line, col) in &sig.redeclarations {
            out.push(Diagnostic::new(
                RuleId::DuplicateFunction,
                line,
                col,
                col + sig.name.chars().count(),
                format!(
                    "Duplicate function '{}': already defined on line {}.",
                    sig.name,
                    sig.declaration_line + 1
                ),
            ));
        }
    }
}

/// Typed declarations that repeat a name already typed-declared in the same block.
pub(super) fn check_duplicate_variables(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for scope in ctx.symbols.scopes().iter() {
        let mut first: FxHashMap<&str, usize> = FxHashMap::default();
        for decl in &scope.declarations {
            if !matches!(decl.kind, DeclKind::Typed(_)) {
                continue;
            }
            match first.get(decl.name.as_str()) {
                Some(&line) => out.push(Diagnostic::new(
                    RuleId::DuplicateVariable,
                    decl.line,
                    decl.col,
                    decl.col + decl.name.chars().count(),
                    format!(
                        "Variable '{}' already declared in this scope (line {}).",
                        decl.name,
                        line + 1
                    ),
                )),
                None => {
                    first.insert(decl.name.as_str(), decl.line);
                }
            }
        }
    }
}

pub(super) fn check_undefined_functions(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for line in ctx.source.lines() {
        let header = header_span(&line.code);

        for call in find_calls(&line.code) {
            if header.as_ref().is_some_and(|h| h.contains(&call.col)) {
                continue;
            }
            if lang::is_builtin(call.name) || lang::is_keyword(call.name) {
                continue;
            }
            if ctx.symbols.function(call.name).is_some() {
                continue;
            }
            out.push(Diagnostic::new(
                RuleId::UndefinedFunction,
                line.index,
                call.col,
                call.col + call.name.chars().count(),
                format!(
                    "'{}' is not defined. Did you forget to declare it with 'tantrum'?",
                    call.name
                ),
            ));
        }
    }
}

/// Identifiers read on the right of `=` or inside a statement-level call that
/// nothing in the file ever binds.
pub(super) fn check_undefined_variables(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let known = known_names(ctx);
    let tree = ctx.symbols.scopes();

    for line in ctx.source.lines() {
        if line.is_blank_or_braces() || SKIPPED_STATEMENT.is_match(line.trimmed()) {
            continue;
        }
        if SKIP_LINES_WITH_STRING_LITERALS && line.code.contains('"') {
            continue;
        }
        let code = line.code.as_str();
        let checked = ASSIGNED_VALUE.captures(code).and_then(|c| c.get(1)).or_else(|| {
            LEADING_CALL
                .is_match(code)
                .then(|| FIRST_ARGS.captures(code).and_then(|c| c.get(1)))
                .flatten()
        });
        let Some(checked) = checked else {
            continue;
        };

        let text = checked.as_str();
        for ident in IDENT.find_iter(text) {
            let name = ident.as_str();
            if known.contains(name) || tree.is_declared_anywhere(name) {
                continue;
            }
            let rest = text[ident.end()..].trim_start();
            let before = text[..ident.start()].trim_end();
            // calls belong to the undefined-function rule; members are not variables
            if rest.starts_with('(') || before.ends_with('.') {
                continue;
            }
            let col = char_col(code, checked.start() + ident.start());
            out.push(Diagnostic::new(
                RuleId::UndefinedVariable,
                line.index,
                col,
                col + name.chars().count(),
                format!("'{}' may be undefined.", name),
            ));
        }
    }
}

fn known_names<'a>(ctx: &'a RuleContext<'_>) -> FxHashSet<&'a str> {
    let mut known: FxHashSet<&str> = FxHashSet::default();
    known.extend(BUILTINS.iter().map(|b| b.name));
    known.extend(KEYWORDS.iter().copied());
    known.insert("main");
    known.extend(ctx.symbols.functions().iter().map(|f| f.name.as_str()));
    known.extend(ctx.symbols.variables().iter().map(|v| v.name.as_str()));
    known
}

pub(super) fn check_unused_variables(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let text = ctx.source.text();

    for var in ctx.symbols.variables() {
        if ctx.config.unused_variables == UnusedPolicy::TypedOnly && !var.statically_typed {
            continue;
        }
        let Ok(word) = Regex::new(&format!(r"\b{}\b", regex::escape(&var.name))) else {
            continue;
        };
        if word.find_iter(text).take(2).count() > 1 {
            continue;
        }
        let label = match var.declared_type {
            Some(ty) => format!("{} {}", ty, var.name),
            None => var.name.clone(),
        };
        out.push(Diagnostic::new(
            RuleId::UnusedVariable,
            var.line,
            var.col,
            var.col + var.name.chars().count(),
            format!("Variable '{}' is declared but never used.", label),
        ));
    }
}

/// Typed declarations and bare assignments named after a built-in function.
pub(super) fn check_shadowed_builtins(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    for line in ctx.source.lines() {
        let code = line.code.as_str();
        let name = TYPED_DECL
            .captures(code)
            .and_then(|c| c.get(2))
            .or_else(|| DYNAMIC_DECL.captures(code).and_then(|c| c.get(1)));
        let Some(name) = name else {
            continue;
        };
        if !lang::is_builtin(name.as_str()) {
            continue;
        }
        let col = char_col(code, name.start());
        out.push(Diagnostic::new(
            RuleId::ShadowedBuiltin,
            line.index,
            col,
            col + name.as_str().chars().count(),
            format!("'{}' shadows a built-in function.", name.as_str()),
        ));
    }
}
