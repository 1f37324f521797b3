//! Literal type compatibility at call sites and assignments, plus the
//! annotations `#mode static;` insists on.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{find_calls, header_span, split_args, RuleContext};
use crate::diagnostic::{Diagnostic, RuleId};
use crate::infer::{infer_literal, is_compatible};
use crate::lang::{self, LanguageMode};
use crate::source::char_col;
use crate::symbols::{DYNAMIC_DECL, RESERVED_PREFIX};

static TYPED_INIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(int|float|string|bool|list|map)\s+(\w+)\s*=\s*([^=;][^;]*)").unwrap());
static REASSIGNMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\w+)\s*=\s*([^=;]+);?\s*$").unwrap());

/// Arity of calls to user functions, and literal argument types unless the file is dynamic.
pub(super) fn check_calls(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    let check_types = ctx.mode != LanguageMode::Dynamic;

    for line in ctx.source.lines() {
        let header = header_span(&line.code);

        for call in find_calls(&line.code) {
            if header.as_ref().is_some_and(|h| h.contains(&call.col)) {
                continue;
            }
            if lang::is_builtin(call.name) || lang::is_keyword(call.name) {
                continue;
            }
            let Some(sig) = ctx.symbols.function(call.name) else {
                continue;
            };
            let Some(args_src) = call.args else {
                continue;
            };
            let args = split_args(args_src);

            if args.len() != sig.params.len() {
                out.push(Diagnostic::new(
                    RuleId::CallMismatch,
                    line.index,
                    call.col,
                    call.end,
                    format!(
                        "'{}' expects {} arg(s) but got {}.",
                        call.name,
                        sig.params.len(),
                        args.len()
                    ),
                ));
                continue;
            }
            if !check_types {
                continue;
            }

            for (i, (arg, param)) in args.iter().zip(&sig.params).enumerate() {
                let Some(expected) = param.declared_type else {
                    continue;
                };
                let Some(actual) = infer_literal(arg) else {
                    continue;
                };
                if !is_compatible(expected, actual) {
                    out.push(Diagnostic::new(
                        RuleId::CallMismatch,
                        line.index,
                        call.col,
                        call.end,
                        format!(
                            "'{}' param {} ('{}') expects '{}' but got '{}'.",
                            call.name,
                            i + 1,
                            param.name,
                            expected,
                            actual
                        ),
                    ));
                }
            }
        }
    }
}

/// Typed initializers and reassignments of typed bindings.
pub(super) fn check_assignments(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    if ctx.mode == LanguageMode::Dynamic {
        return;
    }
    let tree = ctx.symbols.scopes();

    for line in ctx.source.lines() {
        let code = line.code.as_str();

        if let Some(caps) = TYPED_INIT.captures(code) {
            let (Some(ty), Some(name), Some(value)) = (caps.get(1), caps.get(2), caps.get(3)) else {
                continue;
            };
            let Ok(declared) = ty.as_str().parse() else {
                continue;
            };
            if let Some(actual) = infer_literal(value.as_str()) {
                if !is_compatible(declared, actual) {
                    out.push(Diagnostic::new(
                        RuleId::AssignmentType,
                        line.index,
                        char_col(code, value.start()),
                        char_col(code, value.start() + value.as_str().trim_end().len()),
                        format!(
                            "Cannot assign '{}' to '{}' variable '{}'.",
                            actual,
                            declared,
                            name.as_str()
                        ),
                    ));
                }
            }
            continue;
        }

        let Some(caps) = REASSIGNMENT.captures(code) else {
            continue;
        };
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if lang::is_keyword(name.as_str()) {
            continue;
        }
        let col = char_col(code, name.start());
        let scope = tree.scope_at(line.index, col);
        let Some(declared) = tree
            .lookup_where(scope, name.as_str(), |d| {
                d.kind.declared_type().is_some() && (d.line, d.col) < (line.index, col)
            })
            .and_then(|d| d.kind.declared_type())
        else {
            continue;
        };
        let Some(actual) = infer_literal(value.as_str()) else {
            continue;
        };
        if !is_compatible(declared, actual) {
            out.push(Diagnostic::new(
                RuleId::AssignmentType,
                line.index,
                char_col(code, value.start()),
                char_col(code, value.start() + value.as_str().trim_end().len()),
                format!(
                    "Cannot assign '{}' to '{}' variable '{}'.",
                    actual,
                    declared,
                    name.as_str()
                ),
            ));
        }
    }
}

/// Under `#mode static;` every assigned name needs an explicit binding in scope.
pub(super) fn check_static_untyped_assignments(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    if ctx.mode != LanguageMode::Static {
        return;
    }
    let tree = ctx.symbols.scopes();

    for line in ctx.source.lines() {
        let code = line.code.as_str();
        if RESERVED_PREFIX.is_match(code) {
            continue;
        }
        let Some(name) = DYNAMIC_DECL.captures(code).and_then(|c| c.get(1)) else {
            continue;
        };
        if lang::is_keyword(name.as_str()) {
            continue;
        }
        let col = char_col(code, name.start());
        let scope = tree.scope_at(line.index, col);
        if tree
            .lookup_where(scope, name.as_str(), |d| d.kind.is_explicit())
            .is_some()
        {
            continue;
        }
        out.push(Diagnostic::new(
            RuleId::StaticUntypedAssignment,
            line.index,
            col,
            col + name.as_str().chars().count(),
            format!(
                "Static mode: variable '{}' must be declared with a type (e.g., int {} = ...).",
                name.as_str(),
                name.as_str()
            ),
        ));
    }
}

pub(super) fn check_static_return_types(ctx: &RuleContext<'_>, out: &mut Vec<Diagnostic>) {
    if ctx.mode != LanguageMode::Static {
        return;
    }
    for header in ctx.symbols.headers() {
        if header.return_type.is_some() || header.name == "main" {
            continue;
        }
        out.push(Diagnostic::new(
            RuleId::StaticMissingReturnType,
            header.line,
            header.col,
            header.col + header.name.chars().count(),
            format!("Function '{}' in static mode must declare a return type.", header.name),
        ));
    }
}
