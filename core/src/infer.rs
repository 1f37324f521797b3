//! Surface-syntax classification of literal expressions.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::lang::TypeName;

static FLOAT_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+$").unwrap());
static INT_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").unwrap());

/// Type of a literal as it appears in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralType {
    Int,
    Float,
    String,
    Bool,
    List,
    Map,
    Null,
}

impl LiteralType {
    pub fn as_str(self) -> &'static str {
        match self {
            LiteralType::Int => "int",
            LiteralType::Float => "float",
            LiteralType::String => "string",
            LiteralType::Bool => "bool",
            LiteralType::List => "list",
            LiteralType::Map => "map",
            LiteralType::Null => "null",
        }
    }
}

impl fmt::Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `expr` from its surface syntax alone.
///
/// Returns `None` for anything that is not obviously a literal; callers must
/// skip rather than guess in that case.
pub fn infer_literal(expr: &str) -> Option<LiteralType> {
    let e = expr.trim();
    if e.starts_with('"') {
        return Some(LiteralType::String);
    }
    match e {
        "true" | "false" => return Some(LiteralType::Bool),
        "null" => return Some(LiteralType::Null),
        _ => {}
    }
    if FLOAT_LITERAL.is_match(e) {
        return Some(LiteralType::Float);
    }
    if INT_LITERAL.is_match(e) {
        return Some(LiteralType::Int);
    }
    if e.starts_with('[') {
        return Some(LiteralType::List);
    }
    if e.starts_with('{') {
        return Some(LiteralType::Map);
    }
    None
}

/// Exact match, or an int literal widened into a float slot.
pub fn is_compatible(declared: TypeName, actual: LiteralType) -> bool {
    matches!(
        (declared, actual),
        (TypeName::Int, LiteralType::Int)
            | (TypeName::Float, LiteralType::Float | LiteralType::Int)
            | (TypeName::String, LiteralType::String)
            | (TypeName::Bool, LiteralType::Bool)
            | (TypeName::List, LiteralType::List)
            | (TypeName::Map, LiteralType::Map)
    )
}
