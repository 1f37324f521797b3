//! Fixed vocabulary of the Tantrums language: built-in types, keywords,
//! built-in functions and the `#mode` directive values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the six built-in value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    Int,
    Float,
    String,
    Bool,
    List,
    Map,
}

impl TypeName {
    pub const ALL: [TypeName; 6] = [
        TypeName::Int,
        TypeName::Float,
        TypeName::String,
        TypeName::Bool,
        TypeName::List,
        TypeName::Map,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::String => "string",
            TypeName::Bool => "bool",
            TypeName::List => "list",
            TypeName::Map => "map",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(TypeName::Int),
            "float" => Ok(TypeName::Float),
            "string" => Ok(TypeName::String),
            "bool" => Ok(TypeName::Bool),
            "list" => Ok(TypeName::List),
            "map" => Ok(TypeName::Map),
            _ => Err(()),
        }
    }
}

/// Declared return type of a `tantrum` function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    Void,
    Value(TypeName),
}

impl ReturnType {
    pub fn parse(s: &str) -> Option<Self> {
        if s == "void" {
            return Some(ReturnType::Void);
        }
        s.parse().ok().map(ReturnType::Value)
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => f.write_str("void"),
            ReturnType::Value(t) => t.fmt(f),
        }
    }
}

/// Reserved words, including the type names.
pub const KEYWORDS: &[&str] = &[
    "tantrum", "if", "else", "while", "for", "in", "return", "throw", "alloc", "free", "use", "and", "or", "true",
    "false", "null", "try", "catch", "void", "int", "float", "string", "bool", "list", "map",
];

/// A predefined function. Arity and signature are informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub name: &'static str,
    pub signature: &'static str,
    pub arity: usize,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "print",
        signature: "print(value)",
        arity: 1,
    },
    Builtin {
        name: "input",
        signature: "input(prompt?)",
        arity: 1,
    },
    Builtin {
        name: "len",
        signature: "len(value) -> int",
        arity: 1,
    },
    Builtin {
        name: "range",
        signature: "range(n) -> list",
        arity: 1,
    },
    Builtin {
        name: "type",
        signature: "type(value) -> string",
        arity: 1,
    },
    Builtin {
        name: "append",
        signature: "append(list, value)",
        arity: 2,
    },
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub fn is_builtin(word: &str) -> bool {
    BUILTINS.iter().any(|b| b.name == word)
}

pub fn builtin(word: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == word)
}

/// Typing discipline selected by the `#mode` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageMode {
    /// Every variable must carry a type annotation.
    Static,
    /// No type checking at all.
    Dynamic,
    /// Typed variables are checked, untyped ones are dynamic.
    #[default]
    Both,
}

impl FromStr for LanguageMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(LanguageMode::Static),
            "dynamic" => Ok(LanguageMode::Dynamic),
            "both" => Ok(LanguageMode::Both),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageMode::Static => write!(f, "static"),
            LanguageMode::Dynamic => write!(f, "dynamic"),
            LanguageMode::Both => write!(f, "both"),
        }
    }
}
