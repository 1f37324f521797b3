//! Symbol collection: function signatures, variable bindings and the scope tree.
//!
//! One pass over the stripped lines builds every table the rules read. The
//! tables are immutable afterwards.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::lang::{self, ReturnType, TypeName};
use crate::source::{char_col, SourceFile};

pub mod scope;


pub use scope::{DeclKind, Declaration, Scope, ScopeId, ScopeKind, ScopeTree};

pub(crate) static FUNCTION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\btantrum\s+(?:(void|int|float|string|bool|list|map)\s+)?(\w+)\s*\(([^)]*)\)").unwrap()
});
/// `tantrum` keyword starting a header, whether or not its parameter list closes on the line.
pub(crate) static HEADER_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btantrum\s+").unwrap());
static OPEN_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btantrum\s+(?:\w+\s+)?\w+\s*\([^);{}]*$").unwrap());
pub(crate) static TYPED_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(int|float|string|bool|list|map)\s+(\w+)\s*=(?:[^=]|$)").unwrap());
pub(crate) static DYNAMIC_DECL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([A-Za-z_]\w*)\s*=\s*[^=]").unwrap());
pub(crate) static RESERVED_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:if|while|for|tantrum|else|return|throw|use|try|catch|print|input|len|append|range|type|free|alloc)\b",
    )
    .unwrap()
});
pub(crate) static FOR_BINDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bfor\s+(\w+)\s+in\b").unwrap());
pub(crate) static CATCH_BINDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcatch\s*\(\s*(\w+)\s*\)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub declared_type: Option<TypeName>,
    pub name: String,
}

/// One `tantrum` header as written, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHeader {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<ReturnType>,
    pub line: usize,
    /// Column of the function name.
    pub col: usize,
}

/// First declaration of a function name; later ones only bump the redeclaration list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<ReturnType>,
    pub declaration_line: usize,
    pub name_col: usize,
    /// `(line, col)` of every later header with the same name.
    pub redeclarations: Vec<(usize, usize)>,
}

impl FunctionSignature {
    pub fn occurrence_count(&self) -> usize {
        1 + self.redeclarations.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableBinding {
    pub name: String,
    pub declared_type: Option<TypeName>,
    pub line: usize,
    pub col: usize,
    pub statically_typed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    headers: Vec<FunctionHeader>,
    functions: Vec<FunctionSignature>,
    function_index: FxHashMap<String, usize>,
    variables: Vec<VariableBinding>,
    variable_index: FxHashMap<String, usize>,
    scopes: ScopeTree,
    /// Header whose parameter list is still open: start line and the text so far.
    open_header: Option<(usize, String)>,
}

enum Event {
    Open,
    Close,
    Terminator,
    Header(usize),
    Pending(Declaration),
    Declare(Declaration),
}

impl SymbolTable {
    pub fn collect(source: &SourceFile) -> Self {
        let mut table = SymbolTable::default();
        let mut current = table.scopes.root();
        let mut pending_function: Option<usize> = None;
        let mut pending_decls: Vec<Declaration> = Vec::new();

        for line in source.lines() {
            let events = table.line_events(line.index, &line.code);
            table.scopes.begin_line(current);

            for (col, event) in events {
                match event {
                    Event::Open => {
                        let kind = match pending_function.take() {
                            Some(header) => ScopeKind::Function {
                                name: table.headers[header].name.clone(),
                                header,
                            },
                            None => ScopeKind::Block,
                        };
                        let id = table.scopes.open(current, kind, line.index, col);
                        for decl in pending_decls.drain(..) {
                            table.scopes.declare(id, decl);
                        }
                        current = id;
                    }
                    Event::Close => {
                        current = table.scopes.close(current, line.index, col);
                    }
                    Event::Terminator => {
                        pending_function = None;
                        pending_decls.clear();
                    }
                    Event::Header(idx) => {
                        pending_function = Some(idx);
                        pending_decls.clear();
                    }
                    Event::Pending(decl) => pending_decls.push(decl),
                    Event::Declare(decl) => {
                        // a bare assignment only introduces a name the first time it is seen
                        if decl.kind == DeclKind::Dynamic && table.scopes.lookup(current, &decl.name).is_some() {
                            continue;
                        }
                        table.scopes.declare(current, decl);
                    }
                }
            }
        }

        trace!(
            functions = table.functions.len(),
            variables = table.variables.len(),
            scopes = table.scopes.len(),
            "collected symbols"
        );
        table
    }

    /// Record headers and bindings found on one line and return its scope events sorted by column.
    fn line_events(&mut self, line: usize, code: &str) -> Vec<(usize, Event)> {
        let mut events: Vec<(usize, Event)> = Vec::new();

        for (col, c) in code.chars().enumerate() {
            match c {
                '{' => events.push((col, Event::Open)),
                '}' => events.push((col, Event::Close)),
                ';' => events.push((col, Event::Terminator)),
                _ => {}
            }
        }

        if let Some((start_line, mut text)) = self.open_header.take() {
            text.push('\n');
            text.push_str(code);
            if FUNCTION_HEADER.is_match(&text) {
                self.header_events(&text, start_line, Some(0), &mut events);
            } else if !code.contains([';', '{', '}']) {
                self.open_header = Some((start_line, text));
            }
        } else if FUNCTION_HEADER.is_match(code) {
            self.header_events(code, line, None, &mut events);
        } else if OPEN_HEADER.is_match(code) {
            self.open_header = Some((line, code.to_string()));
        }

        for (re, kind) in [(&*FOR_BINDING, DeclKind::LoopVar), (&*CATCH_BINDING, DeclKind::CatchVar)] {
            if let Some(m) = re.captures(code).and_then(|c| c.get(1)) {
                let col = char_col(code, m.start());
                events.push((
                    col,
                    Event::Pending(Declaration {
                        name: m.as_str().to_string(),
                        kind,
                        line,
                        col,
                    }),
                ));
            }
        }

        if let Some(caps) = TYPED_DECL.captures(code) {
            if let (Some(ty), Some(name)) = (caps.get(1).and_then(|m| m.as_str().parse().ok()), caps.get(2)) {
                let col = char_col(code, name.start());
                self.record_variable(name.as_str(), Some(ty), line, col);
                events.push((
                    col,
                    Event::Declare(Declaration {
                        name: name.as_str().to_string(),
                        kind: DeclKind::Typed(ty),
                        line,
                        col,
                    }),
                ));
            }
        } else if !RESERVED_PREFIX.is_match(code) {
            if let Some(name) = DYNAMIC_DECL.captures(code).and_then(|c| c.get(1)) {
                if !lang::is_keyword(name.as_str()) {
                    let col = char_col(code, name.start());
                    self.record_variable(name.as_str(), None, line, col);
                    events.push((
                        col,
                        Event::Declare(Declaration {
                            name: name.as_str().to_string(),
                            kind: DeclKind::Dynamic,
                            line,
                            col,
                        }),
                    ));
                }
            }
        }

        events.sort_by_key(|(col, _)| *col);
        events
    }

    /// Record the header found in `text` (which starts on `line`) and queue its scope events.
    /// `event_col` places the events on the current line when the header began on an earlier one.
    fn header_events(&mut self, text: &str, line: usize, event_col: Option<usize>, events: &mut Vec<(usize, Event)>) {
        let Some(caps) = FUNCTION_HEADER.captures(text) else {
            return;
        };
        let first_line_len = text.find('\n').unwrap_or(text.len());
        let whole = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let (name, name_start) = caps
            .get(2)
            .map(|m| (m.as_str().to_string(), m.start()))
            .unwrap_or_default();
        let return_type = caps.get(1).and_then(|m| ReturnType::parse(m.as_str()));
        let (params_src, params_at) = caps.get(3).map(|m| (m.as_str(), m.start())).unwrap_or(("", 0));
        let params = parse_params(params_src);

        let header_col = char_col(text, whole);
        let header = FunctionHeader {
            name,
            params: params.clone(),
            return_type,
            line,
            col: char_col(text, name_start),
        };
        let idx = self.headers.len();
        self.record_signature(&header);
        self.headers.push(header);

        let at = event_col.unwrap_or(header_col);
        events.push((at, Event::Header(idx)));
        for p in params {
            // parameters past the first line of a split header point at the header
            let col = find_word(params_src, &p.name)
                .map(|off| params_at + off)
                .filter(|&off| event_col.is_none() || off < first_line_len)
                .map(|off| char_col(text, off))
                .unwrap_or(header_col);
            events.push((
                at,
                Event::Pending(Declaration {
                    name: p.name,
                    kind: DeclKind::Param(p.declared_type),
                    line,
                    col,
                }),
            ));
        }
    }

    fn record_signature(&mut self, header: &FunctionHeader) {
        if let Some(&idx) = self.function_index.get(&header.name) {
            self.functions[idx].redeclarations.push((header.line, header.col));
            return;
        }
        self.function_index.insert(header.name.clone(), self.functions.len());
        self.functions.push(FunctionSignature {
            name: header.name.clone(),
            params: header.params.clone(),
            return_type: header.return_type,
            declaration_line: header.line,
            name_col: header.col,
            redeclarations: Vec::new(),
        });
    }

    fn record_variable(&mut self, name: &str, declared_type: Option<TypeName>, line: usize, col: usize) {
        if self.variable_index.contains_key(name) {
            return;
        }
        self.variable_index.insert(name.to_string(), self.variables.len());
        self.variables.push(VariableBinding {
            name: name.to_string(),
            declared_type,
            line,
            col,
            statically_typed: declared_type.is_some(),
        });
    }

    pub fn headers(&self) -> &[FunctionHeader] {
        &self.headers
    }

    /// Signatures in order of first declaration.
    pub fn functions(&self) -> &[FunctionSignature] {
        &self.functions
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSignature> {
        self.function_index.get(name).map(|&i| &self.functions[i])
    }

    /// Bindings in order of first appearance.
    pub fn variables(&self) -> &[VariableBinding] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&VariableBinding> {
        self.variable_index.get(name).map(|&i| &self.variables[i])
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }
}

/// Split a parameter list; a leading built-in type name makes a parameter typed.
pub fn parse_params(src: &str) -> Vec<Param> {
    src.split(',')
        .filter_map(|part| {
            let words: Vec<&str> = part.split_whitespace().collect();
            let name = *words.last()?;
            let declared_type = if words.len() >= 2 { words[0].parse().ok() } else { None };
            Some(Param {
                declared_type,
                name: name.to_string(),
            })
        })
        .collect()
}

/// Byte offset of `word` in `hay` as a whole word.
pub(crate) fn find_word(hay: &str, word: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    hay.match_indices(word).map(|(i, _)| i).find(|&i| {
        let before = hay[..i].chars().next_back().is_none_or(|c| !is_ident(c));
        let after = hay[i + word.len()..].chars().next().is_none_or(|c| !is_ident(c));
        before && after
    })
}
