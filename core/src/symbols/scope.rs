//! Brace-delimited scope tree.
//!
//! Scopes live in a flat arena and point at their parent. The tree also
//! remembers, per line, where braces moved the active scope so that any
//! `(line, column)` can be mapped back to the scope governing it.

use crate::lang::TypeName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    File,
    /// Body of a `tantrum` function; `header` indexes [`super::SymbolTable::headers`].
    Function {
        name: String,
        header: usize,
    },
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Typed(TypeName),
    Dynamic,
    Param(Option<TypeName>),
    LoopVar,
    CatchVar,
}

impl DeclKind {
    /// Everything except a bare first assignment carries an explicit binding site.
    pub fn is_explicit(self) -> bool {
        !matches!(self, DeclKind::Dynamic)
    }

    pub fn declared_type(self) -> Option<TypeName> {
        match self {
            DeclKind::Typed(t) => Some(t),
            DeclKind::Param(t) => t,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    pub line: usize,
    /// Column of the name itself.
    pub col: usize,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    /// Position of the opening `{`; `None` for the file scope.
    pub open: Option<(usize, usize)>,
    /// Position of the matching `}` once seen.
    pub close: Option<(usize, usize)>,
    pub declarations: Vec<Declaration>,
}

impl Scope {
    pub fn function_name(&self) -> Option<&str> {
        match &self.kind {
            ScopeKind::Function { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn header_index(&self) -> Option<usize> {
        match self.kind {
            ScopeKind::Function { header, .. } => Some(header),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    /// Scope active at the start of each line.
    line_entry: Vec<ScopeId>,
    /// Per line: after the brace at `col`, the active scope becomes the paired id.
    marks: Vec<Vec<(usize, ScopeId)>>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                id: ScopeId(0),
                parent: None,
                kind: ScopeKind::File,
                open: None,
                close: None,
                declarations: Vec::new(),
            }],
            line_entry: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Function bodies in order of their opening brace.
    pub fn functions(&self) -> impl Iterator<Item = &Scope> {
        self.scopes
            .iter()
            .filter(|s| matches!(s.kind, ScopeKind::Function { .. }))
    }

    /// `id` followed by each of its parents up to the file scope.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self.get(id)), |s| s.parent.map(|p| self.get(p)))
    }

    pub fn is_within(&self, id: ScopeId, ancestor: ScopeId) -> bool {
        self.ancestors(id).any(|s| s.id == ancestor)
    }

    pub fn enclosing_function(&self, id: ScopeId) -> Option<ScopeId> {
        self.ancestors(id)
            .find(|s| matches!(s.kind, ScopeKind::Function { .. }))
            .map(|s| s.id)
    }

    /// Scope governing the character at `(line, col)`.
    ///
    /// A brace belongs to the scope outside it: `{` to the enclosing scope,
    /// `}` to the scope it closes.
    pub fn scope_at(&self, line: usize, col: usize) -> ScopeId {
        let Some(entry) = self.line_entry.get(line).copied() else {
            return self.line_entry.last().copied().unwrap_or(self.root());
        };
        self.marks[line]
            .iter()
            .take_while(|(c, _)| *c < col)
            .last()
            .map(|(_, id)| *id)
            .unwrap_or(entry)
    }

    /// First declaration of `name` made directly in `id`.
    pub fn declared_in(&self, id: ScopeId, name: &str) -> Option<&Declaration> {
        self.get(id).declarations.iter().find(|d| d.name == name)
    }

    /// Nearest declaration of `name` visible from `id`.
    pub fn lookup(&self, id: ScopeId, name: &str) -> Option<&Declaration> {
        self.ancestors(id).find_map(|s| s.declarations.iter().find(|d| d.name == name))
    }

    /// Nearest declaration of `name` visible from `id` that satisfies `pred`.
    pub fn lookup_where<F>(&self, id: ScopeId, name: &str, pred: F) -> Option<&Declaration>
    where
        F: Fn(&Declaration) -> bool,
    {
        self.ancestors(id)
            .find_map(|s| s.declarations.iter().find(|d| d.name == name && pred(d)))
    }

    /// Whole-file resolution, ignoring nesting.
    pub fn is_declared_anywhere(&self, name: &str) -> bool {
        self.scopes
            .iter()
            .any(|s| s.declarations.iter().any(|d| d.name == name))
    }

    pub(crate) fn begin_line(&mut self, current: ScopeId) {
        self.line_entry.push(current);
        self.marks.push(Vec::new());
    }

    pub(crate) fn open(&mut self, parent: ScopeId, kind: ScopeKind, line: usize, col: usize) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            parent: Some(parent),
            kind,
            open: Some((line, col)),
            close: None,
            declarations: Vec::new(),
        });
        self.mark(line, col, id);
        id
    }

    /// Close `id` and return the scope that becomes active. The file scope never closes.
    pub(crate) fn close(&mut self, id: ScopeId, line: usize, col: usize) -> ScopeId {
        let Some(parent) = self.scopes[id.0].parent else {
            return id;
        };
        self.scopes[id.0].close = Some((line, col));
        self.mark(line, col, parent);
        parent
    }

    pub(crate) fn declare(&mut self, id: ScopeId, decl: Declaration) {
        self.scopes[id.0].declarations.push(decl);
    }

    fn mark(&mut self, line: usize, col: usize, id: ScopeId) {
        if let Some(marks) = self.marks.get_mut(line) {
            marks.push((col, id));
        }
    }
}
