use std::collections::HashMap;

use crate::parser::{BuiltinType, ProcId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinTypeSymbol {
    pub ty: BuiltinType,
    pub scope_level: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSymbol {
    pub name: String,
    pub ty: BuiltinType,
    pub scope_level: usize,
}

impl VarSymbol {
    pub fn new(name: impl Into<String>, ty: BuiltinType) -> Self {
        VarSymbol {
            name: name.into(),
            ty,
            scope_level: 0,
        }
    }
}

/// A procedure as seen by callers. `id` points back at the definition the
/// interpreter executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureSymbol {
    pub id: ProcId,
    pub name: String,
    pub params: Vec<VarSymbol>,
    pub return_type: Option<BuiltinType>,
    pub scope_level: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    BuiltinType(BuiltinTypeSymbol),
    Var(VarSymbol),
    Procedure(ProcedureSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::BuiltinType(sym) => sym.ty.name(),
            Symbol::Var(sym) => &sym.name,
            Symbol::Procedure(sym) => &sym.name,
        }
    }

    pub fn scope_level(&self) -> usize {
        match self {
            Symbol::BuiltinType(sym) => sym.scope_level,
            Symbol::Var(sym) => sym.scope_level,
            Symbol::Procedure(sym) => sym.scope_level,
        }
    }

    fn set_scope_level(&mut self, level: usize) {
        match self {
            Symbol::BuiltinType(sym) => sym.scope_level = level,
            Symbol::Var(sym) => sym.scope_level = level,
            Symbol::Procedure(sym) => sym.scope_level = level,
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::BuiltinType(sym) => write!(f, "<BuiltinTypeSymbol(name='{}')>", sym.ty),
            Symbol::Var(sym) => write!(f, "<VarSymbol(name='{}', type='{}')>", sym.name, sym.ty),
            Symbol::Procedure(sym) => {
                write!(f, "<ProcedureSymbol(name={}, parameters=[", sym.name)?;
                for (i, param) in sym.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", param.name, param.ty)?;
                }
                write!(f, "])>")
            }
        }
    }
}

/// One symbol table. Every scope starts out holding its own copy of the
/// builtin type symbols.
#[derive(Debug)]
pub struct Scope {
    pub name: String,
    pub level: usize,
    symbols: HashMap<String, Symbol>,
}

impl Scope {
    pub fn new(name: impl Into<String>, level: usize) -> Self {
        let mut scope = Scope {
            name: name.into(),
            level,
            symbols: HashMap::new(),
        };
        for ty in BuiltinType::ALL {
            scope.define(Symbol::BuiltinType(BuiltinTypeSymbol { ty, scope_level: 0 }));
        }
        scope
    }

    /// Inserts `symbol`, stamping it with this scope's level. An existing
    /// symbol of the same name is replaced; callers check for duplicates.
    pub fn define(&mut self, mut symbol: Symbol) {
        tracing::trace!(scope = %self.name, "define {symbol}");
        symbol.set_scope_level(self.level);
        self.symbols.insert(symbol.name().to_string(), symbol);
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }
}

/// Chain of nested scopes; the last entry is the current scope and each entry
/// encloses the one after it.
#[derive(Debug, Default)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
}

impl ScopeChain {
    pub fn new() -> Self {
        ScopeChain::default()
    }

    /// Opens a scope nested one level below the current one (level 1 when the
    /// chain is empty).
    pub fn push(&mut self, name: impl Into<String>) {
        let level = self.scopes.last().map_or(1, |scope| scope.level + 1);
        let scope = Scope::new(name, level);
        tracing::debug!(scope = %scope.name, level, "enter scope");
        self.scopes.push(scope);
    }

    pub fn pop(&mut self) -> Option<Scope> {
        let scope = self.scopes.pop();
        if let Some(scope) = &scope {
            tracing::debug!(scope = %scope.name, level = scope.level, "leave scope");
        }
        scope
    }

    pub fn current(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Scope> {
        self.scopes.last_mut()
    }

    pub fn enclosing_mut(&mut self) -> Option<&mut Scope> {
        let len = self.scopes.len();
        if len < 2 {
            return None;
        }
        self.scopes.get_mut(len - 2)
    }

    pub fn level(&self) -> usize {
        self.current().map_or(0, |scope| scope.level)
    }

    /// Finds `name` in the current scope, then in each enclosing scope unless
    /// `current_scope_only` is set.
    pub fn lookup(&self, name: &str, current_scope_only: bool) -> Option<&Symbol> {
        tracing::trace!(symbol = name, current_scope_only, "lookup");
        if current_scope_only {
            return self.current().and_then(|scope| scope.get(name));
        }
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}
