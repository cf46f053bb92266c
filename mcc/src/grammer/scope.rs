use super::ast::Type;
use crate::error::{Error, Result};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable,
    /// Declared with `global`; visible inside functions
    Global,
    Array,
    /// Formal parameter types
    Function(Vec<Type>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Value type, or the return type of a function
    pub ty: Type,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, ty: Type) -> Self {
        Symbol {
            name: name.into(),
            kind,
            ty,
        }
    }

    fn visible_in_functions(&self) -> bool {
        matches!(self.kind, SymbolKind::Global | SymbolKind::Function(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scope(IndexMap<String, Symbol>);

impl Scope {
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.0.get(name)
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.0.values().cloned().collect()
    }
}

/// Scope chain: the global scope plus the scope of the function being parsed.
#[derive(Debug, Default)]
pub struct Resolver {
    global: Scope,
    local: Option<Scope>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_function(&self) -> bool {
        self.local.is_some()
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        match &self.local {
            Some(local) => local
                .get(name)
                .or_else(|| self.global.get(name).filter(|s| s.visible_in_functions())),
            None => self.global.get(name),
        }
    }

    pub fn resolve(&self, line: usize, name: &str) -> Result<&Symbol> {
        self.lookup(name)
            .ok_or_else(|| Error::Scope(line, format!("{} has not been declared", name)))
    }

    /// Register a name in the innermost scope.
    /// Anything already reachable under that name is a duplicate.
    pub fn declare(&mut self, line: usize, symbol: Symbol) -> Result<()> {
        if self.lookup(&symbol.name).is_some() {
            return Err(Error::Scope(
                line,
                format!("{} has already been declared", symbol.name),
            ));
        }
        let scope = self.local.as_mut().unwrap_or(&mut self.global);
        scope.0.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    pub fn open_function(&mut self) {
        self.local = Some(Scope::default());
    }

    /// Leave the function scope, returning what was declared in it.
    pub fn close_function(&mut self) -> Scope {
        self.local.take().unwrap_or_default()
    }

    pub fn global(&self) -> &Scope {
        &self.global
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_scope_sees_globals_only() {
        let mut r = Resolver::new();
        r.declare(1, Symbol::new("g", SymbolKind::Global, Type::Int)).unwrap();
        r.declare(2, Symbol::new("x", SymbolKind::Variable, Type::Int)).unwrap();
        r.open_function();
        assert!(r.lookup("g").is_some());
        assert!(r.lookup("x").is_none());
        r.declare(3, Symbol::new("x", SymbolKind::Variable, Type::Float)).unwrap();
        assert!(r.declare(4, Symbol::new("g", SymbolKind::Variable, Type::Int)).is_err());
        let scope = r.close_function();
        assert_eq!(scope.get("x").map(|s| &s.ty), Some(&Type::Float));
        assert_eq!(r.lookup("x").map(|s| &s.ty), Some(&Type::Int));
    }
}
