use crate::error::{Error, Result};
use crate::grammer::ast::{Expr, Function, Stmt};
use indexmap::{IndexMap, IndexSet};
use std::rc::Rc;

/// Known values of the names owned by one scope.
#[derive(Debug, Clone, Default)]
struct Frame {
    /// Names declared by the inlined function; `None` for the global frame
    owns: Option<IndexSet<String>>,
    values: IndexMap<String, Expr>,
}

/// State threaded through one optimization run.
#[derive(Debug, Default)]
pub struct Environment {
    funcs: IndexMap<String, Rc<Function>>,
    /// Global frame followed by one frame per call being inlined
    frames: Vec<Frame>,
    /// Source line of the statement being folded
    pub line: usize,
    /// Side effects of inlined calls, waiting to be placed before the
    /// statement that triggered them
    pending: Vec<Stmt>,
}

/// Saved value tables, restored after folding a branch that may not run.
pub struct Snapshot(Vec<IndexMap<String, Expr>>);

impl Environment {
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame::default()],
            ..Default::default()
        }
    }

    pub fn error(&self, msg: impl Into<String>) -> Error {
        Error::Fold(self.line, msg.into())
    }

    pub fn define(&mut self, func: Function) {
        self.funcs.insert(func.name.clone(), Rc::new(func));
    }

    pub fn function(&self, name: &str) -> Result<Rc<Function>> {
        self.funcs
            .get(name)
            .cloned()
            .ok_or_else(|| self.error(format!("unresolvable function {}", name)))
    }

    /// Frame a name lives in: the innermost call if it declares the name,
    /// otherwise the global frame.
    fn frame_of(&self, name: &str) -> usize {
        match self.frames.last() {
            Some(Frame { owns: Some(owns), .. }) if owns.contains(name) => self.frames.len() - 1,
            _ => 0,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Expr> {
        self.frames[self.frame_of(name)].values.get(name)
    }

    pub fn bind(&mut self, name: &str, value: Expr) {
        let idx = self.frame_of(name);
        self.frames[idx].values.insert(name.to_string(), value);
    }

    pub fn forget(&mut self, name: &str) {
        let idx = self.frame_of(name);
        self.frames[idx].values.shift_remove(name);
    }

    /// Whether an assignment to `name` is local to the call being inlined,
    /// and so invisible once the call is folded away.
    pub fn is_call_local(&self, name: &str) -> bool {
        self.frame_of(name) != 0
    }

    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn push_call(&mut self, func: &Function) {
        let owns = func.symbols.iter().map(|s| s.name.clone()).collect();
        self.frames.push(Frame {
            owns: Some(owns),
            values: IndexMap::new(),
        });
    }

    pub fn pop_call(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.frames.iter().map(|f| f.values.clone()).collect())
    }

    pub fn restore(&mut self, snapshot: &Snapshot) {
        for (frame, values) in self.frames.iter_mut().zip(&snapshot.0) {
            frame.values = values.clone();
        }
    }

    pub fn defer(&mut self, stmts: Vec<Stmt>) {
        self.pending.extend(stmts);
    }

    pub fn take_pending(&mut self) -> Vec<Stmt> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammer::ast::{Literal, Type};
    use crate::grammer::scope::{Symbol, SymbolKind};

    #[test]
    fn call_frames_route_by_declared_names() {
        let mut env = Environment::new();
        env.bind("g", Expr::literal(Literal::Int(1)));
        env.bind("x", Expr::literal(Literal::Int(2)));

        let func = Function {
            name: "f".into(),
            params: vec![("x".into(), Type::Int)],
            ret: Type::Void,
            body: vec![],
            symbols: vec![Symbol::new("x", SymbolKind::Variable, Type::Int)],
        };
        env.push_call(&func);
        assert_eq!(env.lookup("x"), None);
        assert_eq!(env.lookup("g"), Some(&Expr::literal(Literal::Int(1))));
        env.bind("x", Expr::literal(Literal::Int(3)));
        assert!(env.is_call_local("x"));
        assert!(!env.is_call_local("g"));
        env.pop_call();
        assert_eq!(env.lookup("x"), Some(&Expr::literal(Literal::Int(2))));
    }
}
