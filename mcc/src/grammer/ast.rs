use super::scope::Symbol;
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float,
    String,
    Char,
    Bool,
    Array(Box<Type>),
    /// Element type of an empty array literal
    Any,
    Void,
}

impl Type {
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Type::Int | Type::Float | Type::String | Type::Char | Type::Bool
        )
    }

    /// Whether a value of type `other` may be stored in a slot of this type.
    pub fn accepts(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Array(_), Type::Array(elem)) if **elem == Type::Any => true,
            (Type::Array(a), Type::Array(b)) => a.accepts(b),
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::String => write!(f, "string"),
            Type::Char => write!(f, "char"),
            Type::Bool => write!(f, "bool"),
            Type::Array(elem) => write!(f, "[ ]{}", elem),
            Type::Any => write!(f, "any"),
            Type::Void => write!(f, "void"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Float(f64),
    Str(String),
    Char(char),
    Bool(bool),
}

impl Literal {
    pub fn ty(&self) -> Type {
        match self {
            Literal::Int(_) => Type::Int,
            Literal::Float(_) => Type::Float,
            Literal::Str(_) => Type::String,
            Literal::Char(_) => Type::Char,
            Literal::Bool(_) => Type::Bool,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{:?}", v),
            Literal::Str(s) => write!(f, "{:?}", s),
            Literal::Char(c) => write!(f, "{:?}", c),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %
    Eq,  // ==
    Ne,  // !=
    Lt,  // <
    Le,  // <=
    Gt,  // >
    Ge,  // >=
}

impl BinaryOp {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub ty: Type,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Ident(String),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Array(Vec<Expr>),
    Index(String, Box<Expr>),
    Call(String, Vec<Expr>),
}

impl Expr {
    pub fn new(ty: Type, kind: ExprKind) -> Self {
        Expr { ty, kind }
    }

    pub fn literal(lit: Literal) -> Self {
        Expr::new(lit.ty(), ExprKind::Literal(lit))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Fully known at compile time: a literal or an array of them.
    pub fn is_value(&self) -> bool {
        match &self.kind {
            ExprKind::Literal(_) => true,
            ExprKind::Array(elems) => elems.iter().all(Expr::is_value),
            _ => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(lit) => write!(f, "{}", lit),
            ExprKind::Ident(name) => write!(f, "{}", name),
            ExprKind::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op, rhs),
            ExprKind::Array(elems) => write!(f, "{{{}}}", elems.iter().join(", ")),
            ExprKind::Index(name, idx) => write!(f, "{}[{}]", name, idx),
            ExprKind::Call(name, args) => write!(f, "{}({})", name, args.iter().join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// 1-based source line
    pub line: usize,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Scalar or array declaration, `global` ones included
    Declare {
        name: String,
        ty: Type,
        init: Option<Expr>,
    },
    Function(Function),
    Assign {
        name: String,
        value: Expr,
    },
    /// The built-in print statement
    Write(Expr),
    /// A call whose result is discarded
    Call(String, Vec<Expr>),
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Expr,
        step: Option<Box<Stmt>>,
        body: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    Return(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<(String, Type)>,
    pub ret: Type,
    pub body: Vec<Stmt>,
    /// Formals and locals declared directly in the function scope
    pub symbols: Vec<Symbol>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    /// Names declared at global scope
    pub symbols: Vec<Symbol>,
}

impl Stmt {
    pub fn new(line: usize, kind: StmtKind) -> Self {
        Stmt { line, kind }
    }

    /// Directly nested statements. A loop's init and step come before and
    /// after its body, the order they run in.
    pub fn children(&self) -> Vec<&Stmt> {
        match &self.kind {
            StmtKind::Function(func) => func.body.iter().collect(),
            StmtKind::If {
                then_body,
                else_body,
                ..
            } => then_body.iter().chain(else_body.iter()).collect(),
            StmtKind::For {
                init, step, body, ..
            } => init
                .iter()
                .map(|s| s.as_ref())
                .chain(body.iter())
                .chain(step.iter().map(|s| s.as_ref()))
                .collect(),
            StmtKind::While { body, .. } => body.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Visit this statement and everything nested in it, pre-order.
    pub fn walk<'s>(&'s self, visit: &mut impl FnMut(&'s Stmt)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Name bound by this statement, if any.
    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            StmtKind::Declare { name, .. } | StmtKind::Assign { name, .. } => Some(name),
            _ => None,
        }
    }
}

fn fmt_block(f: &mut fmt::Formatter<'_>, body: &[Stmt], indent: usize) -> fmt::Result {
    for stmt in body {
        stmt.fmt_indent(f, indent)?;
    }
    Ok(())
}

impl Stmt {
    fn fmt_indent(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        match &self.kind {
            StmtKind::Declare { name, ty, init } => match init {
                Some(init) => writeln!(f, "{}{} {} = {};", pad, ty, name, init),
                None => writeln!(f, "{}{} {};", pad, ty, name),
            },
            StmtKind::Function(func) => {
                let params = func
                    .params
                    .iter()
                    .map(|(name, ty)| format!("{} {}", ty, name))
                    .join(", ");
                writeln!(f, "{}func {}({}) {} {{", pad, func.name, params, func.ret)?;
                fmt_block(f, &func.body, indent + 1)?;
                writeln!(f, "{}}}", pad)
            }
            StmtKind::Assign { name, value } => writeln!(f, "{}{} = {};", pad, name, value),
            StmtKind::Write(arg) => writeln!(f, "{}write({});", pad, arg),
            StmtKind::Call(name, args) => {
                writeln!(f, "{}{}({});", pad, name, args.iter().join(", "))
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                writeln!(f, "{}if ({}) {{", pad, cond)?;
                fmt_block(f, then_body, indent + 1)?;
                if !else_body.is_empty() {
                    writeln!(f, "{}}} else {{", pad)?;
                    fmt_block(f, else_body, indent + 1)?;
                }
                writeln!(f, "{}}}", pad)
            }
            StmtKind::For { cond, body, .. } => {
                writeln!(f, "{}for ({}) {{", pad, cond)?;
                fmt_block(f, body, indent + 1)?;
                writeln!(f, "{}}}", pad)
            }
            StmtKind::While { cond, body } => {
                writeln!(f, "{}while ({}) {{", pad, cond)?;
                fmt_block(f, body, indent + 1)?;
                writeln!(f, "{}}}", pad)
            }
            StmtKind::Return(value) => writeln!(f, "{}return {};", pad, value),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indent(f, 0)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_block(f, &self.body, 0)
    }
}
