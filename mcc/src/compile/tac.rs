use crate::grammer::ast::{BinaryOp, Literal, Type};
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A user variable
    Var(String, Type),
    /// Compiler temporary `t<k>`
    Temp(usize, Type),
    Const(Literal),
    /// An array literal, element by element
    Aggregate(Vec<Operand>, Type),
}

impl Operand {
    pub fn ty(&self) -> Type {
        match self {
            Operand::Var(_, ty) | Operand::Temp(_, ty) | Operand::Aggregate(_, ty) => ty.clone(),
            Operand::Const(lit) => lit.ty(),
        }
    }

    /// Storage label in the data section; constants have none.
    pub fn slot(&self) -> Option<String> {
        match self {
            Operand::Var(name, _) => Some(format!("v_{}", name)),
            Operand::Temp(k, _) => Some(format!("t{}", k)),
            Operand::Const(_) | Operand::Aggregate(..) => None,
        }
    }

    /// Storage slots read when this operand is evaluated
    pub fn reads(&self) -> Vec<String> {
        match self {
            Operand::Aggregate(elems, _) => elems.iter().flat_map(|e| e.reads()).collect(),
            op => op.slot().into_iter().collect(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Var(name, _) => write!(f, "{}", name),
            Operand::Temp(k, _) => write!(f, "t{}", k),
            Operand::Const(lit) => write!(f, "{}", lit),
            Operand::Aggregate(elems, _) => write!(f, "{{{}}}", elems.iter().join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// dst = src
    Copy { dst: Operand, src: Operand },
    /// dst = lhs op rhs
    Binary {
        dst: Operand,
        op: BinaryOp,
        lhs: Operand,
        rhs: Operand,
    },
    /// call name arg...
    Call { name: String, args: Vec<Operand> },
    /// if cond goto label
    IfGoto { cond: Operand, label: String },
    Goto(String),
    Label(String),
    FuncBegin(String),
    FuncEnd,
    Return(Operand),
}

impl Instr {
    pub fn dst(&self) -> Option<&Operand> {
        match self {
            Instr::Copy { dst, .. } | Instr::Binary { dst, .. } => Some(dst),
            _ => None,
        }
    }

    /// Operands read by this instruction
    pub fn sources(&self) -> Vec<&Operand> {
        match self {
            Instr::Copy { src, .. } => vec![src],
            Instr::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Instr::Call { args, .. } => args.iter().collect(),
            Instr::IfGoto { cond, .. } => vec![cond],
            Instr::Return(value) => vec![value],
            Instr::Goto(_) | Instr::Label(_) | Instr::FuncBegin(_) | Instr::FuncEnd => vec![],
        }
    }

    /// Every operand, destination first
    pub fn operands(&self) -> Vec<&Operand> {
        self.dst().into_iter().chain(self.sources()).collect()
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Copy { dst, src } => write!(f, "{} = {}", dst, src),
            Instr::Binary { dst, op, lhs, rhs } => write!(f, "{} = {} {} {}", dst, lhs, op, rhs),
            Instr::Call { name, args } if args.is_empty() => write!(f, "call {}", name),
            Instr::Call { name, args } => write!(f, "call {} {}", name, args.iter().join(" ")),
            Instr::IfGoto { cond, label } => write!(f, "if {} goto {}", cond, label),
            Instr::Goto(label) => write!(f, "goto {}", label),
            Instr::Label(label) => write!(f, "{}:", label),
            Instr::FuncBegin(name) => write!(f, "func {}:", name),
            Instr::FuncEnd => write!(f, "end func"),
            Instr::Return(value) => write!(f, "return {}", value),
        }
    }
}

/// A lowered program, one instruction per line in its text form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tac(pub Vec<Instr>);

impl fmt::Display for Tac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.0 {
            writeln!(f, "{}", instr)?;
        }
        Ok(())
    }
}
