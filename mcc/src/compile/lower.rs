use super::tac::{Instr, Operand, Tac};
use crate::error::{Error, Result};
use crate::grammer::ast::{Expr, ExprKind, Program, Stmt, StmtKind, Type};

/// Walks an optimized program once, producing linear three-address code.
#[derive(Debug, Default)]
pub struct Lowerer {
    code: Vec<Instr>,
    temps: usize,
    labels: usize,
}

pub fn lower(program: &Program) -> Result<Tac> {
    let mut lowerer = Lowerer::default();
    lowerer.block(&program.body)?;
    Ok(Tac(lowerer.code))
}

impl Lowerer {
    fn temp(&mut self, expr: &Expr) -> Operand {
        self.temps += 1;
        Operand::Temp(self.temps, expr.ty.clone())
    }

    fn label(&mut self) -> String {
        self.labels += 1;
        format!("L{}", self.labels)
    }

    fn expr(&mut self, expr: &Expr) -> Result<Operand> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(Operand::Const(lit.clone())),
            ExprKind::Ident(name) => Ok(Operand::Var(name.clone(), expr.ty.clone())),
            ExprKind::Binary(op, lhs, rhs) => {
                let lhs = self.expr(lhs)?;
                let rhs = self.expr(rhs)?;
                let dst = self.temp(expr);
                self.code.push(Instr::Binary {
                    dst: dst.clone(),
                    op: *op,
                    lhs,
                    rhs,
                });
                Ok(dst)
            }
            ExprKind::Array(elems) => {
                let elems = elems
                    .iter()
                    .map(|e| self.expr(e))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Operand::Aggregate(elems, expr.ty.clone()))
            }
            ExprKind::Index(..) => Err(Error::Emit(format!(
                "array access {} cannot be resolved at compile time",
                expr
            ))),
            ExprKind::Call(name, _) => Err(Error::Emit(format!(
                "call to {} remains after optimization",
                name
            ))),
        }
    }

    fn block(&mut self, body: &[Stmt]) -> Result<()> {
        for stmt in body {
            self.stmt(stmt)?;
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match &stmt.kind {
            StmtKind::Declare {
                name,
                init: Some(value),
                ..
            }
            | StmtKind::Assign { name, value } => {
                let src = self.expr(value)?;
                let dst = Operand::Var(name.clone(), value.ty.clone());
                self.code.push(Instr::Copy { dst, src });
            }
            StmtKind::Declare { init: None, .. } => {}

            // Printing always reads from storage. A string variable is
            // already a slot `la` can point at.
            StmtKind::Write(arg) => {
                let value = self.expr(arg)?;
                let arg = match value {
                    Operand::Temp(..) | Operand::Var(_, Type::String) => value,
                    value => {
                        let dst = self.temp(arg);
                        self.code.push(Instr::Copy {
                            dst: dst.clone(),
                            src: value,
                        });
                        dst
                    }
                };
                self.code.push(Instr::Call {
                    name: "write".to_string(),
                    args: vec![arg],
                });
            }

            StmtKind::Call(name, args) => {
                let args = args
                    .iter()
                    .map(|a| self.expr(a))
                    .collect::<Result<Vec<_>>>()?;
                self.code.push(Instr::Call {
                    name: name.clone(),
                    args,
                });
            }

            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                let cond = self.expr(cond)?;
                let l_true = self.label();
                let l_else = (!else_body.is_empty()).then(|| self.label());
                let l_end = self.label();
                self.code.push(Instr::IfGoto {
                    cond,
                    label: l_true.clone(),
                });
                self.code
                    .push(Instr::Goto(l_else.clone().unwrap_or_else(|| l_end.clone())));
                self.code.push(Instr::Label(l_true));
                self.block(then_body)?;
                self.code.push(Instr::Goto(l_end.clone()));
                if let Some(l_else) = l_else {
                    self.code.push(Instr::Label(l_else));
                    self.block(else_body)?;
                }
                self.code.push(Instr::Label(l_end));
            }

            StmtKind::For { .. } | StmtKind::While { .. } => {
                return Err(Error::Emit(format!(
                    "loop at line {} remains after optimization",
                    stmt.line
                )));
            }

            StmtKind::Function(func) => {
                self.code.push(Instr::FuncBegin(func.name.clone()));
                self.block(&func.body)?;
                self.code.push(Instr::FuncEnd);
            }

            StmtKind::Return(value) => {
                let value = self.expr(value)?;
                self.code.push(Instr::Return(value));
            }
        }
        Ok(())
    }
}
