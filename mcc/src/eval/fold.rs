use super::block::{fold_block, Flow};
use super::env::Environment;
use crate::error::Result;
use crate::grammer::ast::{BinaryOp, Expr, ExprKind, Literal, Type};
use log::debug;

/// Evaluate a binary operator over two literals.
/// `Ok(None)` means the pair is left for run time.
pub fn apply(op: BinaryOp, lhs: &Literal, rhs: &Literal) -> std::result::Result<Option<Literal>, &'static str> {
    use Literal::*;
    let value = match (lhs, rhs) {
        (Int(a), Int(b)) => {
            let (a, b) = (*a, *b);
            match op {
                BinaryOp::Add => Int(a.wrapping_add(b)),
                BinaryOp::Sub => Int(a.wrapping_sub(b)),
                BinaryOp::Mul => Int(a.wrapping_mul(b)),
                BinaryOp::Div if b == 0 => return Err("division by zero"),
                BinaryOp::Div => Int(a.wrapping_div(b)),
                BinaryOp::Mod if b == 0 => return Err("modulo by zero"),
                BinaryOp::Mod => Int(a.wrapping_rem(b)),
                BinaryOp::Eq => Bool(a == b),
                BinaryOp::Ne => Bool(a != b),
                BinaryOp::Lt => Bool(a < b),
                BinaryOp::Le => Bool(a <= b),
                BinaryOp::Gt => Bool(a > b),
                BinaryOp::Ge => Bool(a >= b),
            }
        }
        (Int(_) | Float(_), Int(_) | Float(_)) if !op.is_comparison() => {
            let (a, b) = (as_float(lhs), as_float(rhs));
            match op {
                BinaryOp::Add => Float(a + b),
                BinaryOp::Sub => Float(a - b),
                BinaryOp::Mul => Float(a * b),
                BinaryOp::Div if b == 0.0 => return Err("division by zero"),
                BinaryOp::Div => Float(a / b),
                _ => return Ok(None),
            }
        }
        (Str(a), Str(b)) if op == BinaryOp::Add => Str(format!("{}{}", a, b)),
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn as_float(lit: &Literal) -> f64 {
    match lit {
        Literal::Int(v) => *v as f64,
        Literal::Float(v) => *v,
        _ => 0.0,
    }
}

impl Environment {
    pub fn fold_expr(&mut self, expr: &Expr) -> Result<Expr> {
        match &expr.kind {
            ExprKind::Literal(_) => Ok(expr.clone()),

            // Unknown names depend on a run time value and stay symbolic
            ExprKind::Ident(name) => match self.lookup(name) {
                Some(value) => Ok(value.clone()),
                None => {
                    self.check_resolved(name)?;
                    Ok(expr.clone())
                }
            },

            ExprKind::Binary(op, lhs, rhs) => {
                let lhs = self.fold_expr(lhs)?;
                let rhs = self.fold_expr(rhs)?;
                if let (Some(a), Some(b)) = (lhs.as_literal(), rhs.as_literal()) {
                    if let Some(value) = apply(*op, a, b).map_err(|msg| self.error(msg))? {
                        return Ok(Expr::literal(value));
                    }
                }
                Ok(Expr::new(
                    expr.ty.clone(),
                    ExprKind::Binary(*op, Box::new(lhs), Box::new(rhs)),
                ))
            }

            ExprKind::Array(elems) => {
                let elems = elems
                    .iter()
                    .map(|e| self.fold_expr(e))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Expr::new(expr.ty.clone(), ExprKind::Array(elems)))
            }

            ExprKind::Index(name, idx) => {
                let idx = self.fold_expr(idx)?;
                let base = self.lookup(name);
                if base.is_none() {
                    self.check_resolved(name)?;
                }
                if let (Some(Literal::Int(i)), Some(ExprKind::Array(elems))) =
                    (idx.as_literal(), base.map(|b| &b.kind))
                {
                    return match usize::try_from(*i).ok().and_then(|i| elems.get(i)) {
                        Some(elem) => Ok(elem.clone()),
                        None => Err(self.error(format!(
                            "index {} is out of range for {} of length {}",
                            i,
                            name,
                            elems.len()
                        ))),
                    };
                }
                Ok(Expr::new(
                    expr.ty.clone(),
                    ExprKind::Index(name.clone(), Box::new(idx)),
                ))
            }

            ExprKind::Call(name, args) => match self.inline(name, args)? {
                Some(value) => Ok(value),
                None => Err(self.error(format!("{} does not return a value", name))),
            },
        }
    }

    /// A callee local with no known value would surface in the caller as a
    /// name nothing binds.
    fn check_resolved(&self, name: &str) -> Result<()> {
        if self.is_call_local(name) {
            return Err(self.error(format!(
                "{} is a local of an inlined call with no value known at compile time",
                name
            )));
        }
        Ok(())
    }

    /// Fold a call by running a copy of the callee body against its arguments.
    /// Side effects of the body are deferred to the caller; the returned value,
    /// if any, is the result.
    pub fn inline(&mut self, name: &str, args: &[Expr]) -> Result<Option<Expr>> {
        let func = self.function(name)?;
        if func.params.len() != args.len() {
            return Err(self.error(format!(
                "{} expects {} arguments but got {}",
                name,
                func.params.len(),
                args.len()
            )));
        }
        let args = args
            .iter()
            .map(|a| self.fold_expr(a))
            .collect::<Result<Vec<_>>>()?;

        debug!("line {}: inlining {}({})", self.line, name, args.len());
        let line = self.line;
        self.push_call(&func);
        for ((param, _), arg) in func.params.iter().zip(args) {
            self.bind(param, arg);
        }
        let mut effects = Vec::new();
        let flow = fold_block(self, &func.body, &mut effects);
        self.pop_call();
        self.line = line;

        self.defer(effects);
        match flow? {
            Flow::Return(value) => Ok(Some(value)),
            Flow::Continue if func.ret == Type::Void => Ok(None),
            Flow::Continue => Err(self.error(format!("{} ended without returning a value", name))),
        }
    }
}
