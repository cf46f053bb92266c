use super::env::Environment;
use crate::error::{Error, Result};
use crate::grammer::ast::{Expr, ExprKind, Literal, Stmt, StmtKind};
use indexmap::IndexSet;
use log::debug;

/// Upper bound on the iterations a single loop may unroll to.
pub const MAX_UNROLL: usize = 10_000;

/// How control leaves a folded block.
#[derive(Debug)]
pub enum Flow {
    Continue,
    /// A `return` was reached, carrying the folded value
    Return(Expr),
}

/// Fold `stmts` in order, appending what survives to `out`.
pub fn fold_block(env: &mut Environment, stmts: &[Stmt], out: &mut Vec<Stmt>) -> Result<Flow> {
    for stmt in stmts {
        if let Flow::Return(value) = fold_stmt(env, stmt, out)? {
            return Ok(Flow::Return(value));
        }
    }
    Ok(Flow::Continue)
}

/// Fold an expression, flushing the side effects of any inlined call into `out`.
fn fold_value(env: &mut Environment, expr: &Expr, out: &mut Vec<Stmt>) -> Result<Expr> {
    let value = env.fold_expr(expr)?;
    out.extend(env.take_pending());
    Ok(value)
}

fn is_empty_array(expr: &Expr) -> bool {
    matches!(&expr.kind, ExprKind::Array(elems) if elems.is_empty())
}

fn as_bool(expr: &Expr) -> Option<bool> {
    match expr.as_literal() {
        Some(Literal::Bool(b)) => Some(*b),
        _ => None,
    }
}

/// Record a binding and decide whether the assignment itself is kept.
fn assign(env: &mut Environment, line: usize, name: &str, value: Expr, out: &mut Vec<Stmt>) {
    env.bind(name, value.clone());
    if is_empty_array(&value) || env.is_call_local(name) {
        return;
    }
    out.push(Stmt::new(
        line,
        StmtKind::Assign {
            name: name.to_string(),
            value,
        },
    ));
}

pub fn fold_stmt(env: &mut Environment, stmt: &Stmt, out: &mut Vec<Stmt>) -> Result<Flow> {
    env.line = stmt.line;
    match &stmt.kind {
        StmtKind::Declare { name, init, .. } => match init {
            Some(init) => {
                let value = fold_value(env, init, out)?;
                assign(env, stmt.line, name, value, out);
            }
            None => env.forget(name),
        },

        StmtKind::Assign { name, value } => {
            let value = fold_value(env, value, out)?;
            assign(env, stmt.line, name, value, out);
        }

        StmtKind::Function(func) => env.define(func.clone()),

        StmtKind::Write(arg) => {
            let arg = fold_value(env, arg, out)?;
            out.push(Stmt::new(stmt.line, StmtKind::Write(arg)));
        }

        StmtKind::Call(name, args) => {
            env.inline(name, args)?;
            out.extend(env.take_pending());
        }

        StmtKind::If {
            cond,
            then_body,
            else_body,
        } => {
            let cond = fold_value(env, cond, out)?;
            match as_bool(&cond) {
                Some(taken) => {
                    debug!(
                        "line {}: condition is always {}, dropping the other branch",
                        stmt.line, taken
                    );
                    let body = if taken { then_body } else { else_body };
                    return fold_block(env, body, out);
                }
                None => {
                    let then_body = fold_branch(env, then_body)?;
                    let else_body = fold_branch(env, else_body)?;
                    out.push(Stmt::new(
                        stmt.line,
                        StmtKind::If {
                            cond,
                            then_body,
                            else_body,
                        },
                    ));
                }
            }
        }

        StmtKind::For {
            init,
            cond,
            step,
            body,
        } => {
            if let Some(init) = init {
                fold_stmt(env, init, out)?;
            }
            return unroll(env, stmt.line, cond, body, step.as_deref(), out);
        }

        StmtKind::While { cond, body } => {
            return unroll(env, stmt.line, cond, body, None, out);
        }

        StmtKind::Return(value) => {
            let value = fold_value(env, value, out)?;
            return Ok(Flow::Return(value));
        }
    }
    Ok(Flow::Continue)
}

/// Fold a branch that may or may not run. Names it assigns become unknown
/// afterwards, whichever way the branch goes.
fn fold_branch(env: &mut Environment, body: &[Stmt]) -> Result<Vec<Stmt>> {
    check_call_locals(env, body)?;

    let snapshot = env.snapshot();
    let mut out = Vec::new();
    let flow = fold_block(env, body, &mut out);
    env.restore(&snapshot);
    if let Flow::Return(_) = flow? {
        return Err(env.error("return inside a condition that cannot be resolved at compile time"));
    }

    // Inlined calls put their global assignments into `out` only
    let mut assigned = IndexSet::new();
    for stmt in body.iter().chain(&out) {
        stmt.walk(&mut |s| {
            if let Some(name) = s.target() {
                assigned.insert(name.to_string());
            }
        });
    }
    for name in &assigned {
        env.forget(name);
    }
    Ok(out)
}

/// Locals of an inlined call leave no trace in the output, so a branch that
/// may not run cannot update one declared outside of it.
fn check_call_locals(env: &Environment, body: &[Stmt]) -> Result<()> {
    let mut declared = IndexSet::new();
    let mut updated = Vec::new();
    for stmt in body {
        stmt.walk(&mut |s| match &s.kind {
            StmtKind::Declare { name, .. } => {
                declared.insert(name.as_str());
            }
            StmtKind::Assign { name, .. } => updated.push((s.line, name.as_str())),
            _ => {}
        });
    }
    match updated
        .into_iter()
        .find(|(_, name)| !declared.contains(name) && env.is_call_local(name))
    {
        Some((line, name)) => Err(Error::Fold(
            line,
            format!("runtime assignment to {}, a local of an inlined call", name),
        )),
        None => Ok(()),
    }
}

/// Unroll a loop by re-evaluating its condition after every iteration.
fn unroll(
    env: &mut Environment,
    line: usize,
    cond: &Expr,
    body: &[Stmt],
    step: Option<&Stmt>,
    out: &mut Vec<Stmt>,
) -> Result<Flow> {
    let mut iterations = 0;
    loop {
        env.line = line;
        let value = fold_value(env, cond, out)?;
        match as_bool(&value) {
            Some(false) => break,
            Some(true) => {}
            None => return Err(env.error(format!("unresolvable loop bound {}", value))),
        }
        iterations += 1;
        if iterations > MAX_UNROLL {
            return Err(env.error(format!("loop does not finish within {} iterations", MAX_UNROLL)));
        }
        if let Flow::Return(value) = fold_block(env, body, out)? {
            return Ok(Flow::Return(value));
        }
        if let Some(step) = step {
            fold_stmt(env, step, out)?;
        }
    }
    debug!("line {}: loop unrolled into {} iterations", line, iterations);
    Ok(Flow::Continue)
}
