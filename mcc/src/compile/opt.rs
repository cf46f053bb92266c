use super::tac::{Instr, Operand, Tac};
use crate::eval::fold::apply;
use crate::grammer::ast::Literal;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Clean up lowered code until no pass changes anything.
pub fn optimize(tac: Tac) -> Tac {
    let mut code = tac.0;
    let mut rounds = 0;
    loop {
        rounds += 1;
        let changed = propagate(&mut code) | fold(&mut code) | eliminate(&mut code);
        if !changed {
            break;
        }
    }
    debug!("tac clean-up settled after {} rounds, {} instructions", rounds, code.len());
    Tac(code)
}

fn substitute(op: &mut Operand, known: &HashMap<String, Literal>) -> bool {
    let Some(lit) = op.slot().and_then(|slot| known.get(&slot)) else {
        return false;
    };
    *op = Operand::Const(lit.clone());
    true
}

/// Replace reads of slots holding a known constant.
/// Knowledge is dropped at every label and never flows into call arguments.
fn propagate(code: &mut [Instr]) -> bool {
    let mut known: HashMap<String, Literal> = HashMap::new();
    let mut changed = false;
    for instr in code.iter_mut() {
        match instr {
            Instr::Label(_) | Instr::FuncBegin(_) | Instr::FuncEnd => known.clear(),
            Instr::Copy { src, .. } => changed |= substitute(src, &known),
            Instr::Binary { lhs, rhs, .. } => {
                changed |= substitute(lhs, &known);
                changed |= substitute(rhs, &known);
            }
            Instr::IfGoto { cond, .. } => changed |= substitute(cond, &known),
            Instr::Return(value) => changed |= substitute(value, &known),
            Instr::Call { .. } | Instr::Goto(_) => {}
        }

        if let Some(slot) = instr.dst().and_then(|d| d.slot()) {
            match instr {
                Instr::Copy {
                    src: Operand::Const(lit),
                    ..
                } => {
                    known.insert(slot, lit.clone());
                }
                _ => {
                    known.remove(&slot);
                }
            }
        }
    }
    changed
}

/// Evaluate binaries over two integer constants.
fn fold(code: &mut [Instr]) -> bool {
    let mut changed = false;
    for instr in code.iter_mut() {
        let Instr::Binary {
            dst,
            op,
            lhs: Operand::Const(lhs @ Literal::Int(_)),
            rhs: Operand::Const(rhs @ Literal::Int(_)),
        } = instr
        else {
            continue;
        };
        if let Ok(Some(value)) = apply(*op, lhs, rhs) {
            *instr = Instr::Copy {
                dst: dst.clone(),
                src: Operand::Const(value),
            };
            changed = true;
        }
    }
    changed
}

/// Drop copies and binaries whose destination is never read.
fn eliminate(code: &mut Vec<Instr>) -> bool {
    let read: HashSet<String> = code
        .iter()
        .flat_map(|instr| instr.sources())
        .flat_map(|op| op.reads())
        .collect();
    let before = code.len();
    code.retain(|instr| match instr.dst().and_then(|d| d.slot()) {
        Some(slot) => read.contains(&slot),
        None => true,
    });
    code.len() != before
}
