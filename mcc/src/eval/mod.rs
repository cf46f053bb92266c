//! AST level optimizer: constant folding and propagation, dead branch
//! elimination, call inlining and loop unrolling.

pub mod block;
pub mod env;
pub mod fold;

use crate::error::Result;
use crate::grammer::ast::Program;
use block::fold_block;
use env::Environment;

pub fn optimize(program: &Program) -> Result<Program> {
    let mut env = Environment::new();
    let mut body = Vec::new();
    fold_block(&mut env, &program.body, &mut body)?;
    Ok(Program {
        body,
        symbols: program.symbols.clone(),
    })
}
