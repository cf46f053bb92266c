pub mod lower;
pub mod opt;
pub mod tac;

use crate::error::Result;
use crate::grammer::ast::Program;
use tac::Tac;

/// Lower an optimized program and clean up the result.
pub fn compile(program: &Program) -> Result<Tac> {
    let tac = lower::lower(program)?;
    Ok(opt::optimize(tac))
}
