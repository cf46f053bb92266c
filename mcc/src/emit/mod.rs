pub mod storage;
pub mod text;

use crate::compile::tac::Tac;
use crate::error::Result;
use storage::Storage;
use text::TextGen;

/// Translate three-address code into a MIPS program.
pub fn emit(tac: &Tac) -> Result<mips::Program> {
    let storage = Storage::collect(tac)?;
    let mut text = TextGen::new(&storage);
    for instr in &tac.0 {
        text.instr(instr)?;
    }
    Ok(mips::Program::new(storage.data(), text.finish()))
}
