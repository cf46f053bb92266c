use crate::compile::{self, tac::Tac};
use crate::error::{Error, Result};
use crate::grammer::ast::Program;
use crate::{emit, eval, grammer};
use log::info;
use std::path::Path;
use std::time::Instant;

pub const TAC_FILE: &str = "output.tac";
pub const MIPS_FILE: &str = "output.mips";

/// Everything one compilation produces.
#[derive(Debug)]
pub struct Artifacts {
    pub ast: Program,
    pub optimized: Program,
    pub tac: Tac,
    pub asm: mips::Program,
}

fn timed<T>(stage: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    let out = f()?;
    info!("{} finished in {:?}", stage, start.elapsed());
    Ok(out)
}

/// Run every stage in memory. Nothing is produced if any stage fails.
pub fn compile_source(source: &str) -> Result<Artifacts> {
    let ast = timed("parse", || grammer::parse(source))?;
    let optimized = timed("optimize", || eval::optimize(&ast))?;
    let tac = timed("lower", || compile::compile(&optimized))?;
    let asm = timed("emit", || emit::emit(&tac))?;
    Ok(Artifacts {
        ast,
        optimized,
        tac,
        asm,
    })
}

pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::Io(path.display().to_string(), e))
}

/// Write `output.tac` and `output.mips` into `out_dir`.
pub fn write_outputs(artifacts: &Artifacts, out_dir: &Path) -> Result<()> {
    for (name, text) in [
        (TAC_FILE, artifacts.tac.to_string()),
        (MIPS_FILE, artifacts.asm.to_string()),
    ] {
        let path = out_dir.join(name);
        std::fs::write(&path, text).map_err(|e| Error::Io(path.display().to_string(), e))?;
    }
    Ok(())
}

/// Compile the file at `path`, writing both outputs into `out_dir`.
pub fn run(path: &Path, out_dir: &Path) -> Result<Artifacts> {
    let source = read_source(path)?;
    let artifacts = compile_source(&source)?;
    write_outputs(&artifacts, out_dir)?;
    Ok(artifacts)
}
