pub mod data;
pub mod inst;
pub mod program;
pub mod reg;
pub mod syscall;

pub use data::{DataDecl, Directive};
pub use inst::Inst;
pub use program::Program;
pub use reg::{FReg, Reg};
pub use syscall::Syscall;
