pub mod compile;
pub mod driver;
pub mod emit;
pub mod error;
pub mod eval;
pub mod grammer;

pub use driver::{compile_source, run, Artifacts};
pub use error::{Error, Result};
pub use grammer::lexer::{Lexer, LineLexer};
pub use grammer::parsercore::Parser;
