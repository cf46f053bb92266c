pub mod ast;
pub mod expr;
pub mod lexer;
pub mod parsercore;
pub mod parser;
pub mod scope;
pub mod token;

use crate::error::Result;
use ast::Program;
use lexer::Lexer;
use parsercore::Parser;

/// Tokenize and parse a whole source file, resolving every name on the way.
pub fn parse(source: &str) -> Result<Program> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens.into_iter()).parse()
}
