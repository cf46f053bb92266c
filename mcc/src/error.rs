use color_print::cprintln;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure is fatal: the first error stops the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to access {0}")]
    Io(String, #[source] std::io::Error),

    #[error("LexicalError: {1}")]
    Lexical(usize, String),

    #[error("SyntaxError: {1}")]
    Syntax(usize, String),

    #[error("ScopeError: {1}")]
    Scope(usize, String),

    #[error("TypeError: {1}")]
    Type(usize, String),

    #[error("FoldError: {1}")]
    Fold(usize, String),

    #[error("EmitError: {0}")]
    Emit(String),
}

impl Error {
    /// 1-based source line the error points at.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Lexical(line, _)
            | Error::Syntax(line, _)
            | Error::Scope(line, _)
            | Error::Type(line, _)
            | Error::Fold(line, _) => Some(*line),
            Error::Io(..) | Error::Emit(_) => None,
        }
    }

    /// Print error with the location and content of the offending source line
    pub fn print_diag(&self, file: &str, source: &str) {
        cprintln!("<red,bold>error</>: {}", self);

        let Some(line_num) = self.line() else {
            return;
        };
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
        cprintln!("      <blue>|</>");
        let line_content = source.lines().nth(line_num.saturating_sub(1)).unwrap_or("");
        cprintln!(" <blue>{:>4} |</> {}", line_num, line_content);
        cprintln!("      <blue>|</>");
    }
}
