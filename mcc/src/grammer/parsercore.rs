use super::ast::Type;
use super::scope::Resolver;
use super::token::{Token, TokenKind};
use crate::error::{Error, Result};
use std::iter::Peekable;

pub struct Parser<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    line: usize,
    pub(super) scope: Resolver,
    /// Name and return type of the function being parsed
    pub(super) func: Option<(String, Type)>,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: I) -> Self {
        Parser {
            tokens: tokens.peekable(),
            line: 1,
            scope: Resolver::new(),
            func: None,
        }
    }

    /// Line of the most recently consumed token
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn syntax_error(&self, msg: impl Into<String>) -> Error {
        Error::Syntax(self.line, msg.into())
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.next()?;
        self.line = token.pos.line;
        Some(token)
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Skip line terminators between statements
    fn skip(&mut self) {
        while let Some(token) = self.tokens.peek() {
            match &token.kind {
                TokenKind::Newline => self.bump(),
                _ => break,
            };
        }
    }

    /// Peek : Watch next token without consuming it
    pub fn peek(&mut self) -> Option<&Token> {
        self.skip();
        self.tokens.peek()
    }

    /// Next : Consume next token and return it
    pub fn next(&mut self) -> Option<Token> {
        self.skip();
        self.bump()
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> bool {
        self.skip();
        match self.tokens.peek() {
            Some(token) => cond(token),
            None => false,
        }
    }

    /// Consume if next token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        self.skip();
        let token = self.tokens.next_if(|token| cond(token))?;
        self.line = token.pos.line;
        Some(token)
    }

    /// Next token must be match with condition (skipping line terminators)
    pub fn expect_tobe<F: Fn(&Token) -> bool>(&mut self, cond: F, what: &str) -> Result<Token> {
        self.skip();
        match self.tokens.peek().cloned() {
            Some(token) if cond(&token) => {
                self.bump();
                Ok(token)
            }
            Some(token) => Err(Error::Syntax(
                token.pos.line,
                format!("expected {} but found {}", what, token.kind),
            )),
            None => Err(self.syntax_error(format!("expected {} but reached end of file", what))),
        }
    }

    /// Collect the tokens of one expression.
    /// Stops before a depth-0 closing bracket, line end, or token matching `stop`.
    /// Line ends nested inside brackets are dropped.
    pub fn span<F: Fn(&TokenKind) -> bool>(&mut self, stop: F) -> Result<Vec<Token>> {
        self.skip();
        let mut span = Vec::new();
        let mut depth = 0usize;
        while let Some(token) = self.tokens.peek() {
            let kind = &token.kind;
            if depth == 0 && (kind.is_close() || stop(kind) || *kind == TokenKind::Newline) {
                break;
            }
            if kind.is_open() {
                depth += 1;
            } else if kind.is_close() {
                depth -= 1;
            }
            let Some(token) = self.bump() else { break };
            if token.kind != TokenKind::Newline {
                span.push(token);
            }
        }
        if depth != 0 {
            return Err(self.syntax_error("unmatched bracket"));
        }
        Ok(span)
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat, $what:expr) => {
        $parser.expect_tobe(|token| matches!(&token.kind, $kind), $what)
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:pat, $following:expr) => {
        if check!($parser, $trigger) {
            $parser.next();
            Some($following)
        } else {
            None
        }
    };
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(&token.kind, $trigger))
    };
}

/// Parse repeated elements separated by a delimiter
/// [ element { delimiter element } ] terminal
#[macro_export]
macro_rules! repeat {
    ($parser:expr, $elem:expr, $delimiter:pat, $terminal:pat) => {{
        let mut items = Vec::new();
        if !check!($parser, $terminal) {
            items.push($elem?);
            while check!($parser, $delimiter) {
                $parser.next();
                items.push($elem?);
            }
        }
        items
    }};
}
