use super::token::{Keyword, Pos, Token, TokenKind};
use crate::error::{Error, Result};
use std::iter::Peekable;
use std::str::CharIndices;

/// Tokenizes a whole source file, one `Newline` token after each line.
pub struct Lexer<'a> {
    code: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self { code }
    }

    pub fn tokenize(self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        for (idx, line) in self.code.lines().enumerate() {
            let lexer = LineLexer::new(line, idx + 1);
            tokens.extend(lexer.tokenize()?);
            let pos = Pos {
                line: idx + 1,
                col: line.len(),
            };
            tokens.push(Token::new(TokenKind::Newline, pos));
        }
        Ok(tokens)
    }
}

pub struct LineLexer<'a> {
    iter: Peekable<CharIndices<'a>>,
    line: usize,
}

impl<'a> LineLexer<'a> {
    pub fn new(code: &'a str, line: usize) -> Self {
        Self {
            iter: code.char_indices().peekable(),
            line,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<(usize, char)> {
        self.iter.clone().nth(n)
    }
    fn consume(&mut self) -> Option<(usize, char)> {
        self.iter.next()
    }
    fn error(&self, msg: String) -> Error {
        Error::Lexical(self.line, msg)
    }
}

// ----------------------------------------------------------------------------
// Tokenizer
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some((idx, ch0)) = self.peek_nth(0) {
            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            let pos = Pos {
                line: self.line,
                col: idx,
            };

            // 1. Double character token
            if let Some((_, ch1)) = self.peek_nth(1) {
                // Comment runs to end of line
                if ch0 == '/' && ch1 == '/' {
                    break;
                }

                if let Some(kind) = double_char_token(ch0, ch1) {
                    self.consume();
                    self.consume();
                    tokens.push(Token::new(kind, pos));
                    continue;
                }
            }

            // 2. Single character token
            if let Some(kind) = single_char_token(ch0) {
                self.consume();
                tokens.push(Token::new(kind, pos));
                continue;
            }

            // 3. Number literal
            if ch0.is_ascii_digit() {
                tokens.push(Token::new(self.parse_number()?, pos));
                continue;
            }

            // 4. Char literal
            if ch0 == '\'' {
                tokens.push(Token::new(self.parse_char()?, pos));
                continue;
            }

            // 5. String literal
            if ch0 == '"' {
                tokens.push(Token::new(self.parse_text()?, pos));
                continue;
            }

            // 6. Identifier or keyword
            if ch0.is_ascii_alphabetic() || ch0 == '_' {
                tokens.push(Token::new(self.parse_word(), pos));
                continue;
            }

            return Err(self.error(format!("unrecognized character '{}'", ch0)));
        }
        Ok(tokens)
    }

    fn parse_word(&mut self) -> TokenKind {
        let mut lexeme = String::new();
        while let Some((_, ch)) = self
            .iter
            .next_if(|(_, ch)| matches!(ch, '_' | '0'..='9' | 'a'..='z' | 'A'..='Z'))
        {
            lexeme.push(ch);
        }
        match lexeme.as_str() {
            "True" => TokenKind::Bool(true),
            "False" => TokenKind::Bool(false),
            word => match Keyword::parse(word) {
                Some(kw) => TokenKind::Kw(kw),
                None => TokenKind::Ident(lexeme),
            },
        }
    }

    fn parse_escape(&mut self, quote: char) -> Result<char> {
        match self.consume() {
            Some((_, 'n')) => Ok('\n'),
            Some((_, 't')) => Ok('\t'),
            Some((_, '\\')) => Ok('\\'),
            Some((_, ch)) if ch == quote => Ok(ch),
            Some((_, ch)) => Err(self.error(format!("invalid escape sequence '\\{}'", ch))),
            None => Err(self.error("unterminated escape sequence".to_string())),
        }
    }

    // Char: 'a', '\n'
    fn parse_char(&mut self) -> Result<TokenKind> {
        self.consume();
        let value = match self.consume() {
            Some((_, '\\')) => self.parse_escape('\'')?,
            Some((_, '\'')) => return Err(self.error("empty char literal".to_string())),
            Some((_, ch)) => ch,
            None => return Err(self.error("unterminated char literal".to_string())),
        };
        match self.consume() {
            Some((_, '\'')) => Ok(TokenKind::Char(value)),
            _ => Err(self.error("char literal must hold exactly one character".to_string())),
        }
    }

    // Text: "hoge\nfuga"
    fn parse_text(&mut self) -> Result<TokenKind> {
        self.consume();
        let mut lexeme = String::new();
        loop {
            match self.consume() {
                Some((_, '"')) => return Ok(TokenKind::Text(lexeme)),
                Some((_, '\\')) => lexeme.push(self.parse_escape('"')?),
                Some((_, ch)) => lexeme.push(ch),
                None => return Err(self.error("unterminated string literal".to_string())),
            }
        }
    }

    // Number: 42, 3.14
    fn parse_number(&mut self) -> Result<TokenKind> {
        let mut lexeme = String::new();
        while let Some((_, ch)) = self.iter.next_if(|(_, ch)| ch.is_ascii_digit()) {
            lexeme.push(ch);
        }

        let fraction = matches!(self.peek_nth(0), Some((_, '.')))
            && matches!(self.peek_nth(1), Some((_, ch)) if ch.is_ascii_digit());
        if fraction {
            self.consume();
            lexeme.push('.');
            while let Some((_, ch)) = self.iter.next_if(|(_, ch)| ch.is_ascii_digit()) {
                lexeme.push(ch);
            }
            return lexeme
                .parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.error(format!("invalid float literal {}", lexeme)));
        }

        lexeme
            .parse::<i32>()
            .map(TokenKind::Int)
            .map_err(|_| self.error(format!("integer literal {} does not fit in 32 bits", lexeme)))
    }
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        ('=', '=') => Some(TokenKind::EqualEqual),
        ('!', '=') => Some(TokenKind::ExclEqual),
        ('<', '=') => Some(TokenKind::LAngleEqual),
        ('>', '=') => Some(TokenKind::RAngleEqual),
        _ => None,
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Equal),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '%' => Some(TokenKind::Percent),
        ';' => Some(TokenKind::Semicolon),
        ',' => Some(TokenKind::Comma),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '{' => Some(TokenKind::LCurly),
        '}' => Some(TokenKind::RCurly),
        '<' => Some(TokenKind::LAngle),
        '>' => Some(TokenKind::RAngle),
        _ => None,
    }
}
