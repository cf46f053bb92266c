use bimap::BiMap;
use once_cell::sync::Lazy;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Token { kind, pos }
    }
}

/// 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Double character tokens
    EqualEqual,  // '=='
    ExclEqual,   // '!='
    RAngleEqual, // '>='
    LAngleEqual, // '<='

    // Single character tokens
    Equal,     // '='
    Plus,      // '+'
    Minus,     // '-'
    Star,      // '*'
    Slash,     // '/'
    Percent,   // '%'
    Semicolon, // ';'
    Comma,     // ','
    LParen,    // '('
    RParen,    // ')'
    LBracket,  // '['
    RBracket,  // ']'
    LCurly,    // '{'
    RCurly,    // '}'
    LAngle,    // '<'
    RAngle,    // '>'

    Kw(Keyword),

    // Identifier
    Ident(String),

    // Literals
    Int(i32),
    Float(f64),
    Text(String),
    Char(char),
    Bool(bool),

    // One per source line
    Newline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Func,
    Int,
    String,
    Char,
    Float,
    Bool,
    Global,
    Return,
    If,
    Else,
    For,
    While,
    Write,
}

pub static KEYWORDS: Lazy<BiMap<&'static str, Keyword>> = Lazy::new(|| {
    BiMap::from_iter([
        ("func", Keyword::Func),
        ("int", Keyword::Int),
        ("string", Keyword::String),
        ("char", Keyword::Char),
        ("float", Keyword::Float),
        ("bool", Keyword::Bool),
        ("global", Keyword::Global),
        ("return", Keyword::Return),
        ("if", Keyword::If),
        ("else", Keyword::Else),
        ("for", Keyword::For),
        ("while", Keyword::While),
        ("write", Keyword::Write),
    ])
});

impl Keyword {
    pub fn parse(s: &str) -> Option<Self> {
        KEYWORDS.get_by_left(s).copied()
    }

    /// Keywords that start a declaration of a scalar.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Keyword::Int | Keyword::String | Keyword::Char | Keyword::Float | Keyword::Bool
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match KEYWORDS.get_by_right(self) {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "{:?}", self),
        }
    }
}

impl TokenKind {
    pub fn is_open(&self) -> bool {
        matches!(self, TokenKind::LParen | TokenKind::LBracket | TokenKind::LCurly)
    }

    pub fn is_close(&self) -> bool {
        matches!(self, TokenKind::RParen | TokenKind::RBracket | TokenKind::RCurly)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        match self {
            EqualEqual => write!(f, "'=='"),
            ExclEqual => write!(f, "'!='"),
            RAngleEqual => write!(f, "'>='"),
            LAngleEqual => write!(f, "'<='"),
            Equal => write!(f, "'='"),
            Plus => write!(f, "'+'"),
            Minus => write!(f, "'-'"),
            Star => write!(f, "'*'"),
            Slash => write!(f, "'/'"),
            Percent => write!(f, "'%'"),
            Semicolon => write!(f, "';'"),
            Comma => write!(f, "','"),
            LParen => write!(f, "'('"),
            RParen => write!(f, "')'"),
            LBracket => write!(f, "'['"),
            RBracket => write!(f, "']'"),
            LCurly => write!(f, "'{{'"),
            RCurly => write!(f, "'}}'"),
            LAngle => write!(f, "'<'"),
            RAngle => write!(f, "'>'"),
            Kw(kw) => write!(f, "keyword '{}'", kw),
            Ident(name) => write!(f, "identifier '{}'", name),
            Int(v) => write!(f, "'{}'", v),
            Float(v) => write!(f, "'{:?}'", v),
            Text(s) => write!(f, "{:?}", s),
            Char(c) => write!(f, "{:?}", c),
            Bool(true) => write!(f, "'True'"),
            Bool(false) => write!(f, "'False'"),
            Newline => write!(f, "end of line"),
        }
    }
}
