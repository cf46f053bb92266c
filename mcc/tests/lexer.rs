use mcc::grammer::token::{Keyword, TokenKind, TokenKind::*};
use mcc::{Error, Lexer, LineLexer};

fn assert(code: &str, expects: Vec<TokenKind>) {
    let tokens = LineLexer::new(code, 1).tokenize().unwrap();

    println!(" {code}");
    for token in &tokens {
        print!("\r\x1b[{}C^", token.pos.col + 1);
    }
    println!();
    for (idx, token) in tokens.iter().enumerate() {
        println!("{:>2}: {:?}", idx, token.kind);
    }

    assert_eq!(tokens.len(), expects.len());
    for (idx, expect) in expects.iter().enumerate() {
        assert_eq!(tokens[idx].kind, *expect);
    }
}

macro_rules! case {
    ($name:ident, $code:expr, $expects:expr) => {
        #[test]
        fn $name() {
            assert($code, $expects);
        }
    };
}

macro_rules! fails {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            let result = LineLexer::new($code, 7).tokenize();
            assert!(matches!(result, Err(Error::Lexical(7, _))), "{:?}", result);
        }
    };
}

case!(
    declaration,
    "int a = 2; // two",
    vec![Kw(Keyword::Int), Ident(format!("a")), Equal, Int(2), Semicolon]
);
case!(
    double_char_ops,
    "a==b!=c<=d>=e<f>g",
    vec![
        Ident(format!("a")),
        EqualEqual,
        Ident(format!("b")),
        ExclEqual,
        Ident(format!("c")),
        LAngleEqual,
        Ident(format!("d")),
        RAngleEqual,
        Ident(format!("e")),
        LAngle,
        Ident(format!("f")),
        RAngle,
        Ident(format!("g")),
    ]
);
case!(
    literals,
    "3.25 42 'x' '\\n' \"hi\\t\\\"there\\\"\" True False",
    vec![
        Float(3.25),
        Int(42),
        Char('x'),
        Char('\n'),
        Text(format!("hi\t\"there\"")),
        Bool(true),
        Bool(false),
    ]
);
case!(
    keywords,
    "func global return if else for while write string char float bool",
    vec![
        Kw(Keyword::Func),
        Kw(Keyword::Global),
        Kw(Keyword::Return),
        Kw(Keyword::If),
        Kw(Keyword::Else),
        Kw(Keyword::For),
        Kw(Keyword::While),
        Kw(Keyword::Write),
        Kw(Keyword::String),
        Kw(Keyword::Char),
        Kw(Keyword::Float),
        Kw(Keyword::Bool),
    ]
);
case!(
    array_declaration,
    "[ ] int xs = {1, 2};",
    vec![
        LBracket,
        RBracket,
        Kw(Keyword::Int),
        Ident(format!("xs")),
        Equal,
        LCurly,
        Int(1),
        Comma,
        Int(2),
        RCurly,
        Semicolon,
    ]
);
case!(keyword_prefix_is_ident, "integer", vec![Ident(format!("integer"))]);
case!(minus_is_separate, "-5", vec![Minus, Int(5)]);
case!(comment_only, "// nothing here", vec![]);

fails!(bang_alone, "a ! b");
fails!(ampersand, "a & b");
fails!(unterminated_string, "\"abc");
fails!(long_char, "'ab'");
fails!(int_overflow, "2147483648");

#[test]
fn newline_after_every_line() {
    let tokens = Lexer::new("int a;\n\nwrite(a);").tokenize().unwrap();
    let lines: Vec<usize> = tokens
        .iter()
        .filter(|t| t.kind == Newline)
        .map(|t| t.pos.line)
        .collect();
    assert_eq!(lines, vec![1, 2, 3]);
    assert_eq!(tokens.last().map(|t| &t.kind), Some(&Newline));
}
