use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Word(i32),
    Float(f64),
    Byte(i8),
    Asciiz(String),
}

impl Directive {
    /// Word and float slots share 4 byte alignment and are laid out first.
    pub fn align(&self) -> u8 {
        match self {
            Directive::Word(_) | Directive::Float(_) => 0,
            Directive::Byte(_) => 1,
            Directive::Asciiz(_) => 2,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Word(v) => write!(f, ".word {}", v),
            Directive::Float(v) => write!(f, ".float {:?}", v),
            Directive::Byte(v) => write!(f, ".byte {}", v),
            Directive::Asciiz(s) => write!(f, ".asciiz \"{}\"", escape(s)),
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataDecl {
    pub label: String,
    pub directive: Directive,
}

impl DataDecl {
    pub fn new(label: impl Into<String>, directive: Directive) -> Self {
        Self {
            label: label.into(),
            directive,
        }
    }
}

impl fmt::Display for DataDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.directive)
    }
}

#[test]
fn test() {
    assert_eq!(DataDecl::new("t1", Directive::Word(0)).to_string(), "t1: .word 0");
    assert_eq!(
        DataDecl::new("flt_0", Directive::Float(1.0)).to_string(),
        "flt_0: .float 1.0"
    );
    assert_eq!(
        DataDecl::new("v_s", Directive::Asciiz("hi\n\"x\"".into())).to_string(),
        "v_s: .asciiz \"hi\\n\\\"x\\\"\""
    );
    assert!(Directive::Byte(0).align() > Directive::Float(0.0).align());
}
