use crate::{data::DataDecl, inst::Inst};
use std::fmt;

/// A complete single-file program: `.data`, then `.text` entered at `main`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub data: Vec<DataDecl>,
    pub text: Vec<Inst>,
}

impl Program {
    pub fn new(data: Vec<DataDecl>, text: Vec<Inst>) -> Self {
        Self { data, text }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ".data")?;
        for decl in &self.data {
            writeln!(f, "{}", decl)?;
        }
        writeln!(f)?;
        writeln!(f, ".text")?;
        writeln!(f, "main:")?;
        for inst in &self.text {
            writeln!(f, "{}", inst)?;
        }
        Ok(())
    }
}

#[test]
fn test() {
    use crate::{data::Directive, reg::Reg, syscall::Syscall};
    let mut text = vec![Inst::LI(Reg::T0, 5), Inst::SW(Reg::T0, "t1".into())];
    text.extend(Inst::syscall(Syscall::Exit));
    let prog = Program::new(vec![DataDecl::new("t1", Directive::Word(0))], text);
    assert_eq!(
        prog.to_string(),
        ".data\nt1: .word 0\n\n.text\nmain:\n    li $t0, 5\n    sw $t0, t1\n    li $v0, 10\n    syscall\n"
    );
}
