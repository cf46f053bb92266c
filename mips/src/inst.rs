use crate::{reg::FReg, reg::Reg, syscall::Syscall};
use std::fmt;

/// The subset of MIPS32 (plus MARS pseudo instructions) that the emitter uses.
/// Memory operands are always labels in the `.data` section.
#[derive(Debug, Clone, PartialEq)]
pub enum Inst {
    Label(String),

    LI(Reg, i32),
    LA(Reg, String),
    LW(Reg, String),
    SW(Reg, String),
    LB(Reg, String),
    SB(Reg, String),

    ADD(Reg, Reg, Reg),
    SUB(Reg, Reg, Reg),
    MUL(Reg, Reg, Reg),
    DIV(Reg, Reg),
    MFLO(Reg),
    MFHI(Reg),

    SEQ(Reg, Reg, Reg),
    SNE(Reg, Reg, Reg),
    SLT(Reg, Reg, Reg),
    SLE(Reg, Reg, Reg),
    SGT(Reg, Reg, Reg),
    SGE(Reg, Reg, Reg),
    MOVT(Reg, Reg),

    LS(FReg, String),
    SS(FReg, String),
    ADDS(FReg, FReg, FReg),
    SUBS(FReg, FReg, FReg),
    MULS(FReg, FReg, FReg),
    DIVS(FReg, FReg, FReg),
    CEQS(FReg, FReg),
    CLTS(FReg, FReg),
    CLES(FReg, FReg),

    BNE(Reg, Reg, String),
    J(String),
    SYSCALL,
}

impl Inst {
    /// `li $v0, <service>` followed by `syscall`.
    pub fn syscall(service: Syscall) -> [Inst; 2] {
        [Inst::LI(Reg::V0, service.into()), Inst::SYSCALL]
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Inst::Label(_) => "",
            Inst::LI(..) => "li",
            Inst::LA(..) => "la",
            Inst::LW(..) => "lw",
            Inst::SW(..) => "sw",
            Inst::LB(..) => "lb",
            Inst::SB(..) => "sb",
            Inst::ADD(..) => "add",
            Inst::SUB(..) => "sub",
            Inst::MUL(..) => "mul",
            Inst::DIV(..) => "div",
            Inst::MFLO(..) => "mflo",
            Inst::MFHI(..) => "mfhi",
            Inst::SEQ(..) => "seq",
            Inst::SNE(..) => "sne",
            Inst::SLT(..) => "slt",
            Inst::SLE(..) => "sle",
            Inst::SGT(..) => "sgt",
            Inst::SGE(..) => "sge",
            Inst::MOVT(..) => "movt",
            Inst::LS(..) => "l.s",
            Inst::SS(..) => "s.s",
            Inst::ADDS(..) => "add.s",
            Inst::SUBS(..) => "sub.s",
            Inst::MULS(..) => "mul.s",
            Inst::DIVS(..) => "div.s",
            Inst::CEQS(..) => "c.eq.s",
            Inst::CLTS(..) => "c.lt.s",
            Inst::CLES(..) => "c.le.s",
            Inst::BNE(..) => "bne",
            Inst::J(..) => "j",
            Inst::SYSCALL => "syscall",
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        macro_rules! ops {
            ($($arg:expr),*) => {{
                let args: Vec<String> = vec![$($arg.to_string()),*];
                write!(f, "    {} {}", self.mnemonic(), args.join(", "))
            }};
        }

        match self {
            Inst::Label(name) => write!(f, "{}:", name),
            Inst::SYSCALL => write!(f, "    {}", self.mnemonic()),

            Inst::LI(rd, imm) => ops!(rd, imm),
            Inst::LA(rd, label)
            | Inst::LW(rd, label)
            | Inst::SW(rd, label)
            | Inst::LB(rd, label)
            | Inst::SB(rd, label) => ops!(rd, label),

            Inst::ADD(rd, rs, rt)
            | Inst::SUB(rd, rs, rt)
            | Inst::MUL(rd, rs, rt)
            | Inst::SEQ(rd, rs, rt)
            | Inst::SNE(rd, rs, rt)
            | Inst::SLT(rd, rs, rt)
            | Inst::SLE(rd, rs, rt)
            | Inst::SGT(rd, rs, rt)
            | Inst::SGE(rd, rs, rt) => ops!(rd, rs, rt),
            Inst::DIV(rs, rt) | Inst::MOVT(rs, rt) => ops!(rs, rt),
            Inst::MFLO(rd) | Inst::MFHI(rd) => ops!(rd),

            Inst::LS(fd, label) | Inst::SS(fd, label) => ops!(fd, label),
            Inst::ADDS(fd, fs, ft)
            | Inst::SUBS(fd, fs, ft)
            | Inst::MULS(fd, fs, ft)
            | Inst::DIVS(fd, fs, ft) => ops!(fd, fs, ft),
            Inst::CEQS(fs, ft) | Inst::CLTS(fs, ft) | Inst::CLES(fs, ft) => ops!(fs, ft),

            Inst::BNE(rs, rt, label) => ops!(rs, rt, label),
            Inst::J(label) => ops!(label),
        }
    }
}

#[test]
fn test() {
    assert_eq!(Inst::LI(Reg::T0, 5).to_string(), "    li $t0, 5");
    assert_eq!(Inst::SW(Reg::T0, "t1".into()).to_string(), "    sw $t0, t1");
    assert_eq!(
        Inst::ADD(Reg::T2, Reg::T0, Reg::T1).to_string(),
        "    add $t2, $t0, $t1"
    );
    assert_eq!(Inst::DIV(Reg::T0, Reg::T1).to_string(), "    div $t0, $t1");
    assert_eq!(
        Inst::CLTS(FReg::F0, FReg::F1).to_string(),
        "    c.lt.s $f0, $f1"
    );
    assert_eq!(Inst::Label("L1".into()).to_string(), "L1:");
    assert_eq!(Inst::SYSCALL.to_string(), "    syscall");
    assert_eq!(
        Inst::syscall(Syscall::Exit),
        [Inst::LI(Reg::V0, 10), Inst::SYSCALL]
    );
}
