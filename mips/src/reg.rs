use strum::Display;

/// General purpose registers touched by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Reg {
    #[strum(serialize = "$zero")]
    Zero,
    #[strum(serialize = "$v0")]
    V0,
    #[strum(serialize = "$a0")]
    A0,
    #[strum(serialize = "$t0")]
    T0,
    #[strum(serialize = "$t1")]
    T1,
    #[strum(serialize = "$t2")]
    T2,
}

/// Coprocessor 1 registers. `$f12` carries the float syscall argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FReg {
    #[strum(serialize = "$f0")]
    F0,
    #[strum(serialize = "$f1")]
    F1,
    #[strum(serialize = "$f2")]
    F2,
    #[strum(serialize = "$f12")]
    F12,
}

#[test]
fn test() {
    assert_eq!(Reg::T0.to_string(), "$t0");
    assert_eq!(FReg::F12.to_string(), "$f12");
    assert_eq!(Reg::Zero.to_string(), "$zero");
    assert_eq!(FReg::F2.to_string(), "$f2");
}
