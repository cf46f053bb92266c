use num_enum::IntoPrimitive;

/// SPIM/MARS syscall services, loaded into `$v0` before `syscall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(i32)]
pub enum Syscall {
    PrintInt = 1,
    PrintFloat = 2,
    PrintString = 4,
    Exit = 10,
    PrintChar = 11,
}

#[test]
fn test() {
    assert_eq!(i32::from(Syscall::PrintInt), 1);
    assert_eq!(i32::from(Syscall::Exit), 10);
    assert_eq!(i32::from(Syscall::PrintChar), 11);
}
