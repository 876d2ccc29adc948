use num_enum::IntoPrimitive;
use strum::Display;

/// Service numbers loaded into `$v0` before `syscall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, Display)]
#[repr(i32)]
pub enum Syscall {
    PrintInt = 1,
    PrintString = 4,
    ReadInt = 5,
    Exit = 10,
}

impl Syscall {
    pub fn code(self) -> i32 {
        self.into()
    }
}

#[test]
fn test() {
    assert_eq!(Syscall::PrintInt.code(), 1);
    assert_eq!(Syscall::PrintString.code(), 4);
    assert_eq!(Syscall::ReadInt.code(), 5);
    assert_eq!(Syscall::Exit.code(), 10);
}
