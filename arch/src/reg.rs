use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::Display;

/// Registers of the target machine, numbered as the hardware numbers them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    TryFromPrimitive,
    IntoPrimitive,
    Display,
)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum Reg {
    #[default]
    ZERO = 0,
    V0 = 2,
    V1 = 3,
    A0 = 4,
    T0 = 8,
    T1 = 9,
    T2 = 10,
    SP = 29,
    FP = 30,
    RA = 31,
}

impl Reg {
    /// Assembly spelling, e.g. `$t0`.
    pub fn asm(self) -> String {
        format!("${self}")
    }
}
