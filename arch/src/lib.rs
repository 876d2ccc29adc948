pub mod code;
pub mod inst;
pub mod reg;
pub mod syscall;

pub use code::{next_label, quote, Code, Directive, Line};
pub use inst::{Addr, Inst};
pub use reg::Reg;
pub use syscall::Syscall;

/// Bytes per machine word.
pub const WORD: i32 = 4;
