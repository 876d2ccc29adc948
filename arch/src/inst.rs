use crate::reg::Reg;

use color_print::cformat;
use std::fmt;

/// Memory operand: a data label or `offset(base)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addr {
    Label(String),
    Indexed(i32, Reg),
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addr::Label(name) => write!(f, "{name}"),
            Addr::Indexed(offset, base) => write!(f, "{}({})", offset, base.asm()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    LI(Reg, i32),
    LA(Reg, Addr),
    LW(Reg, Addr),
    LB(Reg, Addr),
    SW(Reg, Addr),
    MOVE(Reg, Reg),

    ADDU(Reg, Reg, Reg),
    ADDUI(Reg, Reg, i32),
    ADDI(Reg, Reg, i32),
    SUBU(Reg, Reg, Reg),
    SUBUI(Reg, Reg, i32),
    MUL(Reg, Reg, Reg),
    DIV(Reg, Reg, Reg),
    XORI(Reg, Reg, i32),

    SLT(Reg, Reg, Reg),
    SGT(Reg, Reg, Reg),
    SLE(Reg, Reg, Reg),
    SGE(Reg, Reg, Reg),

    BEQ(Reg, Reg, String),
    BNE(Reg, Reg, String),
    J(String),
    JAL(String),
    JR(Reg),
    SYSCALL(),
}

impl Inst {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Inst::LI(..) => "li",
            Inst::LA(..) => "la",
            Inst::LW(..) => "lw",
            Inst::LB(..) => "lb",
            Inst::SW(..) => "sw",
            Inst::MOVE(..) => "move",
            Inst::ADDU(..) | Inst::ADDUI(..) => "addu",
            Inst::ADDI(..) => "addi",
            Inst::SUBU(..) | Inst::SUBUI(..) => "subu",
            Inst::MUL(..) => "mul",
            Inst::DIV(..) => "div",
            Inst::XORI(..) => "xori",
            Inst::SLT(..) => "slt",
            Inst::SGT(..) => "sgt",
            Inst::SLE(..) => "sle",
            Inst::SGE(..) => "sge",
            Inst::BEQ(..) => "beq",
            Inst::BNE(..) => "bne",
            Inst::J(..) => "j",
            Inst::JAL(..) => "jal",
            Inst::JR(..) => "jr",
            Inst::SYSCALL() => "syscall",
        }
    }

    pub fn operands(&self) -> Vec<String> {
        match self {
            Inst::LI(rd, imm) => vec![rd.asm(), imm.to_string()],
            Inst::LA(rd, addr)
            | Inst::LW(rd, addr)
            | Inst::LB(rd, addr)
            | Inst::SW(rd, addr) => vec![rd.asm(), addr.to_string()],
            Inst::MOVE(rd, rs) => vec![rd.asm(), rs.asm()],
            Inst::ADDU(rd, rs1, rs2)
            | Inst::SUBU(rd, rs1, rs2)
            | Inst::MUL(rd, rs1, rs2)
            | Inst::DIV(rd, rs1, rs2)
            | Inst::SLT(rd, rs1, rs2)
            | Inst::SGT(rd, rs1, rs2)
            | Inst::SLE(rd, rs1, rs2)
            | Inst::SGE(rd, rs1, rs2) => vec![rd.asm(), rs1.asm(), rs2.asm()],
            Inst::ADDUI(rd, rs, imm)
            | Inst::ADDI(rd, rs, imm)
            | Inst::SUBUI(rd, rs, imm)
            | Inst::XORI(rd, rs, imm) => vec![rd.asm(), rs.asm(), imm.to_string()],
            Inst::BEQ(rs1, rs2, label) | Inst::BNE(rs1, rs2, label) => {
                vec![rs1.asm(), rs2.asm(), label.clone()]
            }
            Inst::J(label) | Inst::JAL(label) => vec![label.clone()],
            Inst::JR(rs) => vec![rs.asm()],
            Inst::SYSCALL() => vec![],
        }
    }

    /// Label this instruction may transfer control to.
    pub fn target(&self) -> Option<&str> {
        match self {
            Inst::BEQ(_, _, label) | Inst::BNE(_, _, label) | Inst::J(label) => Some(label),
            _ => None,
        }
    }

    pub fn cformat(&self) -> String {
        cformat!(
            "<r>{:<8}</><b>{}</>",
            self.mnemonic(),
            self.operands().join(", ")
        )
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self.operands();
        if operands.is_empty() {
            write!(f, "{}", self.mnemonic())
        } else {
            write!(f, "{:<8}{}", self.mnemonic(), operands.join(", "))
        }
    }
}
