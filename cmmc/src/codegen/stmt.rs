use super::Generator;
use crate::{
    ast::{Block, Expr, Stmt},
    error::InternalError,
};
use arch::{next_label, Addr, Inst, Reg, Syscall};

impl<'a> Generator<'a> {
    /// Locals already have frame slots, so only statements emit code.
    pub fn gen_block(&mut self, block: &Block) -> Result<(), InternalError> {
        for stmt in &block.stmts {
            self.gen_stmt(stmt)?;
        }
        Ok(())
    }

    pub fn gen_stmt(&mut self, stmt: &Stmt) -> Result<(), InternalError> {
        match stmt {
            Stmt::Assign(e) | Stmt::Call(e) => {
                self.gen_expr(e)?;
                self.code.pop(Reg::T0);
            }

            Stmt::PostInc(e) | Stmt::PostDec(e) => {
                let step = if matches!(stmt, Stmt::PostInc(_)) { 1 } else { -1 };
                self.gen_expr(e)?;
                self.gen_addr(e)?;
                self.code.pop(Reg::T1);
                self.code.pop(Reg::T0);
                self.code.inst(Inst::ADDI(Reg::T0, Reg::T0, step));
                self.code.inst(Inst::SW(Reg::T0, Addr::Indexed(0, Reg::T1)));
            }

            Stmt::Read(e) => {
                self.code
                    .inst_with_comment(Inst::LI(Reg::V0, Syscall::ReadInt.code()), "read");
                self.code.inst(Inst::SYSCALL());
                self.gen_addr(e)?;
                self.code.pop(Reg::T0);
                self.code.inst(Inst::SW(Reg::V0, Addr::Indexed(0, Reg::T0)));
            }

            Stmt::Write(e) => {
                let call = if self.types.get(e.id)?.is_string() {
                    Syscall::PrintString
                } else {
                    Syscall::PrintInt
                };
                self.gen_expr(e)?;
                self.code.pop(Reg::A0);
                self.code
                    .inst_with_comment(Inst::LI(Reg::V0, call.code()), "write");
                self.code.inst(Inst::SYSCALL());
            }

            Stmt::If(cond, body) => {
                let end = next_label();
                self.gen_cond(cond, &end)?;
                self.gen_block(body)?;
                self.code.label(end);
            }

            Stmt::IfElse(cond, then, els) => {
                let other = next_label();
                let end = next_label();
                self.gen_cond(cond, &other)?;
                self.gen_block(then)?;
                self.code.inst(Inst::J(end.clone()));
                self.code.label(other);
                self.gen_block(els)?;
                self.code.label(end);
            }

            Stmt::While(cond, body) => {
                let head = next_label();
                let end = next_label();
                self.code.label(head.clone());
                self.gen_cond(cond, &end)?;
                self.gen_block(body)?;
                self.code.inst(Inst::J(head));
                self.code.label(end);
            }

            Stmt::Return(value, _) => {
                let exit = self
                    .exit
                    .clone()
                    .ok_or(InternalError::UnexpectedNode("return outside a function"))?;
                if let Some(e) = value {
                    self.gen_expr(e)?;
                    self.code.pop(Reg::V0);
                }
                self.code.inst(Inst::J(exit));
            }
        }
        Ok(())
    }

    /// Evaluate `cond` and branch to `target` when it is false.
    fn gen_cond(&mut self, cond: &Expr, target: &str) -> Result<(), InternalError> {
        self.gen_expr(cond)?;
        self.code.pop(Reg::T0);
        self.code
            .inst(Inst::BEQ(Reg::T0, Reg::ZERO, target.to_string()));
        Ok(())
    }
}
