use super::Generator;
use crate::{
    ast::{BinaryOp, Expr, ExprKind, Ident, UnaryOp},
    error::InternalError,
    symbols::{Storage, SymbolKind},
};
use arch::{next_label, Addr, Directive, Inst, Reg, WORD};

impl<'a> Generator<'a> {
    /// Push the value of `expr`.
    pub fn gen_expr(&mut self, expr: &Expr) -> Result<(), InternalError> {
        match &expr.kind {
            ExprKind::IntLit(value, _) => {
                self.code.inst(Inst::LI(Reg::T0, *value));
                self.code.push(Reg::T0);
            }

            ExprKind::StrLit(text, _) => {
                let label = next_label();
                self.code.directive(Directive::Data);
                self.code
                    .directive(Directive::Asciiz(label.clone(), text.clone()));
                self.code.directive(Directive::Text);
                self.code.inst(Inst::LA(Reg::T0, Addr::Label(label)));
                self.code.push(Reg::T0);
            }

            ExprKind::True(_) => {
                self.code.inst(Inst::LI(Reg::T0, 1));
                self.code.push(Reg::T0);
            }

            ExprKind::False(_) => {
                self.code.inst(Inst::LI(Reg::T0, 0));
                self.code.push(Reg::T0);
            }

            ExprKind::Ident(id) => self.gen_ident(id)?,

            ExprKind::Member(_, field) => {
                self.code
                    .comment(format!("field {}: no field layout", field.name));
                self.code.push(Reg::ZERO);
            }

            ExprKind::Assign(lhs, rhs) => {
                self.gen_expr(rhs)?;
                self.gen_addr(lhs)?;
                self.code.pop(Reg::T1);
                self.code.pop(Reg::T0);
                self.code.inst(Inst::SW(Reg::T0, Addr::Indexed(0, Reg::T1)));
                self.code.push(Reg::T0);
            }

            ExprKind::Call(callee, args) => self.gen_call(callee, args)?,

            ExprKind::Unary(op, operand) => {
                self.gen_expr(operand)?;
                self.code.pop(Reg::T0);
                match op {
                    UnaryOp::Neg => self.code.inst(Inst::SUBU(Reg::T0, Reg::ZERO, Reg::T0)),
                    UnaryOp::Not => self.code.inst(Inst::XORI(Reg::T0, Reg::T0, 1)),
                }
                self.code.push(Reg::T0);
            }

            ExprKind::Binary(op, lhs, rhs) => self.gen_binary(*op, lhs, rhs)?,
        }
        Ok(())
    }

    /// Push the address of the location `expr`.
    pub fn gen_addr(&mut self, expr: &Expr) -> Result<(), InternalError> {
        match &expr.kind {
            ExprKind::Ident(id) => {
                let symbol = self.symbol(id)?;
                let addr = match &symbol.storage {
                    Storage::Global(label) => Addr::Label(label.clone()),
                    Storage::Frame(offset) => Addr::Indexed(*offset, Reg::FP),
                    Storage::None => {
                        self.code
                            .comment(format!("{} has no storage", id.name));
                        self.code.push(Reg::ZERO);
                        return Ok(());
                    }
                };
                self.code.inst(Inst::LA(Reg::T0, addr));
                self.code.push(Reg::T0);
            }
            ExprKind::Member(_, field) => {
                self.code
                    .comment(format!("field {}: no field layout", field.name));
                self.code.push(Reg::ZERO);
            }
            _ => return Err(InternalError::UnexpectedNode("expression is not a location")),
        }
        Ok(())
    }

    fn gen_ident(&mut self, id: &Ident) -> Result<(), InternalError> {
        let symbol = self.symbol(id)?;
        match (&symbol.kind, &symbol.storage) {
            (SymbolKind::Func { .. }, Storage::Global(label)) => {
                self.code.inst(Inst::LA(Reg::T0, Addr::Label(label.clone())));
            }
            (_, Storage::Global(label)) => {
                self.code.inst(Inst::LW(Reg::T0, Addr::Label(label.clone())));
            }
            (_, Storage::Frame(offset)) => {
                self.code
                    .inst(Inst::LW(Reg::T0, Addr::Indexed(*offset, Reg::FP)));
            }
            (_, Storage::None) => {
                self.code
                    .inst_with_comment(Inst::LI(Reg::T0, 0), format!("{} has no storage", id.name));
            }
        }
        self.code.push(Reg::T0);
        Ok(())
    }

    /// Actuals are pushed left to right; the callee's epilogue pops them.
    fn gen_call(&mut self, callee: &Ident, args: &[Expr]) -> Result<(), InternalError> {
        for arg in args {
            self.gen_expr(arg)?;
        }
        let symbol = self.symbol(callee)?;
        match (&symbol.kind, symbol.label()) {
            (SymbolKind::Func { .. }, Some(label)) => {
                self.code.inst(Inst::JAL(label.to_string()));
                self.code.push(Reg::V0);
            }
            _ => {
                self.code
                    .comment(format!("{} is not a function", callee.name));
                if !args.is_empty() {
                    self.code
                        .inst(Inst::ADDUI(Reg::SP, Reg::SP, WORD * args.len() as i32));
                }
                self.code.push(Reg::ZERO);
            }
        }
        Ok(())
    }

    fn gen_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Result<(), InternalError> {
        let arith = match op {
            BinaryOp::And | BinaryOp::Or => return self.gen_short_circuit(op, lhs, rhs),
            BinaryOp::Eq | BinaryOp::Ne => return self.gen_equality(op, lhs, rhs),
            BinaryOp::Add => Inst::ADDU(Reg::T0, Reg::T0, Reg::T1),
            BinaryOp::Sub => Inst::SUBU(Reg::T0, Reg::T0, Reg::T1),
            BinaryOp::Mul => Inst::MUL(Reg::T0, Reg::T0, Reg::T1),
            BinaryOp::Div => Inst::DIV(Reg::T0, Reg::T0, Reg::T1),
            BinaryOp::Lt => Inst::SLT(Reg::T0, Reg::T0, Reg::T1),
            BinaryOp::Gt => Inst::SGT(Reg::T0, Reg::T0, Reg::T1),
            BinaryOp::Le => Inst::SLE(Reg::T0, Reg::T0, Reg::T1),
            BinaryOp::Ge => Inst::SGE(Reg::T0, Reg::T0, Reg::T1),
        };
        self.gen_expr(lhs)?;
        self.gen_expr(rhs)?;
        self.code.pop(Reg::T1);
        self.code.pop(Reg::T0);
        self.code.inst(arith);
        self.code.push(Reg::T0);
        Ok(())
    }

    /// The right operand is skipped once the left one decides the result.
    fn gen_short_circuit(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<(), InternalError> {
        let end = next_label();
        self.gen_expr(lhs)?;
        self.code.pop(Reg::T0);
        match op {
            BinaryOp::Or => self.code.inst(Inst::BNE(Reg::T0, Reg::ZERO, end.clone())),
            _ => self.code.inst(Inst::BEQ(Reg::T0, Reg::ZERO, end.clone())),
        }
        self.gen_expr(rhs)?;
        self.code.pop(Reg::T0);
        self.code.label(end);
        self.code.push(Reg::T0);
        Ok(())
    }

    fn gen_equality(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Result<(), InternalError> {
        let strings = self.types.get(lhs.id)?.is_string();
        self.gen_expr(lhs)?;
        self.gen_expr(rhs)?;
        self.code.pop(Reg::T1);
        self.code.pop(Reg::T0);

        let end = next_label();
        if strings {
            self.gen_string_compare(op, &end);
        } else {
            self.code.inst(Inst::LI(Reg::T2, 1));
            match op {
                BinaryOp::Ne => self.code.inst(Inst::BNE(Reg::T0, Reg::T1, end.clone())),
                _ => self.code.inst(Inst::BEQ(Reg::T0, Reg::T1, end.clone())),
            }
            self.code.inst(Inst::LI(Reg::T2, 0));
        }
        self.code.label(end);
        self.code.push(Reg::T2);
        Ok(())
    }

    /// Byte loop over the strings at `$t0` and `$t1`. Leaves 1/0 in `$t2`.
    fn gen_string_compare(&mut self, op: BinaryOp, end: &str) {
        let equal = if op == BinaryOp::Ne { 0 } else { 1 };
        let head = next_label();
        let differ = next_label();
        let same = next_label();

        self.code.label_with_comment(head.clone(), "string compare");
        self.code.inst(Inst::LB(Reg::V0, Addr::Indexed(0, Reg::T0)));
        self.code.inst(Inst::LB(Reg::V1, Addr::Indexed(0, Reg::T1)));
        self.code.inst(Inst::BNE(Reg::V0, Reg::V1, differ.clone()));
        self.code.inst(Inst::BEQ(Reg::V0, Reg::ZERO, same.clone()));
        self.code.inst(Inst::ADDI(Reg::T0, Reg::T0, 1));
        self.code.inst(Inst::ADDI(Reg::T1, Reg::T1, 1));
        self.code.inst(Inst::J(head));

        self.code.label(differ);
        self.code.inst(Inst::LI(Reg::T2, 1 - equal));
        self.code.inst(Inst::J(end.to_string()));

        self.code.label(same);
        self.code.inst(Inst::LI(Reg::T2, equal));
    }
}
