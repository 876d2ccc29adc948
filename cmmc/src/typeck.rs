//! Type checking over a resolved tree.

use crate::{
    ast::{BinaryOp, Block, Decl, Expr, ExprId, ExprKind, Ident, Program, Stmt, UnaryOp},
    diag::Diagnostics,
    error::{InternalError, SemanticError},
    symbols::{SymbolKind, Symbols},
    types::Type,
};
use std::collections::HashMap;

/// Type of every checked expression, keyed by expression id.
#[derive(Debug, Clone, Default)]
pub struct TypeTable(HashMap<ExprId, Type>);

impl TypeTable {
    pub fn get(&self, id: ExprId) -> Result<&Type, InternalError> {
        self.0.get(&id).ok_or(InternalError::MissingType(id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, id: ExprId, ty: Type) {
        self.0.insert(id, ty);
    }
}

pub fn check(
    program: &Program,
    symbols: &Symbols,
    diags: &mut Diagnostics,
) -> Result<TypeTable, InternalError> {
    let mut checker = Checker {
        symbols,
        diags,
        table: TypeTable::default(),
    };
    for decl in &program.decls {
        if let Decl::Func(func) = decl {
            checker.check_block(&func.body, &func.ret.to_type())?;
        }
    }
    Ok(checker.table)
}

struct Checker<'a, 'd> {
    symbols: &'a Symbols,
    diags: &'d mut Diagnostics,
    table: TypeTable,
}

impl<'a, 'd> Checker<'a, 'd> {
    fn report(&mut self, expr: &Expr, error: SemanticError) {
        self.diags.report(expr.pos(), error);
    }

    fn check_block(&mut self, block: &Block, ret: &Type) -> Result<(), InternalError> {
        for stmt in &block.stmts {
            self.check_stmt(stmt, ret)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt, ret: &Type) -> Result<(), InternalError> {
        match stmt {
            Stmt::Assign(e) | Stmt::Call(e) => {
                self.check_expr(e)?;
            }
            Stmt::PostInc(e) | Stmt::PostDec(e) => {
                let ty = self.check_expr(e)?;
                if !ty.is_error() && !ty.is_int() {
                    self.report(e, SemanticError::ArithmeticNonNumeric);
                }
            }
            Stmt::Read(e) => {
                let ty = self.check_expr(e)?;
                if ty.is_func() {
                    self.report(e, SemanticError::ReadFunction);
                } else if ty.is_struct_def() {
                    self.report(e, SemanticError::ReadStructName);
                } else if ty.is_struct_var() {
                    self.report(e, SemanticError::ReadStructVariable);
                }
            }
            Stmt::Write(e) => {
                let ty = self.check_expr(e)?;
                if ty.is_func() {
                    self.report(e, SemanticError::WriteFunction);
                } else if ty.is_struct_def() {
                    self.report(e, SemanticError::WriteStructName);
                } else if ty.is_struct_var() {
                    self.report(e, SemanticError::WriteStructVariable);
                } else if ty.is_void() {
                    self.report(e, SemanticError::WriteVoid);
                }
            }
            Stmt::If(cond, body) => {
                self.check_cond(cond, SemanticError::NonBoolIfCondition)?;
                self.check_block(body, ret)?;
            }
            Stmt::IfElse(cond, then, els) => {
                self.check_cond(cond, SemanticError::NonBoolIfCondition)?;
                self.check_block(then, ret)?;
                self.check_block(els, ret)?;
            }
            Stmt::While(cond, body) => {
                self.check_cond(cond, SemanticError::NonBoolWhileCondition)?;
                self.check_block(body, ret)?;
            }
            Stmt::Return(Some(e), _) => {
                let ty = self.check_expr(e)?;
                if ret.is_void() {
                    self.report(e, SemanticError::ReturnValueInVoid);
                } else if !ret.is_error() && !ty.is_error() && *ret != ty {
                    self.report(e, SemanticError::BadReturnValue);
                }
            }
            Stmt::Return(None, pos) => {
                if !ret.is_void() {
                    self.diags.report(*pos, SemanticError::MissingReturnValue);
                }
            }
        }
        Ok(())
    }

    fn check_cond(&mut self, cond: &Expr, error: SemanticError) -> Result<(), InternalError> {
        let ty = self.check_expr(cond)?;
        if !ty.is_error() && !ty.is_bool() {
            self.report(cond, error);
        }
        Ok(())
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<Type, InternalError> {
        let ty = match &expr.kind {
            ExprKind::IntLit(..) => Type::Int,
            ExprKind::StrLit(..) => Type::String,
            ExprKind::True(_) | ExprKind::False(_) => Type::Bool,
            ExprKind::Ident(id) => self.ident_type(id),
            ExprKind::Member(base, field) => {
                self.check_expr(base)?;
                self.ident_type(field)
            }
            ExprKind::Assign(lhs, rhs) => self.check_assign(expr, lhs, rhs)?,
            ExprKind::Call(callee, args) => self.check_call(callee, args)?,
            ExprKind::Unary(op, operand) => {
                let (want, error) = match op {
                    UnaryOp::Neg => (Type::Int, SemanticError::ArithmeticNonNumeric),
                    UnaryOp::Not => (Type::Bool, SemanticError::LogicalNonBool),
                };
                if self.check_operand(operand, want.clone(), error)? {
                    want
                } else {
                    Type::Error
                }
            }
            ExprKind::Binary(op, lhs, rhs) => self.check_binary(expr, *op, lhs, rhs)?,
        };
        self.table.insert(expr.id, ty.clone());
        Ok(ty)
    }

    /// Unlinked names were already reported by name resolution.
    fn ident_type(&self, id: &Ident) -> Type {
        id.sym
            .and_then(|sym| self.symbols.get(sym))
            .map(|sym| sym.ty.clone())
            .unwrap_or(Type::Error)
    }

    /// True when `operand` has the wanted type.
    fn check_operand(
        &mut self,
        operand: &Expr,
        want: Type,
        error: SemanticError,
    ) -> Result<bool, InternalError> {
        let ty = self.check_expr(operand)?;
        if ty.is_error() {
            return Ok(false);
        }
        if ty != want {
            self.report(operand, error);
            return Ok(false);
        }
        Ok(true)
    }

    fn check_binary(
        &mut self,
        expr: &Expr,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<Type, InternalError> {
        let (want, error, result) = match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                (Type::Int, SemanticError::ArithmeticNonNumeric, Type::Int)
            }
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => {
                (Type::Int, SemanticError::RelationalNonNumeric, Type::Bool)
            }
            BinaryOp::And | BinaryOp::Or => {
                (Type::Bool, SemanticError::LogicalNonBool, Type::Bool)
            }
            BinaryOp::Eq | BinaryOp::Ne => return self.check_equality(expr, lhs, rhs),
        };
        let left = self.check_operand(lhs, want.clone(), error)?;
        let right = self.check_operand(rhs, want, error)?;
        Ok(if left && right { result } else { Type::Error })
    }

    fn check_equality(&mut self, expr: &Expr, lhs: &Expr, rhs: &Expr) -> Result<Type, InternalError> {
        let left = self.check_expr(lhs)?;
        let right = self.check_expr(rhs)?;
        let error = if left.is_void() && right.is_void() {
            Some(SemanticError::EqualityVoidFunctions)
        } else if left.is_func() && right.is_func() {
            Some(SemanticError::EqualityFunctions)
        } else if left.is_struct_def() && right.is_struct_def() {
            Some(SemanticError::EqualityStructNames)
        } else if left.is_struct_var() && right.is_struct_var() {
            Some(SemanticError::EqualityStructVariables)
        } else if left != right && !left.is_error() && !right.is_error() {
            Some(SemanticError::TypeMismatch)
        } else {
            None
        };
        if let Some(error) = error {
            self.report(expr, error);
            return Ok(Type::Error);
        }
        if left.is_error() || right.is_error() {
            return Ok(Type::Error);
        }
        Ok(Type::Bool)
    }

    fn check_assign(&mut self, expr: &Expr, lhs: &Expr, rhs: &Expr) -> Result<Type, InternalError> {
        let left = self.check_expr(lhs)?;
        let right = self.check_expr(rhs)?;
        let error = if left.is_func() && right.is_func() {
            Some(SemanticError::FunctionAssignment)
        } else if left.is_struct_def() && right.is_struct_def() {
            Some(SemanticError::StructNameAssignment)
        } else if left.is_struct_var() && right.is_struct_var() {
            Some(SemanticError::StructVariableAssignment)
        } else if left != right && !left.is_error() && !right.is_error() {
            Some(SemanticError::TypeMismatch)
        } else {
            None
        };
        if let Some(error) = error {
            self.report(expr, error);
            return Ok(Type::Error);
        }
        if right.is_error() {
            return Ok(Type::Error);
        }
        Ok(left)
    }

    fn check_call(&mut self, callee: &Ident, args: &[Expr]) -> Result<Type, InternalError> {
        let mut actuals = Vec::with_capacity(args.len());
        for arg in args {
            actuals.push(self.check_expr(arg)?);
        }

        let ty = self.ident_type(callee);
        if ty.is_error() {
            return Ok(Type::Error);
        }
        if !ty.is_func() {
            self.diags.report(callee.pos, SemanticError::CallNonFunction);
            return Ok(Type::Error);
        }

        let symbol = callee
            .sym
            .and_then(|sym| self.symbols.get(sym))
            .ok_or_else(|| InternalError::UnlinkedReference(callee.name.clone()))?;
        let SymbolKind::Func { ret, params, .. } = &symbol.kind else {
            return Err(InternalError::UnexpectedSymbol {
                name: callee.name.clone(),
                expected: "function",
            });
        };

        if params.len() != args.len() {
            self.diags.report(callee.pos, SemanticError::WrongArgCount);
        } else {
            for ((arg, actual), formal) in args.iter().zip(&actuals).zip(params) {
                if !actual.is_error() && !formal.is_error() && actual != formal {
                    self.report(arg, SemanticError::ActualFormalMismatch);
                }
            }
        }
        Ok(ret.clone())
    }
}
