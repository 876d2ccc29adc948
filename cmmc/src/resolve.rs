//! Name resolution.
//!
//! Links every identifier to its symbol, registers declarations and places
//! variables either in the data segment or in the current function frame.

use crate::{
    ast::{
        Block, Decl, Expr, ExprKind, FnDecl, FormalDecl, Ident, Program, Stmt, StructDecl,
        TypeSpec, VarDecl,
    },
    diag::Diagnostics,
    error::{InternalError, SemanticError},
    symbols::{Scope, ScopeStack, Storage, Symbol, SymbolId, SymbolKind, Symbols},
    types::Type,
};
use arch::WORD;

/// Resolve `program` in place. User errors go to `diags`.
pub fn resolve(program: &mut Program, diags: &mut Diagnostics) -> Result<Symbols, InternalError> {
    let mut resolver = Resolver::new(diags);
    resolver.scopes.push();
    for decl in &mut program.decls {
        resolver.resolve_decl(decl)?;
    }
    resolver.scopes.pop()?;
    Ok(resolver.symbols)
}

/// Slot counters of the function being resolved.
#[derive(Debug, Default)]
struct Frame {
    formals: usize,
    locals: usize,
}

impl Frame {
    // formal i: -4i
    fn next_formal(&mut self) -> i32 {
        let offset = -WORD * self.formals as i32;
        self.formals += 1;
        offset
    }

    // local j: -4n - 8 - 4j, past saved $ra and $fp
    fn next_local(&mut self) -> i32 {
        let offset = -WORD * (self.formals as i32 + 2 + self.locals as i32);
        self.locals += 1;
        offset
    }
}

/// Result of resolving a field access chain.
enum Loc {
    Struct(SymbolId),
    Plain,
    Failed,
}

struct Resolver<'d> {
    symbols: Symbols,
    scopes: ScopeStack,
    frame: Option<Frame>,
    diags: &'d mut Diagnostics,
}

impl<'d> Resolver<'d> {
    fn new(diags: &'d mut Diagnostics) -> Self {
        Self {
            symbols: Symbols::new(),
            scopes: ScopeStack::new(),
            frame: None,
            diags,
        }
    }

    fn resolve_decl(&mut self, decl: &mut Decl) -> Result<(), InternalError> {
        match decl {
            Decl::Var(var) => self.resolve_var_decl(var),
            Decl::Func(func) => self.resolve_fn_decl(func),
            Decl::Struct(def) => self.resolve_struct_decl(def),
        }
    }

    /// Validate a declaration and compute its type and symbol kind.
    /// `None` when the declaration is rejected.
    fn check_decl(
        &mut self,
        ty: &mut TypeSpec,
        name: &Ident,
        taken: bool,
    ) -> Option<(Type, Option<SymbolId>)> {
        let declared = ty.to_type();
        let mut shape = None;
        match ty {
            TypeSpec::Void => {
                self.diags.report(name.pos, SemanticError::NonFunctionVoid);
            }
            TypeSpec::Struct(id) => match self.lookup_struct_def(&id.name) {
                Some(def) => {
                    id.sym = Some(def);
                    shape = Some((declared, Some(def)));
                }
                None => self.diags.report(id.pos, SemanticError::InvalidStructType),
            },
            TypeSpec::Int | TypeSpec::Bool => shape = Some((declared, None)),
        }
        if taken {
            self.diags.report(name.pos, SemanticError::MultiplyDeclared);
            return None;
        }
        shape
    }

    fn lookup_struct_def(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .lookup_global(name)
            .filter(|&id| self.symbols[id].is_struct_def())
    }

    fn make_symbol(name: &str, ty: Type, def: Option<SymbolId>, storage: Storage) -> Symbol {
        match (def, ty) {
            (Some(def), Type::StructVar(struct_name)) => {
                Symbol::struct_var(name, &struct_name, def, storage)
            }
            (_, ty) => Symbol::var(name, ty, storage),
        }
    }

    fn resolve_var_decl(&mut self, decl: &mut VarDecl) -> Result<(), InternalError> {
        let taken = self.scopes.lookup_local(&decl.name.name).is_some();
        let Some((ty, def)) = self.check_decl(&mut decl.ty, &decl.name, taken) else {
            return Ok(());
        };
        let storage = match &mut self.frame {
            Some(frame) => Storage::Frame(frame.next_local()),
            None => Storage::Global(format!("_{}", decl.name.name)),
        };
        let id = self
            .symbols
            .alloc(Self::make_symbol(&decl.name.name, ty, def, storage));
        self.scopes.declare(&decl.name.name, id)?;
        decl.name.sym = Some(id);
        Ok(())
    }

    /// Formals always take a slot so call arity matches the frame.
    fn resolve_formal(&mut self, formal: &mut FormalDecl) -> Result<Type, InternalError> {
        let offset = match &mut self.frame {
            Some(frame) => frame.next_formal(),
            None => return Err(InternalError::UnexpectedNode("formal outside a function")),
        };
        let taken = self.scopes.lookup_local(&formal.name.name).is_some();
        let checked = self.check_decl(&mut formal.ty, &formal.name, taken);
        let param = match &formal.ty {
            TypeSpec::Void => Type::Error,
            TypeSpec::Struct(id) if id.sym.is_none() => Type::Error,
            spec => spec.to_type(),
        };
        if let Some((ty, def)) = checked {
            let symbol = Self::make_symbol(&formal.name.name, ty, def, Storage::Frame(offset));
            let id = self.symbols.alloc(symbol);
            self.scopes.declare(&formal.name.name, id)?;
            formal.name.sym = Some(id);
        }
        Ok(param)
    }

    fn resolve_fn_decl(&mut self, decl: &mut FnDecl) -> Result<(), InternalError> {
        let name = decl.name.name.clone();
        if let TypeSpec::Struct(id) = &mut decl.ret {
            match self.lookup_struct_def(&id.name) {
                Some(def) => id.sym = Some(def),
                None => self.diags.report(id.pos, SemanticError::InvalidStructType),
            }
        }

        // Registered before the body so the function can call itself.
        let func = if self.scopes.lookup_local(&name).is_some() {
            self.diags.report(decl.name.pos, SemanticError::MultiplyDeclared);
            None
        } else {
            let label = if name == "main" {
                name.clone()
            } else {
                format!("_{name}")
            };
            let id = self
                .symbols
                .alloc(Symbol::func(&name, decl.ret.to_type(), label));
            self.scopes.declare(&name, id)?;
            decl.name.sym = Some(id);
            Some(id)
        };

        self.scopes.push();
        self.frame = Some(Frame::default());

        let mut params = Vec::with_capacity(decl.formals.len());
        for formal in &mut decl.formals {
            params.push(self.resolve_formal(formal)?);
        }
        self.resolve_block(&mut decl.body)?;

        let frame = self.frame.take().unwrap_or_default();
        self.scopes.pop()?;

        if let Some(id) = func {
            if let SymbolKind::Func {
                params: slots,
                formal_words,
                local_words,
                ..
            } = &mut self.symbols[id].kind
            {
                *slots = params;
                *formal_words = frame.formals;
                *local_words = frame.locals;
            }
        }
        Ok(())
    }

    fn resolve_struct_decl(&mut self, decl: &mut StructDecl) -> Result<(), InternalError> {
        let taken = self.scopes.lookup_local(&decl.name.name).is_some();
        if taken {
            self.diags
                .report(decl.name.pos, SemanticError::MultiplyDeclared);
        }

        // Fields are resolved even for a duplicate struct.
        let mut fields = Scope::new();
        for field in &mut decl.fields {
            let field_taken = fields.contains(&field.name.name);
            if let Some((ty, def)) = self.check_decl(&mut field.ty, &field.name, field_taken) {
                let symbol = Self::make_symbol(&field.name.name, ty, def, Storage::None);
                let id = self.symbols.alloc(symbol);
                fields.insert(&field.name.name, id);
                field.name.sym = Some(id);
            }
        }

        if !taken {
            let id = self
                .symbols
                .alloc(Symbol::struct_def(&decl.name.name, fields));
            self.scopes.declare(&decl.name.name, id)?;
            decl.name.sym = Some(id);
        }
        Ok(())
    }

    fn resolve_block(&mut self, block: &mut Block) -> Result<(), InternalError> {
        for decl in &mut block.decls {
            self.resolve_var_decl(decl)?;
        }
        for stmt in &mut block.stmts {
            self.resolve_stmt(stmt)?;
        }
        Ok(())
    }

    fn resolve_scoped_block(&mut self, block: &mut Block) -> Result<(), InternalError> {
        self.scopes.push();
        let result = self.resolve_block(block);
        self.scopes.pop()?;
        result
    }

    fn resolve_stmt(&mut self, stmt: &mut Stmt) -> Result<(), InternalError> {
        match stmt {
            Stmt::Assign(e)
            | Stmt::PostInc(e)
            | Stmt::PostDec(e)
            | Stmt::Read(e)
            | Stmt::Write(e)
            | Stmt::Call(e) => self.resolve_expr(e),
            Stmt::If(cond, body) | Stmt::While(cond, body) => {
                self.resolve_expr(cond)?;
                self.resolve_scoped_block(body)
            }
            Stmt::IfElse(cond, then, els) => {
                self.resolve_expr(cond)?;
                self.resolve_scoped_block(then)?;
                self.resolve_scoped_block(els)
            }
            Stmt::Return(Some(e), _) => self.resolve_expr(e),
            Stmt::Return(None, _) => Ok(()),
        }
    }

    fn resolve_ident(&mut self, id: &mut Ident) {
        id.sym = self.scopes.lookup_global(&id.name);
        if id.sym.is_none() {
            self.diags.report(id.pos, SemanticError::UndeclaredIdentifier);
        }
    }

    fn resolve_expr(&mut self, expr: &mut Expr) -> Result<(), InternalError> {
        match &mut expr.kind {
            ExprKind::IntLit(..) | ExprKind::StrLit(..) | ExprKind::True(_) | ExprKind::False(_) => {
                Ok(())
            }
            ExprKind::Ident(id) => {
                self.resolve_ident(id);
                Ok(())
            }
            ExprKind::Member(..) => self.resolve_member(expr).map(|_| ()),
            ExprKind::Assign(lhs, rhs) | ExprKind::Binary(_, lhs, rhs) => {
                self.resolve_expr(lhs)?;
                self.resolve_expr(rhs)
            }
            ExprKind::Unary(_, operand) => self.resolve_expr(operand),
            ExprKind::Call(callee, args) => {
                self.resolve_ident(callee);
                for arg in args {
                    self.resolve_expr(arg)?;
                }
                Ok(())
            }
        }
    }

    /// What a field access chain ending in `expr` refers to.
    fn resolve_loc(&mut self, expr: &mut Expr) -> Result<Loc, InternalError> {
        match &mut expr.kind {
            ExprKind::Ident(id) => {
                self.resolve_ident(id);
                Ok(match id.sym {
                    None => Loc::Failed,
                    Some(sym) => match self.symbols[sym].kind {
                        SymbolKind::StructVar { def } => Loc::Struct(def),
                        _ => Loc::Plain,
                    },
                })
            }
            ExprKind::Member(..) => self.resolve_member(expr),
            _ => {
                self.resolve_expr(expr)?;
                Ok(Loc::Plain)
            }
        }
    }

    fn resolve_member(&mut self, expr: &mut Expr) -> Result<Loc, InternalError> {
        let ExprKind::Member(base, field) = &mut expr.kind else {
            return Err(InternalError::UnexpectedNode("expected a field access"));
        };
        let def = match self.resolve_loc(base)? {
            Loc::Failed => return Ok(Loc::Failed),
            Loc::Plain => {
                self.diags
                    .report(base.pos(), SemanticError::DotAccessNonStruct);
                return Ok(Loc::Failed);
            }
            Loc::Struct(def) => def,
        };

        let SymbolKind::StructDef { fields } = &self.symbols[def].kind else {
            return Err(InternalError::UnexpectedSymbol {
                name: self.symbols[def].name.clone(),
                expected: "struct definition",
            });
        };
        match fields.get(&field.name) {
            None => {
                self.diags.report(field.pos, SemanticError::InvalidFieldName);
                Ok(Loc::Failed)
            }
            Some(sym) => {
                field.sym = Some(sym);
                Ok(match self.symbols[sym].kind {
                    SymbolKind::StructVar { def } => Loc::Struct(def),
                    _ => Loc::Plain,
                })
            }
        }
    }
}
