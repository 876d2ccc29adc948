//! Render a tree back to source text.
//!
//! With a symbol table, every linked identifier is annotated with its type,
//! e.g. `x(int)` or `f(int,bool->void)`.

use crate::{
    ast::{Block, Decl, Expr, ExprKind, FnDecl, Ident, Program, Stmt, TypeSpec, UnaryOp, VarDecl},
    symbols::Symbols,
};
use arch::quote;
use itertools::Itertools;

const INDENT: usize = 4;

pub fn unparse(program: &Program, symbols: Option<&Symbols>) -> String {
    let mut printer = Printer {
        symbols,
        out: String::new(),
    };
    for decl in &program.decls {
        printer.decl(decl);
    }
    printer.out
}

struct Printer<'a> {
    symbols: Option<&'a Symbols>,
    out: String,
}

impl<'a> Printer<'a> {
    fn line(&mut self, indent: usize, text: &str) {
        self.out.push_str(&" ".repeat(indent));
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Var(var) => self.var_decl(var, 0),
            Decl::Func(func) => self.fn_decl(func),
            Decl::Struct(def) => {
                self.line(0, &format!("struct {} {{", def.name.name));
                for field in &def.fields {
                    self.var_decl(field, INDENT);
                }
                self.line(0, "};");
                self.line(0, "");
            }
        }
    }

    fn var_decl(&mut self, decl: &VarDecl, indent: usize) {
        let text = format!("{} {};", type_spec(&decl.ty), decl.name.name);
        self.line(indent, &text);
    }

    fn fn_decl(&mut self, func: &FnDecl) {
        let formals = func
            .formals
            .iter()
            .map(|f| format!("{} {}", type_spec(&f.ty), f.name.name))
            .join(", ");
        let head = format!("{} {}({}) {{", type_spec(&func.ret), func.name.name, formals);
        self.line(0, &head);
        self.block(&func.body, INDENT);
        self.line(0, "}");
        self.line(0, "");
    }

    fn block(&mut self, block: &Block, indent: usize) {
        for decl in &block.decls {
            self.var_decl(decl, indent);
        }
        for stmt in &block.stmts {
            self.stmt(stmt, indent);
        }
    }

    fn stmt(&mut self, stmt: &Stmt, indent: usize) {
        match stmt {
            Stmt::Assign(e) => {
                let text = match &e.kind {
                    ExprKind::Assign(lhs, rhs) => {
                        format!("{} = {};", self.expr(lhs), self.expr(rhs))
                    }
                    _ => format!("{};", self.expr(e)),
                };
                self.line(indent, &text);
            }
            Stmt::PostInc(e) => {
                let text = format!("{}++;", self.expr(e));
                self.line(indent, &text);
            }
            Stmt::PostDec(e) => {
                let text = format!("{}--;", self.expr(e));
                self.line(indent, &text);
            }
            Stmt::Read(e) => {
                let text = format!("cin >> {};", self.expr(e));
                self.line(indent, &text);
            }
            Stmt::Write(e) => {
                let text = format!("cout << {};", self.expr(e));
                self.line(indent, &text);
            }
            Stmt::If(cond, body) => {
                let text = format!("if ({}) {{", self.expr(cond));
                self.line(indent, &text);
                self.block(body, indent + INDENT);
                self.line(indent, "}");
            }
            Stmt::IfElse(cond, then, els) => {
                let text = format!("if ({}) {{", self.expr(cond));
                self.line(indent, &text);
                self.block(then, indent + INDENT);
                self.line(indent, "}");
                self.line(indent, "else {");
                self.block(els, indent + INDENT);
                self.line(indent, "}");
            }
            Stmt::While(cond, body) => {
                let text = format!("while ({}) {{", self.expr(cond));
                self.line(indent, &text);
                self.block(body, indent + INDENT);
                self.line(indent, "}");
            }
            Stmt::Call(e) => {
                let text = format!("{};", self.expr(e));
                self.line(indent, &text);
            }
            Stmt::Return(Some(e), _) => {
                let text = format!("return {};", self.expr(e));
                self.line(indent, &text);
            }
            Stmt::Return(None, _) => self.line(indent, "return;"),
        }
    }

    fn ident(&self, id: &Ident) -> String {
        match (self.symbols, id.sym) {
            (Some(symbols), Some(sym)) => match symbols.get(sym) {
                Some(symbol) => format!("{}({})", id.name, symbol),
                None => id.name.clone(),
            },
            _ => id.name.clone(),
        }
    }

    fn expr(&self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::IntLit(value, _) => value.to_string(),
            ExprKind::StrLit(text, _) => quote(text),
            ExprKind::True(_) => "true".to_string(),
            ExprKind::False(_) => "false".to_string(),
            ExprKind::Ident(id) => self.ident(id),
            ExprKind::Member(base, field) => format!("{}.{}", self.expr(base), self.ident(field)),
            ExprKind::Assign(lhs, rhs) => format!("({} = {})", self.expr(lhs), self.expr(rhs)),
            ExprKind::Call(callee, args) => format!(
                "{}({})",
                self.ident(callee),
                args.iter().map(|arg| self.expr(arg)).join(", ")
            ),
            ExprKind::Unary(op, operand) => {
                let sign = match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Not => "!",
                };
                format!("({}{})", sign, self.expr(operand))
            }
            ExprKind::Binary(op, lhs, rhs) => {
                format!("({} {} {})", self.expr(lhs), op.symbol(), self.expr(rhs))
            }
        }
    }
}

fn type_spec(ty: &TypeSpec) -> String {
    match ty {
        TypeSpec::Struct(id) => format!("struct {}", id.name),
        other => other.to_type().to_string(),
    }
}
