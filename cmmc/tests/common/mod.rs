#![allow(dead_code)]

use arch::{Inst, Line, Reg, WORD};
use cmmc::ast::{
    BinaryOp, Block, Decl, Expr, ExprKind, FnDecl, FormalDecl, Ident, Pos, Stmt, StructDecl,
    TypeSpec, UnaryOp, VarDecl,
};
use cmmc::symbols::SymbolKind;
use cmmc::{compile, Compiled, Program, SemanticError, Symbols};
use std::collections::HashMap;

pub fn pos(line: usize, col: usize) -> Pos {
    Pos::new(line, col)
}

pub fn name(n: &str, line: usize, col: usize) -> Ident {
    Ident::new(n, line, col)
}

pub fn ident(n: &str, line: usize, col: usize) -> Expr {
    Expr::new(ExprKind::Ident(name(n, line, col)))
}

pub fn int(v: i32, line: usize, col: usize) -> Expr {
    Expr::new(ExprKind::IntLit(v, pos(line, col)))
}

pub fn string(s: &str, line: usize, col: usize) -> Expr {
    Expr::new(ExprKind::StrLit(s.to_string(), pos(line, col)))
}

pub fn tru(line: usize, col: usize) -> Expr {
    Expr::new(ExprKind::True(pos(line, col)))
}

pub fn fls(line: usize, col: usize) -> Expr {
    Expr::new(ExprKind::False(pos(line, col)))
}

pub fn bin(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::new(ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)))
}

pub fn neg(e: Expr) -> Expr {
    Expr::new(ExprKind::Unary(UnaryOp::Neg, Box::new(e)))
}

pub fn not(e: Expr) -> Expr {
    Expr::new(ExprKind::Unary(UnaryOp::Not, Box::new(e)))
}

pub fn assign(lhs: Expr, rhs: Expr) -> Expr {
    Expr::new(ExprKind::Assign(Box::new(lhs), Box::new(rhs)))
}

pub fn call(f: &str, line: usize, col: usize, args: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::Call(name(f, line, col), args))
}

pub fn dot(base: Expr, field: &str, line: usize, col: usize) -> Expr {
    Expr::new(ExprKind::Member(Box::new(base), name(field, line, col)))
}

pub fn set(lhs: Expr, rhs: Expr) -> Stmt {
    Stmt::Assign(assign(lhs, rhs))
}

pub fn ret(value: Option<Expr>, line: usize, col: usize) -> Stmt {
    Stmt::Return(value, pos(line, col))
}

pub fn struct_t(n: &str, line: usize, col: usize) -> TypeSpec {
    TypeSpec::Struct(name(n, line, col))
}

pub fn var(ty: TypeSpec, n: &str, line: usize, col: usize) -> VarDecl {
    VarDecl {
        ty,
        name: name(n, line, col),
    }
}

pub fn global(ty: TypeSpec, n: &str, line: usize, col: usize) -> Decl {
    Decl::Var(var(ty, n, line, col))
}

pub fn formal(ty: TypeSpec, n: &str, line: usize, col: usize) -> FormalDecl {
    FormalDecl {
        ty,
        name: name(n, line, col),
    }
}

pub fn block(decls: Vec<VarDecl>, stmts: Vec<Stmt>) -> Block {
    Block { decls, stmts }
}

pub fn func(
    ret: TypeSpec,
    n: &str,
    line: usize,
    formals: Vec<FormalDecl>,
    decls: Vec<VarDecl>,
    stmts: Vec<Stmt>,
) -> Decl {
    Decl::Func(FnDecl {
        ret,
        name: name(n, line, 5),
        formals,
        body: block(decls, stmts),
    })
}

pub fn structure(n: &str, line: usize, fields: Vec<VarDecl>) -> Decl {
    Decl::Struct(StructDecl {
        name: name(n, line, 8),
        fields,
    })
}

pub fn analyze(decls: Vec<Decl>) -> (Program, Compiled) {
    let mut program = Program::new(decls);
    let compiled = compile(&mut program, false).unwrap();
    (program, compiled)
}

/// (line, col, error) of every diagnostic, in report order.
pub fn errors(decls: Vec<Decl>) -> Vec<(usize, usize, SemanticError)> {
    let (_, compiled) = analyze(decls);
    compiled
        .diagnostics
        .iter()
        .map(|d| (d.pos.line, d.pos.col, d.error))
        .collect()
}

/// Formal count of every function, keyed by its label.
pub fn formal_counts(symbols: &Symbols) -> HashMap<String, i32> {
    symbols
        .iter()
        .filter_map(|(_, s)| match (&s.kind, s.label()) {
            (SymbolKind::Func { formal_words, .. }, Some(label)) => {
                Some((label.to_string(), *formal_words as i32))
            }
            _ => None,
        })
        .collect()
}

/// Depth of the evaluation stack while walking straight-line code.
#[derive(Debug, Default)]
pub struct Sim {
    /// Depth after the last line, `None` if it is unreachable.
    pub end: Option<i32>,
    /// Depth at every label branched to or passed.
    pub labels: HashMap<String, i32>,
}

fn arrive(labels: &mut HashMap<String, i32>, label: &str, depth: i32) -> Result<(), String> {
    match labels.get(label) {
        Some(&seen) if seen != depth => Err(format!(
            "{label} reached at depth {depth}, previously {seen}"
        )),
        _ => {
            labels.insert(label.to_string(), depth);
            Ok(())
        }
    }
}

/// Track `$sp` moves in words. A `jal` pops the callee's actuals.
pub fn simulate(lines: &[Line], formals: &HashMap<String, i32>) -> Result<Sim, String> {
    let mut sim = Sim::default();
    let mut depth = Some(0);
    for line in lines {
        match line {
            Line::Label(label, _) => match (depth, sim.labels.get(label).copied()) {
                (Some(d), _) => arrive(&mut sim.labels, label, d)?,
                (None, Some(seen)) => depth = Some(seen),
                (None, None) => return Err(format!("{label} is unreachable")),
            },
            Line::Inst(inst, _) => {
                let Some(d) = depth else {
                    continue;
                };
                match inst {
                    Inst::SUBUI(Reg::SP, Reg::SP, bytes) => depth = Some(d + bytes / WORD),
                    Inst::ADDUI(Reg::SP, Reg::SP, bytes) => depth = Some(d - bytes / WORD),
                    Inst::JAL(label) => {
                        let n = formals
                            .get(label)
                            .ok_or_else(|| format!("unknown function {label}"))?;
                        depth = Some(d - n);
                    }
                    _ => {
                        if let Some(label) = inst.target() {
                            arrive(&mut sim.labels, label, d)?;
                        }
                        // nothing falls through an unconditional jump
                        if let Inst::J(_) = inst {
                            depth = None;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    sim.end = depth;
    Ok(sim)
}

/// Body of the function labelled `label`: everything between the prologue
/// and the exit label. Also returns the exit label.
pub fn function_body<'c>(lines: &'c [Line], label: &str) -> (&'c [Line], String) {
    let start = lines
        .iter()
        .position(|l| matches!(l, Line::Label(name, _) if name == label))
        .unwrap();
    // push $ra, push $fp, set $fp, reserve locals
    let mut seen = 0;
    let mut body = start + 1;
    while seen < 6 {
        if let Line::Inst(..) = lines[body] {
            seen += 1;
        }
        body += 1;
    }
    let end = body
        + lines[body..]
            .iter()
            .position(|l| matches!(l, Line::Label(_, Some(c)) if c == "exit"))
            .unwrap();
    let Line::Label(exit, _) = &lines[end] else {
        unreachable!()
    };
    (&lines[body..end], exit.clone())
}

/// Every function in `compiled` must leave the stack balanced on every
/// path to its exit label.
pub fn assert_balanced(compiled: &Compiled) {
    let code = compiled.code.as_ref().unwrap();
    let formals = formal_counts(&compiled.symbols);
    for label in formals.keys() {
        let (body, exit) = function_body(code.lines(), label);
        let sim = simulate(body, &formals).unwrap();
        assert!(
            matches!(sim.end, Some(0) | None),
            "{label}: body ends at depth {:?}",
            sim.end
        );
        if let Some(&depth) = sim.labels.get(&exit) {
            assert_eq!(depth, 0, "{label}: returns at depth {depth}");
        }
    }
}
