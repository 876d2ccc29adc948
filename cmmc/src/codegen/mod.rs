//! Stack-machine code generation.
//!
//! Every expression pushes exactly one word; every statement leaves the
//! stack as it found it.

mod expr;
mod stmt;

use crate::{
    ast::{Decl, FnDecl, Ident, Program, VarDecl},
    error::InternalError,
    symbols::{Symbol, SymbolKind, Symbols},
    typeck::TypeTable,
};
use arch::{next_label, Addr, Code, Directive, Inst, Reg, Syscall, WORD};

pub fn generate(
    program: &Program,
    symbols: &Symbols,
    types: &TypeTable,
) -> Result<Code, InternalError> {
    let mut gen = Generator::new(symbols, types);
    for decl in &program.decls {
        match decl {
            Decl::Var(var) => gen.gen_global(var)?,
            Decl::Func(func) => gen.gen_func(func)?,
            Decl::Struct(_) => {}
        }
    }
    Ok(gen.finish())
}

pub struct Generator<'a> {
    symbols: &'a Symbols,
    types: &'a TypeTable,
    code: Code,
    // exit label of the function being generated
    exit: Option<String>,
}

impl<'a> Generator<'a> {
    pub fn new(symbols: &'a Symbols, types: &'a TypeTable) -> Self {
        Self {
            symbols,
            types,
            code: Code::new(),
            exit: None,
        }
    }

    pub fn finish(self) -> Code {
        self.code
    }

    fn symbol(&self, id: &Ident) -> Result<&'a Symbol, InternalError> {
        id.sym
            .and_then(|sym| self.symbols.get(sym))
            .ok_or_else(|| InternalError::UnlinkedReference(id.name.clone()))
    }

    fn gen_global(&mut self, decl: &VarDecl) -> Result<(), InternalError> {
        let symbol = self.symbol(&decl.name)?;
        let label = symbol.label().ok_or_else(|| InternalError::UnexpectedSymbol {
            name: symbol.name.clone(),
            expected: "global variable",
        })?;
        self.code.directive(Directive::Data);
        self.code.directive(Directive::Align(2));
        self.code
            .directive(Directive::Space(label.to_string(), WORD as u32));
        Ok(())
    }

    pub fn gen_func(&mut self, decl: &FnDecl) -> Result<(), InternalError> {
        let symbol = self.symbol(&decl.name)?;
        let (SymbolKind::Func {
            formal_words,
            local_words,
            ..
        }, Some(label)) = (&symbol.kind, symbol.label())
        else {
            return Err(InternalError::UnexpectedSymbol {
                name: symbol.name.clone(),
                expected: "function",
            });
        };
        let formals = *formal_words as i32;
        let locals = *local_words as i32;
        let is_main = decl.name.name == "main";

        self.code.blank();
        self.code.directive(Directive::Text);
        if is_main {
            self.code.directive(Directive::Globl(label.to_string()));
            self.code
                .label_with_comment(label, format!("function {}", decl.name.name));
            self.code.label("__start");
        } else {
            self.code
                .label_with_comment(label, format!("function {}", decl.name.name));
        }

        // prologue
        self.code.push(Reg::RA);
        self.code.push(Reg::FP);
        self.code
            .inst(Inst::ADDUI(Reg::FP, Reg::SP, WORD * (formals + 2)));
        self.code
            .inst(Inst::SUBUI(Reg::SP, Reg::SP, WORD * locals));

        let exit = next_label();
        self.exit = Some(exit.clone());
        self.gen_block(&decl.body)?;
        self.exit = None;

        // epilogue
        self.code.label_with_comment(exit, "exit");
        if is_main {
            self.code.inst(Inst::LI(Reg::V0, Syscall::Exit.code()));
            self.code.inst(Inst::SYSCALL());
        } else {
            self.code
                .inst(Inst::LW(Reg::RA, Addr::Indexed(-WORD * formals, Reg::FP)));
            self.code.inst(Inst::MOVE(Reg::T0, Reg::FP));
            self.code
                .inst(Inst::LW(Reg::FP, Addr::Indexed(-WORD * (formals + 1), Reg::FP)));
            self.code.inst(Inst::MOVE(Reg::SP, Reg::T0));
            self.code.inst(Inst::JR(Reg::RA));
        }
        Ok(())
    }
}
