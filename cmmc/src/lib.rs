pub mod ast;
pub mod codegen;
pub mod diag;
pub mod error;
pub mod resolve;
pub mod symbols;
pub mod typeck;
pub mod types;
pub mod unparse;

pub use ast::Program;
pub use codegen::generate;
pub use diag::{Diagnostic, Diagnostics};
pub use error::{Error, InternalError, SemanticError};
pub use resolve::resolve;
pub use symbols::Symbols;
pub use typeck::{check, TypeTable};
pub use unparse::unparse;

use arch::Code;

/// Everything the passes produced for one program.
#[derive(Debug)]
pub struct Compiled {
    pub symbols: Symbols,
    pub types: TypeTable,
    pub code: Option<Code>,
    pub diagnostics: Diagnostics,
}

/// Run name resolution, type checking and code generation in order.
///
/// Type checking always runs, so independent faults are all reported.
/// Code is not generated when name resolution reported anything, since the
/// tree is then missing links. Type errors stop code generation only when
/// `strict` is set.
pub fn compile(program: &mut Program, strict: bool) -> Result<Compiled, InternalError> {
    let mut diagnostics = Diagnostics::new();
    let symbols = resolve(program, &mut diagnostics)?;
    let linked = diagnostics.is_empty();

    let types = check(program, &symbols, &mut diagnostics)?;
    let code = if !linked || (strict && !diagnostics.is_empty()) {
        None
    } else {
        Some(generate(program, &symbols, &types)?)
    };
    Ok(Compiled {
        symbols,
        types,
        code,
        diagnostics,
    })
}
