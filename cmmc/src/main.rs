use clap::Parser;
use cmmc::{compile, unparse, Error, Program};
use color_print::{ceprintln, cprintln};
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Emit {
    /// Assembly
    Asm,
    /// Source text annotated with resolved types
    Unparse,
}

#[derive(Debug, clap::Parser)]
#[clap(author, version, about)]
struct Args {
    /// Input AST (YAML)
    input: String,

    /// Output file, stdout when omitted
    #[clap(short, long)]
    output: Option<String>,

    /// What to emit
    #[clap(long, value_enum, default_value = "asm")]
    emit: Emit,

    /// Do not generate code when any error was reported
    #[clap(long)]
    strict: bool,

    /// Enable verbose output
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Rejected(count)) => {
            ceprintln!("<red,bold>error</>: aborting due to {} previous error(s)", count);
            ExitCode::FAILURE
        }
        Err(e) => {
            ceprintln!("<red,bold>error</>: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    // 1. Load AST
    let src = std::fs::read_to_string(&args.input)?;
    let mut program = Program::from_yaml(&src)?;
    if args.verbose {
        cprintln!(
            "<green>1.</> Loaded {} declaration(s) from {}",
            program.decls.len(),
            args.input
        );
    }

    // 2. Resolve, check and generate
    let compiled = compile(&mut program, args.strict)?;
    compiled.diagnostics.print(&args.input);
    if args.verbose {
        cprintln!(
            "<green>2.</> {} symbol(s), {} typed expression(s), {} error(s)",
            compiled.symbols.len(),
            compiled.types.len(),
            compiled.diagnostics.len()
        );
    }

    // 3. Emit
    let text = match args.emit {
        Emit::Unparse => Some(unparse(&program, Some(&compiled.symbols))),
        Emit::Asm => compiled.code.as_ref().map(|code| {
            if args.verbose {
                println!("{}", code.cformat());
            }
            code.to_string()
        }),
    };
    if let Some(text) = text {
        match &args.output {
            Some(path) => {
                std::fs::write(path, text)?;
                if args.verbose {
                    cprintln!("<green>3.</> Wrote {}", path);
                }
            }
            None => print!("{text}"),
        }
    }

    if compiled.diagnostics.is_empty() {
        Ok(())
    } else {
        Err(Error::Rejected(compiled.diagnostics.len()))
    }
}
