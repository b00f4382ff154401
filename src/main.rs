use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use paren::compiler::emitter::{emit_driver, write_module, Emission};
use paren::error::{Error, Result};
use paren::{Interp, Tokenizer, VERSION};

#[derive(Parser, Debug)]
#[command(name = "paren", version, about = "Paren interpreter and AOT driver compiler")]
struct Opt {
    /// Source file to evaluate; start the REPL when omitted
    input: Option<PathBuf>,

    /// Compile the input into a driver calling the embedding ABI
    #[arg(short = 'c', long = "compile")]
    compile: bool,

    /// Output file for the AOT path (`-` for stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Files to import before evaluation (repeatable)
    #[arg(short = 'i', long = "import")]
    import: Vec<PathBuf>,

    /// Emit textual LLVM IR instead of an object file
    #[arg(long = "emit-llvm")]
    emit_llvm: bool,

    /// Emit target assembly instead of an object file
    #[arg(long = "emit-asm")]
    emit_asm: bool,
}

fn main() -> ExitCode {
    match run(Opt::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("paren: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(opt: Opt) -> Result<()> {
    let Some(input) = opt.input.clone() else {
        repl();
        return Ok(());
    };

    if opt.compile {
        return compile_input(&input, &opt);
    }

    let interp = Interp::new();
    interp.load_prelude();
    for import in &opt.import {
        interp.import_file(&import.to_string_lossy());
    }
    let code = fs::read_to_string(&input).map_err(|source| Error::FileRead {
        path: input.clone(),
        source,
    })?;
    interp.eval_source(&code);
    Ok(())
}

/// AOT mode: lower the input into a driver module
fn compile_input(input: &Path, opt: &Opt) -> Result<()> {
    let source = fs::read_to_string(input).map_err(|source| Error::FileRead {
        path: input.to_path_buf(),
        source,
    })?;

    // import paths are baked into the driver, so they must stay valid
    // from wherever the produced program runs
    let imports: Vec<String> = opt
        .import
        .iter()
        .map(|p| {
            std::path::absolute(p)
                .unwrap_or_else(|_| p.clone())
                .to_string_lossy()
                .into_owned()
        })
        .collect();

    let module_name = input.to_string_lossy();
    let ir = emit_driver(&source, &imports, &module_name);

    let emission = if opt.emit_llvm {
        Emission::LlvmIr
    } else if opt.emit_asm {
        Emission::Asm
    } else {
        Emission::Object
    };
    write_module(&ir, emission, opt.output.as_deref(), input)
}

/// Interactive read-eval-print loop.
///
/// Lines accumulate until the tokenizer reports no unclosed `(` or `"`,
/// then the whole buffer is evaluated and printed as `VALUE : TYPE`.
fn repl() {
    let interp = Interp::new();
    interp.load_prelude();
    print_logo(&interp);

    let stdin = io::stdin();
    let mut code = String::new();
    loop {
        if code.is_empty() {
            print!("> ");
        } else {
            print!("  ");
        }
        io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                eval_print(&interp, &code);
                return;
            }
            Ok(_) => {}
        }
        code.push('\n');
        code.push_str(line.trim_end_matches(['\n', '\r']));

        let mut tokenizer = Tokenizer::new(&code);
        tokenizer.tokenize();
        if tokenizer.unclosed <= 0 {
            eval_print(&interp, &code);
            code.clear();
        }
    }
}

fn eval_print(interp: &Interp, code: &str) {
    println!("{}", interp.eval_source(code).read().with_type());
}

fn print_logo(interp: &Interp) {
    println!("Paren {}", VERSION);
    println!("Predefined Symbols:");
    println!(" {}", interp.global_names().join(" "));
    println!("Macros:");
    println!(" {}", interp.macros().names().join(" "));
}
