//! Tobsterlang Compiler CLI
//!
//! The `tobsterc` command compiles one Tobsterlang document into one
//! relocatable object file.

use clap::Parser;
use inkwell::context::Context;
use std::fs;
use std::path::PathBuf;

use tobsterlang::codegen::Codegen;
use tobsterlang::optimizer::OptLevel;
use tobsterlang::{backend, parser};

#[derive(Parser)]
#[command(name = "tobsterc")]
#[command(version = tobsterlang::VERSION)]
#[command(about = "The Tobsterlang compiler", long_about = None)]
struct Cli {
    /// Input program
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output object file (defaults to <module>.o)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Optimization level (-O0 through -O3, -Os, -Oz)
    #[arg(short = 'O', value_name = "LEVEL", default_value = "0", value_parser = parse_opt_level)]
    opt_level: OptLevel,

    /// Emit LLVM IR (for debugging)
    #[arg(long)]
    emit_llvm: bool,
}

/// The `-O` flag glues its value to the flag (`-O2`, `-Os`); clap hands
/// the glued part through as the value.
fn parse_opt_level(level: &str) -> Result<OptLevel, String> {
    Ok(OptLevel::from_flag(level))
}

fn main() -> miette::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.input)
        .map_err(|e| miette::miette!("failed to read {}: {}", cli.input.display(), e))?;

    let program = parser::parse(&source).map_err(|e| miette::miette!("{}", e))?;

    let context = Context::create();
    let mut codegen = Codegen::new(&context);
    let module = codegen
        .generate(&program)
        .map_err(|e| miette::miette!("{}", e))?;

    if cli.emit_llvm {
        println!("{}", module.print_to_string().to_string());
    }

    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("./{}.o", program.module)));

    backend::emit_object(&module, &output, cli.opt_level)
        .map_err(|e| miette::miette!("{}", e))?;

    println!("Wrote {}", output.display());
    Ok(())
}
