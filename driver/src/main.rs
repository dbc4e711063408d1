use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum}; // clap crate for CLI argument parsing
use codegen::{Codegen, ToolchainConfig};
use model::Target;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TargetArg {
    /// NASM x86-64 assembly
    Asm,
    /// Textual LLVM IR
    Ir,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Asm => Target::Assembly,
            TargetArg::Ir => Target::Ir,
        }
    }
}

/*
Each stop flag runs the pipeline up to and including that stage:
--lex prints tokens, --parse prints the AST, --codegen prints the
generated text and -S writes it next to the input. Without any of them
the text is assembled and linked.
*/

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the kay source file
    input_path: PathBuf,

    /// Executable to produce (defaults to the input path without extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Code generation target
    #[arg(short, long, value_enum, default_value_t = TargetArg::Asm)]
    target: TargetArg,

    /// Run lexer only
    #[arg(short, long)]
    lex: bool,

    /// Run lexer and parser only
    #[arg(short, long)]
    parse: bool,

    /// Run lexer, parser, and codegen only
    #[arg(short, long)]
    codegen: bool,

    /// Emit assembly (or IR) but do not assemble or link
    #[arg(short = 'S', long)]
    emit_asm: bool,

    /// Assembler program; arguments are fixed per target
    #[arg(long, env = "KAY_ASSEMBLER")]
    assembler: Option<String>,

    /// Linker program; arguments are fixed per target
    #[arg(long, env = "KAY_LINKER")]
    linker: Option<String>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let input_path = &args.input_path;
    let source = fs::read_to_string(input_path)
        .with_context(|| format!("failed to read {}", input_path.display()))?;

    let tokens = lexer::lex(&source);
    debug!(tokens = tokens.len(), "lexed");
    if args.lex {
        for token in &tokens {
            println!("{}:{} {} '{}'", token.line, token.column, token.kind, token.text);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let program = match parser::parse_tokens(&tokens) {
        Ok(program) => program,
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", error);
            }
            return Ok(ExitCode::FAILURE);
        }
    };
    if args.parse {
        println!("{:#?}", program);
        return Ok(ExitCode::SUCCESS);
    }

    let target = Target::from(args.target);
    let module_name = input_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .context("input path has no file name")?;
    let text = Codegen::new(target)
        .with_module_name(module_name)
        .gen_program(&program)
        .context("code generation failed")?;
    if args.codegen {
        print!("{}", text);
        return Ok(ExitCode::SUCCESS);
    }

    if args.emit_asm {
        let source_path = input_path.with_extension(target.source_extension());
        fs::write(&source_path, &text)
            .with_context(|| format!("failed to write {}", source_path.display()))?;
        info!(path = %source_path.display(), "wrote {} output", target);
        return Ok(ExitCode::SUCCESS);
    }

    let executable_path = args.output.clone().unwrap_or_else(|| input_path.with_extension(""));
    if executable_path == *input_path {
        bail!("refusing to overwrite {} with the executable; pass -o", input_path.display());
    }

    let mut config = ToolchainConfig::for_target(target);
    if let Some(assembler) = &args.assembler {
        config = config.with_assembler(assembler.as_str());
    }
    if let Some(linker) = &args.linker {
        config = config.with_linker(linker.as_str());
    }

    let object_path = input_path.with_extension(target.object_extension());
    let object = codegen::assemble(&config, &text, &object_path).context("assembling failed")?;
    codegen::link(&config, &[object], &executable_path).context("linking failed")?;
    Ok(ExitCode::SUCCESS)
}
