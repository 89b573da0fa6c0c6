mod error;

use std::{
    error::Error,
    fs,
    io::{self, IsTerminal, Write},
    path::PathBuf,
    process::ExitCode,
};

use ariadne::Source;
use asn1go::{AsnCompiler, Diagnostic, IntegerRepr};
use clap::{ArgAction, ColorChoice, Parser, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Generate Go encoding/asn1 bindings from an ASN.1 module
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The ASN.1 module to compile
    input: PathBuf,

    /// Write the generated code to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the generated package, defaults to the module name
    #[arg(long)]
    package: Option<String>,

    /// Go type used for INTEGER
    #[arg(long, value_enum, default_value = "int64")]
    integer: Integer,

    /// Print the syntax tree instead of generating code
    #[arg(long)]
    print_ast: bool,

    /// When to use colors in error reports
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorChoice,

    /// Log more details, can be repeated
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Integer {
    /// int64
    Int64,

    /// *big.Int from math/big
    Big,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        1 => "info".into(),
        2 => "debug".into(),
        _ => "trace".into(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, Box<dyn Error>> {
    let file = args.input.display().to_string();
    let source = fs::read_to_string(&args.input)?;
    debug!(file, bytes = source.len(), "read input");

    let mut compiler = AsnCompiler::new();
    compiler.package = args.package.clone();
    compiler.integer_repr = match args.integer {
        Integer::Int64 => IntegerRepr::Int64,
        Integer::Big => IntegerRepr::BigInt,
    };

    let result = if args.print_ast {
        compiler.print_ast(&source)
    } else {
        compiler.compile_to_string(&source)
    };

    let output = match result {
        Ok(output) => output,
        Err(err) => {
            let color = match args.color {
                ColorChoice::Always => true,
                ColorChoice::Never => false,
                ColorChoice::Auto => io::stderr().is_terminal(),
            };

            let diagnostic = Diagnostic::from(&err);
            error::to_report(&diagnostic, &file, &source, color)
                .eprint((file.clone(), Source::from(source.as_str())))?;

            return Ok(ExitCode::FAILURE);
        }
    };

    match &args.output {
        Some(path) => fs::write(path, output)?,
        None => io::stdout().write_all(output.as_bytes())?,
    }

    Ok(ExitCode::SUCCESS)
}
