//! jplc CLI
//!
//! Compiles a JPL source file to x86-64 NASM assembly.
//!
//! Usage:
//!   jplc input.jpl
//!   jplc -l input.jpl      # lex only: dump one token kind per line
//!   jplc -p input.jpl      # parse only
//!   jplc -t input.jpl      # parse + type-check only

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use jplc::error::CompileError;
use jplc_parser::lexer::tokenize;
use jplc_parser::span::SourceMap;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command-line arguments.
#[derive(Debug, Default)]
struct Args {
    filename: Option<String>,
    lex_only: bool,
    parse_only: bool,
    type_check_only: bool,
    show_help: bool,
    show_version: bool,
}

impl Args {
    fn parse() -> Self {
        let raw: Vec<String> = env::args().collect();
        let mut parsed = Args::default();

        for arg in raw.iter().skip(1) {
            match arg.as_str() {
                "-h" | "--help" => parsed.show_help = true,
                "-v" | "--version" => parsed.show_version = true,
                "-l" => parsed.lex_only = true,
                "-p" => parsed.parse_only = true,
                "-t" => parsed.type_check_only = true,
                other if !other.starts_with('-') => {
                    if parsed.filename.is_none() {
                        parsed.filename = Some(other.to_string());
                    }
                }
                other => {
                    eprintln!("Unknown option: {other}");
                }
            }
        }

        parsed
    }
}

fn print_help() {
    println!(
        r#"jplc v{VERSION}

USAGE:
    jplc [-l|-p|-t] <filename>

OPTIONS:
    -h, --help       Show this help message
    -v, --version    Show version information
    -l               Lex only: print one token kind per line
    -p               Parse only: stop after building the AST
    -t               Type-check only: stop after resolution

With none of -l/-p/-t, compiles the full program and writes the
assembly next to the input file, replacing its extension with `.s`.
"#
    );
}

fn print_version() {
    println!("jplc v{VERSION}");
}

fn main() {
    let args = Args::parse();

    if args.show_help {
        print_help();
        return;
    }

    if args.show_version {
        print_version();
        return;
    }

    let Some(filename) = args.filename else {
        eprintln!("Compilation failed");
        eprintln!("no input file given");
        process::exit(1);
    };

    let source = match fs::read_to_string(&filename) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Compilation failed");
            eprintln!("could not read '{filename}': {e}");
            process::exit(1);
        }
    };

    let outcome = if args.lex_only {
        run_lex_only(&source)
    } else if args.parse_only {
        run_parse_only(&source)
    } else if args.type_check_only {
        run_type_check_only(&source)
    } else {
        run_full_compile(&source, &filename)
    };

    if let Err(e) = outcome {
        eprintln!("Compilation failed");
        eprintln!("{e}");
        process::exit(1);
    }
}

/// `-l`: tokenizes `source` and prints each token's kind, one per line,
/// with its literal text appended for everything but `NEWLINE` and
/// `END_OF_FILE`.
fn run_lex_only(source: &str) -> Result<(), CompileError> {
    let source_map = SourceMap::new(source);
    let tokens = tokenize(source, &source_map)?;
    for spanned in &tokens {
        print!("{}", spanned.token.kind_name());
        if !matches!(
            spanned.token,
            jplc_parser::token::Token::Newline | jplc_parser::token::Token::EndOfFile
        ) {
            print!(" '{}'", spanned.text);
        }
        println!();
    }
    println!("Compilation succeeded: lexical analysis complete");
    Ok(())
}

/// `-p`: parses `source` and discards the AST.
fn run_parse_only(source: &str) -> Result<(), CompileError> {
    jplc_parser::parse(source)?;
    println!("Compilation succeeded: parsing complete");
    Ok(())
}

/// `-t`: parses and resolves `source`, discarding the resolver.
fn run_type_check_only(source: &str) -> Result<(), CompileError> {
    let program = jplc_parser::parse(source)?;
    jplc::resolve::resolve(&program)?;
    println!("Compilation succeeded: type-checking complete");
    Ok(())
}

/// Full compile: writes the emitted assembly next to `filename`, with
/// its extension replaced by `.s`.
fn run_full_compile(source: &str, filename: &str) -> Result<(), CompileError> {
    let assembly = jplc::compile(source)?;
    let output_path = Path::new(filename).with_extension("s");
    if let Err(e) = fs::write(&output_path, assembly) {
        eprintln!("Compilation failed");
        eprintln!("could not write '{}': {e}", output_path.display());
        process::exit(1);
    }
    println!("Compilation succeeded");
    Ok(())
}
