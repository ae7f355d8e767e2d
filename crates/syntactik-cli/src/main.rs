//! Syntactik command line tool.
//!
//! `syntactik check` parses a document and reports diagnostics; `syntactik
//! tree` additionally prints the parsed tree as an indented outline. Both
//! read from a file or from stdin (`-`), and both always run the input to
//! completion: a malformed document produces diagnostics and a partial
//! tree, not an early abort.

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use syntactik_parse::ParseError;
use syntactik_tree::{diagnostic, parse};
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: u8 = 0;
const EXIT_SYNTAX_ERROR: u8 = 1;
const EXIT_IO_ERROR: u8 = 3;

/// Tooling for the Syntactik notation.
#[derive(Parser)]
#[command(name = "syntactik", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a document and report diagnostics.
    Check {
        /// Input file, or `-` for stdin.
        input: String,
        /// Emit diagnostics as JSON on stdout instead of reports on stderr.
        #[arg(long)]
        json: bool,
    },
    /// Parse a document and print its tree as an indented outline.
    Tree {
        /// Input file, or `-` for stdin.
        input: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    match run(Cli::parse()) {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(EXIT_IO_ERROR)
        }
    }
}

fn run(cli: Cli) -> io::Result<u8> {
    match cli.command {
        Command::Check { input, json } => {
            let (filename, source) = read_input(&input)?;
            let (_, errors) = parse(&source);
            if json {
                println!("{}", diagnostics_json(&errors));
            } else {
                report(&errors, &filename, &source);
            }
            Ok(exit_code(&errors))
        }
        Command::Tree { input } => {
            let (filename, source) = read_input(&input)?;
            let (doc, errors) = parse(&source);
            print!("{}", doc.outline());
            report(&errors, &filename, &source);
            Ok(exit_code(&errors))
        }
    }
}

fn exit_code(errors: &[ParseError]) -> u8 {
    if errors.is_empty() {
        EXIT_SUCCESS
    } else {
        EXIT_SYNTAX_ERROR
    }
}

fn read_input(input: &str) -> io::Result<(String, String)> {
    if input == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(("<stdin>".to_string(), source))
    } else {
        Ok((input.to_string(), fs::read_to_string(input)?))
    }
}

fn report(errors: &[ParseError], filename: &str, source: &str) {
    let mut stderr = io::stderr().lock();
    for error in errors {
        diagnostic::write_report(error, filename, source, &mut stderr);
    }
}

fn diagnostics_json(errors: &[ParseError]) -> serde_json::Value {
    serde_json::Value::Array(
        errors
            .iter()
            .map(|error| {
                serde_json::json!({
                    "code": error.kind.code(),
                    "message": error.kind.to_string(),
                    "line": error.span.begin.line,
                    "column": error.span.begin.column,
                })
            })
            .collect(),
    )
}
