//! Hack Assembler - Main Entry Point
//!
//! A two-pass assembler for the Hack assembly language (`Nand2Tetris` Project 6).
//!
//! # Usage
//! ```bash
//! assemble --input Add.asm
//! assemble --input Add.asm --output Add.hack
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use hack_assembler::engine::assemble_program;
use nand_common::{read_lines, Diagnostic};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

struct Args {
    input: PathBuf,
    output: Option<PathBuf>,
}

fn parse_args() -> std::result::Result<Args, String> {
    let mut input = None;
    let mut output = None;
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--input" => {
                input = Some(PathBuf::from(
                    iter.next().ok_or("--input requires a value")?,
                ));
            }
            "--output" => {
                output = Some(PathBuf::from(
                    iter.next().ok_or("--output requires a value")?,
                ));
            }
            other => return Err(format!("unrecognized argument: {other}")),
        }
    }

    Ok(Args {
        input: input.ok_or("--input <FILE.asm> is required")?,
        output,
    })
}

fn output_path(input: &Path, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| input.with_extension("hack"))
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Usage: assemble --input <FILE.asm> [--output <FILE.hack>]");
            process::exit(1);
        }
    };

    if let Err(diagnostic) = run(&args) {
        eprintln!("{diagnostic}");
        process::exit(1);
    }
}

fn run(args: &Args) -> std::result::Result<(), Diagnostic> {
    let file_label = args.input.display().to_string();

    let lines = read_lines(&args.input)
        .map_err(|e| Diagnostic::new(file_label.clone(), None, e.to_string()))?;

    let hack = assemble_program(&lines)
        .map_err(|e| Diagnostic::new(file_label.clone(), Some(e.line), e.error.to_string()))?;

    let output = output_path(&args.input, args.output.clone());
    write_output(&output, &hack)
        .map_err(|e| Diagnostic::new(output.display().to_string(), None, e.to_string()))?;

    println!("Assembly completed. Output written to {}", output.display());
    Ok(())
}

fn write_output(path: &Path, lines: &[String]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_generation() {
        assert_eq!(
            output_path(Path::new("test.asm"), None),
            PathBuf::from("test.hack")
        );
        assert_eq!(
            output_path(Path::new("test.asm"), Some(PathBuf::from("custom.hack"))),
            PathBuf::from("custom.hack")
        );
        assert_eq!(
            output_path(Path::new("dir/file.asm"), None),
            PathBuf::from("dir/file.hack")
        );
    }
}
