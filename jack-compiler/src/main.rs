//! Jack Compiler - Main Entry Point
//!
//! # Usage
//! ```bash
//! compile --input Main.jack
//! compile --input ProgramDir/
//! compile --input ProgramDir/ --xml
//! ```
//!
//! Each `.jack` input produces one sibling output file: `X.vm` normally,
//! or `X.xml` (the structural parse tree) with `--xml`.

#![warn(clippy::all)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use jack_compiler::tokenizer::tokenize;
use jack_compiler::vm_compiler::VmCompiler;
use jack_compiler::xml_compiler::XmlCompiler;
use nand_common::{read_lines, Diagnostic};

struct Args {
    input: PathBuf,
    xml: bool,
}

fn parse_args() -> std::result::Result<Args, String> {
    let mut input = None;
    let mut xml = false;
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--input" => {
                input = Some(PathBuf::from(
                    iter.next().ok_or("--input requires a value")?,
                ));
            }
            "--xml" => xml = true,
            other => return Err(format!("unrecognized argument: {other}")),
        }
    }

    Ok(Args {
        input: input.ok_or("--input <FILE.jack|DIR> is required")?,
        xml,
    })
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Usage: compile --input <FILE.jack|DIR> [--xml]");
            process::exit(1);
        }
    };

    if let Err(diagnostic) = run(&args) {
        eprintln!("{diagnostic}");
        process::exit(1);
    }
}

fn run(args: &Args) -> std::result::Result<(), Diagnostic> {
    let jack_paths = collect_jack_files(&args.input)
        .map_err(|e| Diagnostic::new(args.input.display().to_string(), None, e))?;

    for path in &jack_paths {
        compile_one(path, args.xml)?;
    }

    println!("Compiled {} file(s) from {}", jack_paths.len(), args.input.display());
    Ok(())
}

fn compile_one(path: &Path, xml: bool) -> std::result::Result<(), Diagnostic> {
    let label = path.display().to_string();
    let lines = read_lines(path).map_err(|e| Diagnostic::new(label.clone(), None, e.to_string()))?;

    let tokens = tokenize(&lines).map_err(|e| Diagnostic::new(label.clone(), e.line(), e.to_string()))?;

    let output_lines = if xml {
        XmlCompiler::new(&tokens)
            .compile_class()
            .map_err(|e| Diagnostic::new(label.clone(), e.line(), e.to_string()))?
    } else {
        VmCompiler::new(&tokens)
            .compile_class()
            .map_err(|e| Diagnostic::new(label.clone(), e.line(), e.to_string()))?
    };

    let output_path = path.with_extension(if xml { "xml" } else { "vm" });
    write_output(&output_path, &output_lines)
        .map_err(|e| Diagnostic::new(output_path.display().to_string(), None, e.to_string()))
}

fn write_output(path: &Path, lines: &[String]) -> std::io::Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}

/// Single `.jack` file, or every `.jack` file in a directory (sorted for
/// deterministic, reproducible compilation order).
fn collect_jack_files(input: &Path) -> std::result::Result<Vec<PathBuf>, String> {
    if input.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(input)
            .map_err(|e| e.to_string())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "jack"))
            .collect();
        files.sort();
        if files.is_empty() {
            return Err(format!("no .jack files found in {}", input.display()));
        }
        Ok(files)
    } else if input.extension().is_some_and(|ext| ext == "jack") {
        Ok(vec![input.to_path_buf()])
    } else {
        Err(format!("expected a .jack file or directory, got {}", input.display()))
    }
}
