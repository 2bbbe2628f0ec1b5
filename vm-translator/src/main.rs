//! VM Translator - Main Entry Point
//!
//! # Usage
//! ```bash
//! translate --input Add.vm
//! translate --input ProgramDir/ --output Program.asm
//! ```

#![warn(clippy::all)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;

use nand_common::{read_lines, Diagnostic};
use vm_translator::code_writer::CodeWriter;
use vm_translator::engine::{translate_program, VmFile};

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
        input: input.ok_or("--input <FILE.vm|DIR> is required")?,
        output,
    })
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Usage: translate --input <FILE.vm|DIR> [--output <FILE.asm>]");
            process::exit(1);
        }
    };

    if let Err(diagnostic) = run(&args) {
        eprintln!("{diagnostic}");
        process::exit(1);
    }
}

fn run(args: &Args) -> std::result::Result<(), Diagnostic> {
    let vm_paths = collect_vm_files(&args.input)
        .map_err(|e| Diagnostic::new(args.input.display().to_string(), None, e))?;

    let mut file_contents = Vec::with_capacity(vm_paths.len());
    for path in &vm_paths {
        let lines = read_lines(path)
            .map_err(|e| Diagnostic::new(path.display().to_string(), None, e.to_string()))?;
        file_contents.push((path.clone(), lines));
    }

    let vm_files: Vec<VmFile<'_>> = file_contents
        .iter()
        .map(|(path, lines)| VmFile {
            name: path.file_name().and_then(|s| s.to_str()).unwrap_or("?"),
            lines,
        })
        .collect();

    let output_path = output_path(&args.input, args.output.clone());
    let output_file = File::create(&output_path)
        .map_err(|e| Diagnostic::new(output_path.display().to_string(), None, e.to_string()))?;
    let mut writer = CodeWriter::new(BufWriter::new(output_file));

    translate_program(&vm_files, &mut writer, args.input.is_dir()).map_err(|e| {
        Diagnostic::new(e.file, Some(e.line).filter(|&l| l > 0), e.error.to_string())
    })?;

    println!(
        "Translation complete: {} -> {}",
        args.input.display(),
        output_path.display()
    );
    Ok(())
}

/// Single `.vm` file, or every `.vm` file in a directory (sorted for
/// deterministic output, `Sys.vm` first when present so `Sys.init` is
/// defined close to the bootstrap call to it).
fn collect_vm_files(input: &Path) -> std::result::Result<Vec<PathBuf>, String> {
    if input.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(input)
            .map_err(|e| e.to_string())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "vm"))
            .collect();
        files.sort_by(|a, b| {
            let a_is_sys = a.file_stem().and_then(|s| s.to_str()) == Some("Sys");
            let b_is_sys = b.file_stem().and_then(|s| s.to_str()) == Some("Sys");
            b_is_sys.cmp(&a_is_sys).then_with(|| a.cmp(b))
        });
        if files.is_empty() {
            return Err(format!("no .vm files found in {}", input.display()));
        }
        Ok(files)
    } else if input.extension().is_some_and(|ext| ext == "vm") {
        Ok(vec![input.to_path_buf()])
    } else {
        Err(format!("expected a .vm file or directory, got {}", input.display()))
    }
}

fn output_path(input: &Path, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        if input.is_dir() {
            let name = input
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("Program");
            input.join(format!("{name}.asm"))
        } else {
            input.with_extension("asm")
        }
    })
}
