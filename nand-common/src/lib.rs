//! Shared infrastructure for the Nand2Tetris toolchain.
//!
//! Every stage (assembler, VM translator, Jack compiler) is single-pass
//! (or two-pass) over one compilation unit and halts that unit on the
//! first error. This crate gives all three a common diagnostic shape and
//! a common way to read a file into an ordered line buffer, so the CLI
//! layer of each binary doesn't reinvent either.

#![warn(clippy::all)]

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A fatal, line-attributed error surfaced to the CLI.
///
/// All three front ends halt the affected compilation unit on the first
/// error and report exactly one of these per run.
#[derive(Debug, thiserror::Error)]
pub struct Diagnostic {
    pub file: String,
    /// 1-based source line, or `None` for errors with no single line
    /// (e.g. "input file not found").
    pub line: Option<u32>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, line: impl Into<Option<u32>>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: line.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.file, line, self.message),
            None => write!(f, "{}: {}", self.file, self.message),
        }
    }
}

/// Reads a file into an ordered, owned buffer of lines.
///
/// This is the one piece of file I/O shared by all three CLIs; each
/// engine itself only ever consumes `&[String]` (or an iterator of
/// lines), never a `Path`, so the core stays testable without touching
/// the filesystem.
pub fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let file = File::open(path)?;
    BufReader::new(file).lines().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_with_line_formats_as_file_colon_line() {
        let d = Diagnostic::new("Foo.asm", Some(3), "duplicate label LOOP");
        assert_eq!(d.to_string(), "Foo.asm:3: duplicate label LOOP");
    }

    #[test]
    fn diagnostic_without_line_omits_it() {
        let d = Diagnostic::new("Foo.asm", None, "file not found");
        assert_eq!(d.to_string(), "Foo.asm: file not found");
    }
}
