//! Drives the parser/code-writer pair over one or many `.vm` files.
//!
//! Mirrors `hack_assembler::engine`: a small free-function layer that
//! is directly testable without touching disk, with `main.rs` only
//! responsible for reading input and writing the assembled output.

use std::io::Write;

use crate::code_writer::{CodeWriter, CodeWriterError};
use crate::parser::{CommandType, ParserError, VmParser};

#[derive(Debug, thiserror::Error)]
pub enum TranslatorError {
    #[error("{0}")]
    Parser(#[from] ParserError),
    #[error("{0}")]
    CodeWriter(#[from] CodeWriterError),
}

/// A translator error paired with the source file and line that caused it.
pub struct FileLineError {
    pub file: String,
    pub line: u32,
    pub error: TranslatorError,
}

/// One `.vm` file's name and contents.
pub struct VmFile<'a> {
    pub name: &'a str,
    pub lines: &'a [String],
}

/// Translates a single file's commands, without bootstrap or file-name
/// bookkeeping — callers that only ever see one file use this directly.
pub fn translate_file<W: Write>(
    file: &VmFile<'_>,
    writer: &mut CodeWriter<W>,
) -> Result<(), FileLineError> {
    writer.set_filename(file.name);
    let mut parser = VmParser::from_lines(file.lines);

    while parser.advance() {
        let line = parser.line_number();
        translate_command(&mut parser, writer).map_err(|error| FileLineError {
            file: file.name.to_string(),
            line,
            error,
        })?;
    }

    Ok(())
}

fn translate_command<W: Write>(
    parser: &mut VmParser<'_>,
    writer: &mut CodeWriter<W>,
) -> Result<(), TranslatorError> {
    match parser.command_type()? {
        CommandType::Arithmetic => writer.write_arithmetic(parser.arg1()?)?,
        CommandType::Push => writer.write_push_pop("push", parser.arg1()?, parser.arg2()?)?,
        CommandType::Pop => writer.write_push_pop("pop", parser.arg1()?, parser.arg2()?)?,
        CommandType::Label => writer.write_label(parser.arg1()?)?,
        CommandType::Goto => writer.write_goto(parser.arg1()?)?,
        CommandType::If => writer.write_if(parser.arg1()?)?,
        CommandType::Function => writer.write_function(parser.arg1()?, parser.arg2()?)?,
        CommandType::Call => writer.write_call(parser.arg1()?, parser.arg2()?)?,
        CommandType::Return => writer.write_return()?,
    }
    Ok(())
}

/// Translates every file in `files`, in order, emitting a bootstrap
/// prologue first when `bootstrap` is set — directory-mode input always
/// sets it, single-file input never does.
pub fn translate_program<W: Write>(
    files: &[VmFile<'_>],
    writer: &mut CodeWriter<W>,
    bootstrap: bool,
) -> Result<(), FileLineError> {
    if bootstrap {
        writer.write_bootstrap().map_err(|error| FileLineError {
            file: "<bootstrap>".to_string(),
            line: 0,
            error: error.into(),
        })?;
    }

    for file in files {
        translate_file(file, writer)?;
    }

    writer.flush().map_err(|error| FileLineError {
        file: files.last().map_or("<output>", |f| f.name).to_string(),
        line: 0,
        error: error.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn single_file_has_no_bootstrap() {
        let src = lines("push constant 7\npush constant 8\nadd");
        let file = VmFile {
            name: "Add.vm",
            lines: &src,
        };
        let mut writer = CodeWriter::new(Vec::new());
        translate_program(&[file], &mut writer, false).unwrap();
        let asm = String::from_utf8(writer.into_inner()).unwrap();
        assert!(!asm.contains("Sys.init"));
        assert!(asm.contains("@7"));
    }

    #[test]
    fn directory_mode_emits_bootstrap_first() {
        let sys = lines("function Sys.init 0\ncall Main.main 0\nreturn");
        let main = lines("function Main.main 0\npush constant 1\nreturn");
        let files = [
            VmFile {
                name: "Sys.vm",
                lines: &sys,
            },
            VmFile {
                name: "Main.vm",
                lines: &main,
            },
        ];
        let mut writer = CodeWriter::new(Vec::new());
        translate_program(&files, &mut writer, true).unwrap();
        let asm = String::from_utf8(writer.into_inner()).unwrap();
        let bootstrap_pos = asm.find("@Sys.init").unwrap();
        let sys_fn_pos = asm.find("(Sys.init)").unwrap();
        assert!(bootstrap_pos < sys_fn_pos);
    }

    #[test]
    fn unknown_command_reports_file_and_line() {
        let src = lines("push constant 1\nfrobnicate");
        let file = VmFile {
            name: "Bad.vm",
            lines: &src,
        };
        let mut writer = CodeWriter::new(Vec::new());
        let err = translate_program(&[file], &mut writer, false).unwrap_err();
        assert_eq!(err.file, "Bad.vm");
        assert_eq!(err.line, 2);
    }
}
