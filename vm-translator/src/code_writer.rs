//! Translates parsed VM commands into Hack assembly text.
//!
//! One `write_*` method per VM command family, in the style of
//! `hack_assembler`'s two-pass `engine` module: each method appends
//! plain-text assembly lines to a generic `Write` sink, so tests can
//! target an in-memory buffer instead of a file.

use std::io::{self, Write};

macro_rules! write_asm {
    ($writer:expr, $($line:literal)*) => {
        $writer.write_all(concat!($($line, "\n"),*).as_bytes())
    };
}

#[derive(Clone, Copy)]
enum SegmentSymbol {
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
    Constant,
}

impl SegmentSymbol {
    fn from_str(segment: &str) -> Option<Self> {
        match segment {
            "local" => Some(Self::Local),
            "argument" => Some(Self::Argument),
            "this" => Some(Self::This),
            "that" => Some(Self::That),
            "temp" => Some(Self::Temp),
            "pointer" => Some(Self::Pointer),
            "static" => Some(Self::Static),
            "constant" => Some(Self::Constant),
            _ => None,
        }
    }

    fn base_symbol(self) -> &'static str {
        match self {
            Self::Local => "LCL",
            Self::Argument => "ARG",
            Self::This => "THIS",
            Self::That => "THAT",
            Self::Temp => "R5",
            Self::Pointer => "THIS",
            Self::Static | Self::Constant => unreachable!("handled separately"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodeWriterError {
    #[error("unknown segment '{0}'")]
    UnknownSegment(String),
    #[error("unknown arithmetic command '{0}'")]
    UnknownArithmetic(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct CodeWriter<W: Write> {
    output: W,
    label_counter: usize,
    call_counter: usize,
    filename: String,
    current_function: Option<String>,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            label_counter: 0,
            call_counter: 0,
            filename: String::new(),
            current_function: None,
        }
    }

    /// Sets the file-scope name used for `static` segment symbols and for
    /// the uniqueness prefix on arithmetic-comparison labels.
    pub fn set_filename(&mut self, filename: &str) {
        let name = std::path::Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown");
        self.filename.clear();
        self.filename.push_str(name);
    }

    /// Sets SP to 256 and calls `Sys.init`, for directory-mode translation.
    pub fn write_bootstrap(&mut self) -> Result<(), CodeWriterError> {
        write_asm!(self.output,
            "// bootstrap: SP=256"
            "@256"
            "D=A"
            "@SP"
            "M=D"
        )?;
        self.write_call("Sys.init", 0)
    }

    pub fn write_arithmetic(&mut self, command: &str) -> Result<(), CodeWriterError> {
        writeln!(self.output, "// vm command: {command}")?;
        match command {
            "add" => self.write_binary_op("D+M")?,
            "sub" => self.write_binary_op("D-M")?,
            "and" => self.write_binary_op("D&M")?,
            "or" => self.write_binary_op("D|M")?,
            "neg" => self.write_unary_op(true)?,
            "not" => self.write_unary_op(false)?,
            "eq" => self.write_comparison("JEQ")?,
            "gt" => self.write_comparison("JGT")?,
            "lt" => self.write_comparison("JLT")?,
            other => return Err(CodeWriterError::UnknownArithmetic(other.to_string())),
        }
        Ok(())
    }

    fn write_binary_op(&mut self, operation: &str) -> Result<(), CodeWriterError> {
        self.write_pop_to_d()?;
        write_asm!(self.output, "@R14" "M=D")?;
        self.write_pop_to_d()?;
        write_asm!(self.output, "@R13" "M=D" "@R13" "D=M" "@R14")?;
        writeln!(self.output, "D={operation}")?;
        self.write_push_d()?;
        Ok(())
    }

    fn write_unary_op(&mut self, is_neg: bool) -> Result<(), CodeWriterError> {
        self.write_pop_to_d()?;
        if is_neg {
            write_asm!(self.output, "@0" "D=A-D")?;
        } else {
            write_asm!(self.output, "D=!D")?;
        }
        self.write_push_d()?;
        Ok(())
    }

    fn write_comparison(&mut self, jump: &str) -> Result<(), CodeWriterError> {
        let label_prefix = match jump {
            "JEQ" => "EQ",
            "JGT" => "GT",
            "JLT" => "LT",
            other => other,
        };
        let label_num = self.label_counter;
        self.label_counter += 1;
        let filename = self.filename.clone();

        self.write_pop_to_d()?;
        write_asm!(self.output, "@R14" "M=D")?;
        self.write_pop_to_d()?;
        write_asm!(self.output, "@R13" "M=D" "@R13" "D=M" "@R14" "D=D-M")?;
        writeln!(self.output, "@{label_prefix}{label_num}.{filename}")?;
        writeln!(self.output, "D;{jump}")?;
        write_asm!(self.output, "@SP" "A=M" "M=0" "@SP" "M=M+1")?;
        writeln!(self.output, "@END{label_prefix}{label_num}.{filename}")?;
        writeln!(self.output, "0;JMP")?;
        writeln!(self.output, "({label_prefix}{label_num}.{filename})")?;
        write_asm!(self.output, "@SP" "A=M" "M=-1" "@SP" "M=M+1")?;
        writeln!(self.output, "(END{label_prefix}{label_num}.{filename})")?;
        Ok(())
    }

    pub fn write_push_pop(
        &mut self,
        command: &str,
        segment: &str,
        index: i32,
    ) -> Result<(), CodeWriterError> {
        writeln!(self.output, "// vm command: {command} {segment} {index}")?;
        if command == "push" {
            self.write_push(segment, index)
        } else {
            self.write_pop(segment, index)
        }
    }

    fn write_push(&mut self, segment: &str, index: i32) -> Result<(), CodeWriterError> {
        match SegmentSymbol::from_str(segment)
            .ok_or_else(|| CodeWriterError::UnknownSegment(segment.to_string()))?
        {
            SegmentSymbol::Constant => {
                writeln!(self.output, "@{index}")?;
                writeln!(self.output, "D=A")?;
                self.write_push_d()
            }
            seg @ (SegmentSymbol::Local
            | SegmentSymbol::Argument
            | SegmentSymbol::This
            | SegmentSymbol::That) => {
                writeln!(self.output, "@{}", seg.base_symbol())?;
                writeln!(self.output, "D=M")?;
                writeln!(self.output, "@{index}")?;
                writeln!(self.output, "A=D+A")?;
                writeln!(self.output, "D=M")?;
                self.write_push_d()
            }
            SegmentSymbol::Temp => {
                writeln!(self.output, "@R5")?;
                writeln!(self.output, "D=A")?;
                writeln!(self.output, "@{index}")?;
                writeln!(self.output, "A=D+A")?;
                writeln!(self.output, "D=M")?;
                self.write_push_d()
            }
            SegmentSymbol::Pointer => {
                writeln!(self.output, "@THIS")?;
                writeln!(self.output, "D=A")?;
                writeln!(self.output, "@{index}")?;
                writeln!(self.output, "A=D+A")?;
                writeln!(self.output, "D=M")?;
                self.write_push_d()
            }
            SegmentSymbol::Static => {
                writeln!(self.output, "@{}.{}", self.filename, index)?;
                writeln!(self.output, "D=M")?;
                self.write_push_d()
            }
        }
        .map_err(CodeWriterError::from)
    }

    fn write_pop(&mut self, segment: &str, index: i32) -> Result<(), CodeWriterError> {
        match SegmentSymbol::from_str(segment)
            .ok_or_else(|| CodeWriterError::UnknownSegment(segment.to_string()))?
        {
            seg @ (SegmentSymbol::Local
            | SegmentSymbol::Argument
            | SegmentSymbol::This
            | SegmentSymbol::That) => {
                writeln!(self.output, "@{}", seg.base_symbol())?;
                writeln!(self.output, "D=M")?;
                writeln!(self.output, "@{index}")?;
                writeln!(self.output, "D=D+A")?;
                write_asm!(self.output, "@R13" "M=D")?;
                self.write_pop_to_d()?;
                write_asm!(self.output, "@R13" "A=M" "M=D")
            }
            SegmentSymbol::Temp => {
                write_asm!(self.output, "@5" "D=A")?;
                writeln!(self.output, "@{index}")?;
                writeln!(self.output, "D=D+A")?;
                write_asm!(self.output, "@R13" "M=D")?;
                self.write_pop_to_d()?;
                write_asm!(self.output, "@R13" "A=M" "M=D")
            }
            SegmentSymbol::Pointer => {
                write_asm!(self.output, "@THIS" "D=A")?;
                writeln!(self.output, "@{index}")?;
                writeln!(self.output, "D=D+A")?;
                write_asm!(self.output, "@R13" "M=D")?;
                self.write_pop_to_d()?;
                write_asm!(self.output, "@R13" "A=M" "M=D")
            }
            SegmentSymbol::Static => {
                self.write_pop_to_d()?;
                writeln!(self.output, "@{}.{}", self.filename, index)?;
                writeln!(self.output, "M=D")
            }
            SegmentSymbol::Constant => {
                return Err(CodeWriterError::UnknownSegment("constant".to_string()))
            }
        }
        .map_err(CodeWriterError::from)
    }

    /// `label L` — scoped under the enclosing function, matching the
    /// course's own `Function$label` convention so two functions may
    /// reuse the same label text without colliding.
    pub fn write_label(&mut self, label: &str) -> Result<(), CodeWriterError> {
        writeln!(self.output, "({})", self.scoped_label(label))?;
        Ok(())
    }

    pub fn write_goto(&mut self, label: &str) -> Result<(), CodeWriterError> {
        writeln!(self.output, "@{}", self.scoped_label(label))?;
        writeln!(self.output, "0;JMP")?;
        Ok(())
    }

    pub fn write_if(&mut self, label: &str) -> Result<(), CodeWriterError> {
        self.write_pop_to_d()?;
        writeln!(self.output, "@{}", self.scoped_label(label))?;
        writeln!(self.output, "D;JNE")?;
        Ok(())
    }

    fn scoped_label(&self, label: &str) -> String {
        match &self.current_function {
            Some(f) => format!("{f}${label}"),
            None => label.to_string(),
        }
    }

    /// `function f n` — pseudo-label `(f)` followed by `n` zeroed locals.
    pub fn write_function(&mut self, name: &str, n_locals: i32) -> Result<(), CodeWriterError> {
        self.current_function = Some(name.to_string());
        writeln!(self.output, "({name})")?;
        for _ in 0..n_locals {
            writeln!(self.output, "@0")?;
            writeln!(self.output, "D=A")?;
            self.write_push_d()?;
        }
        Ok(())
    }

    /// `call f n` — saves the caller's frame, repositions ARG/LCL, jumps
    /// to `f`, and defines the unique return-address label it jumped in
    /// from.
    pub fn write_call(&mut self, name: &str, n_args: i32) -> Result<(), CodeWriterError> {
        let return_label = format!("RET.{}.{}", self.filename, self.call_counter);
        self.call_counter += 1;

        writeln!(self.output, "@{return_label}")?;
        writeln!(self.output, "D=A")?;
        self.write_push_d()?;
        for reg in ["LCL", "ARG", "THIS", "THAT"] {
            writeln!(self.output, "@{reg}")?;
            writeln!(self.output, "D=M")?;
            self.write_push_d()?;
        }

        write_asm!(self.output, "@SP" "D=M")?;
        writeln!(self.output, "@{}", n_args + 5)?;
        write_asm!(self.output, "D=D-A" "@ARG" "M=D" "@SP" "D=M" "@LCL" "M=D")?;
        writeln!(self.output, "@{name}")?;
        writeln!(self.output, "0;JMP")?;
        writeln!(self.output, "({return_label})")?;
        Ok(())
    }

    /// `return` — restores the caller's frame and jumps back to it.
    pub fn write_return(&mut self) -> Result<(), CodeWriterError> {
        write_asm!(self.output, "@LCL" "D=M" "@R13" "M=D")?; // FRAME = R13
        write_asm!(self.output, "@5" "D=A" "@R13" "D=M-D" "A=D" "D=M" "@R14" "M=D")?; // RET = R14
        write_asm!(self.output, "@SP" "M=M-1" "A=M" "D=M" "@ARG" "A=M" "M=D")?; // *ARG = pop()
        write_asm!(self.output, "@ARG" "D=M+1" "@SP" "M=D")?; // SP = ARG+1
        for (offset, dest) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            write_asm!(self.output, "@R13" "D=M")?;
            writeln!(self.output, "@{offset}")?;
            writeln!(self.output, "A=D-A")?;
            writeln!(self.output, "D=M")?;
            writeln!(self.output, "@{dest}")?;
            writeln!(self.output, "M=D")?;
        }
        write_asm!(self.output, "@R14" "A=M" "0;JMP")?;
        Ok(())
    }

    fn write_push_d(&mut self) -> Result<(), CodeWriterError> {
        write_asm!(self.output, "@SP" "A=M" "M=D" "@SP" "M=M+1")?;
        Ok(())
    }

    fn write_pop_to_d(&mut self) -> Result<(), CodeWriterError> {
        write_asm!(self.output, "@SP" "M=M-1" "A=M" "D=M")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), CodeWriterError> {
        self.output.flush()?;
        Ok(())
    }

    /// Unwraps the writer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.output
    }
}
