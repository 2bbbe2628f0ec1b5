//! Parser module for Jack VM code.
//!
//! Mirrors `hack_assembler::parser`: zero-copy line scanning over an
//! in-memory `&[String]`, with 1-based line-number tracking so callers
//! can attach a diagnostic to the offending source line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Return,
    Call,
}

#[derive(Debug)]
pub enum ParserError {
    UnknownCommand(String),
    MissingArgument { command: String, arg: &'static str },
    InvalidIndex(String),
    NoCurrentCommand,
}

impl std::error::Error for ParserError {}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(cmd) => write!(f, "unknown VM command '{cmd}'"),
            Self::MissingArgument { command, arg } => {
                write!(f, "'{command}' is missing its {arg} argument")
            }
            Self::InvalidIndex(s) => write!(f, "'{s}' is not a valid index"),
            Self::NoCurrentCommand => write!(f, "no current command available"),
        }
    }
}

/// Parser over the lines of a single `.vm` file.
pub struct VmParser<'a> {
    lines: std::iter::Enumerate<std::slice::Iter<'a, String>>,
    current_line_no: u32,
    parts: Vec<&'a str>,
}

impl<'a> VmParser<'a> {
    #[must_use]
    pub fn from_lines(lines: &'a [String]) -> Self {
        Self {
            lines: lines.iter().enumerate(),
            current_line_no: 0,
            parts: Vec::new(),
        }
    }

    /// Advances to the next non-blank, non-comment command.
    pub fn advance(&mut self) -> bool {
        for (idx, line) in self.lines.by_ref() {
            let without_comment = match line.find("//") {
                Some(pos) => &line[..pos],
                None => line.as_str(),
            };
            let trimmed = without_comment.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.current_line_no = idx as u32 + 1;
            self.parts = trimmed.split_whitespace().collect();
            return true;
        }
        self.parts.clear();
        false
    }

    #[must_use]
    pub fn line_number(&self) -> u32 {
        self.current_line_no
    }

    pub fn command_type(&self) -> Result<CommandType, ParserError> {
        let head = self.parts.first().ok_or(ParserError::NoCurrentCommand)?;
        match *head {
            "push" => Ok(CommandType::Push),
            "pop" => Ok(CommandType::Pop),
            "label" => Ok(CommandType::Label),
            "goto" => Ok(CommandType::Goto),
            "if-goto" => Ok(CommandType::If),
            "function" => Ok(CommandType::Function),
            "return" => Ok(CommandType::Return),
            "call" => Ok(CommandType::Call),
            "add" | "sub" | "neg" | "eq" | "gt" | "lt" | "and" | "or" | "not" => {
                Ok(CommandType::Arithmetic)
            }
            other => Err(ParserError::UnknownCommand(other.to_string())),
        }
    }

    /// First argument: the arithmetic mnemonic itself, or the segment/label
    /// name. Never called for `return`.
    pub fn arg1(&self) -> Result<&'a str, ParserError> {
        let cmd_type = self.command_type()?;
        match cmd_type {
            CommandType::Arithmetic => Ok(self.parts[0]),
            CommandType::Return => Err(ParserError::MissingArgument {
                command: "return".to_string(),
                arg: "arg1",
            }),
            _ => self.parts.get(1).copied().ok_or(ParserError::MissingArgument {
                command: self.parts[0].to_string(),
                arg: "arg1",
            }),
        }
    }

    /// Second argument: the index/count for push/pop/function/call.
    pub fn arg2(&self) -> Result<i32, ParserError> {
        let raw = self
            .parts
            .get(2)
            .ok_or_else(|| ParserError::MissingArgument {
                command: self.parts.first().copied().unwrap_or("").to_string(),
                arg: "arg2",
            })?;
        raw.parse()
            .map_err(|_| ParserError::InvalidIndex((*raw).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn classifies_every_command_kind() {
        let src = lines(
            "push constant 7\npop local 2\nadd\nlabel LOOP\ngoto LOOP\n\
             if-goto LOOP\nfunction Main.main 0\ncall Main.main 0\nreturn",
        );
        let mut p = VmParser::from_lines(&src);
        let expected = [
            CommandType::Push,
            CommandType::Pop,
            CommandType::Arithmetic,
            CommandType::Label,
            CommandType::Goto,
            CommandType::If,
            CommandType::Function,
            CommandType::Call,
            CommandType::Return,
        ];
        for want in expected {
            assert!(p.advance());
            assert_eq!(p.command_type().unwrap(), want);
        }
        assert!(!p.advance());
    }

    #[test]
    fn skips_blank_lines_and_comments_while_tracking_line_numbers() {
        let src = lines("// header\n\npush constant 1\n   // trailing\nadd");
        let mut p = VmParser::from_lines(&src);
        assert!(p.advance());
        assert_eq!(p.line_number(), 3);
        assert!(p.advance());
        assert_eq!(p.line_number(), 5);
    }

    #[test]
    fn push_pop_arguments() {
        let src = lines("push local 3");
        let mut p = VmParser::from_lines(&src);
        p.advance();
        assert_eq!(p.arg1().unwrap(), "local");
        assert_eq!(p.arg2().unwrap(), 3);
    }

    #[test]
    fn unknown_command_is_an_error() {
        let src = lines("frobnicate 1 2");
        let mut p = VmParser::from_lines(&src);
        p.advance();
        assert!(matches!(
            p.command_type(),
            Err(ParserError::UnknownCommand(ref s)) if s == "frobnicate"
        ));
    }
}
