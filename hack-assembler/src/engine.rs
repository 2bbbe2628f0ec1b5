//! Two-pass assembly engine: label binding, then code emission.
//!
//! Pulled out of `main.rs` so the algorithm is testable without going
//! through a file on disk.

use crate::code;
use crate::parser::{CommandType, ParserLines};
use crate::symbol_table::SymbolTable;

/// Highest address a 15-bit ROM/RAM pointer can name.
const MAX_ADDRESS: u32 = 32_767;

#[derive(Debug, thiserror::Error)]
pub enum AssemblerError {
    #[error("duplicate label ({0})")]
    DuplicateLabel(String),
    #[error("address {0} out of range (0..=32767)")]
    AddressOutOfRange(u32),
    #[error("{0}")]
    Parser(#[from] crate::parser::ParserError),
}

/// An assembly error paired with the line that caused it.
pub struct LineError {
    pub line: u32,
    pub error: AssemblerError,
}

/// Pass 1: binds every `(LABEL)` to the ROM address of the instruction
/// that follows it. Duplicate label definitions are fatal.
pub fn first_pass(lines: &[String], symbols: &mut SymbolTable) -> Result<(), LineError> {
    let mut rom_address: u16 = 0;
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        let line = parser.line_number();
        match parser.command_type().map_err(|e| to_line_error(line, e.into())) {
            Ok(CommandType::LCommand) => {
                let symbol = parser
                    .symbol()
                    .map_err(|e| to_line_error(line, e.into()))?;
                if symbols.contains(symbol) {
                    return Err(to_line_error(
                        line,
                        AssemblerError::DuplicateLabel(symbol.to_string()),
                    ));
                }
                symbols.add_entry(symbol, rom_address);
            }
            Ok(CommandType::ACommand | CommandType::CCommand) => {
                rom_address += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

/// Pass 2: resolves every symbol and emits one 16-character binary line
/// per A-/C-command (L-commands emit nothing).
pub fn assemble(lines: &[String], symbols: &mut SymbolTable) -> Result<Vec<String>, LineError> {
    let mut ram_address: u16 = 16;
    let mut parser = ParserLines::from_lines(lines);
    let mut output = Vec::with_capacity(lines.len());

    while parser.advance() {
        let line = parser.line_number();
        match parser.command_type().map_err(|e| to_line_error(line, e.into()))? {
            CommandType::ACommand => {
                let symbol = parser
                    .symbol()
                    .map_err(|e| to_line_error(line, e.into()))?;
                let address = match symbol.parse::<u32>() {
                    Ok(n) => {
                        if n > MAX_ADDRESS {
                            return Err(to_line_error(line, AssemblerError::AddressOutOfRange(n)));
                        }
                        n as u16
                    }
                    Err(_) => symbols.get_or_insert(symbol, &mut ram_address),
                };
                output.push(code::encode_a_instruction(address));
            }
            CommandType::CCommand => {
                let dest = parser.dest().map_err(|e| to_line_error(line, e.into()))?.unwrap_or("");
                let comp = parser.comp().map_err(|e| to_line_error(line, e.into()))?.unwrap_or("");
                let jump = parser.jump().map_err(|e| to_line_error(line, e.into()))?.unwrap_or("");
                output.push(code::encode_c_instruction(dest, comp, jump));
            }
            CommandType::LCommand => {}
        }
    }

    Ok(output)
}

/// Runs both passes over `lines`, returning the ordered `.hack` output.
pub fn assemble_program(lines: &[String]) -> Result<Vec<String>, LineError> {
    let mut symbols = SymbolTable::new();
    first_pass(lines, &mut symbols)?;
    assemble(lines, &mut symbols)
}

fn to_line_error(line: u32, error: AssemblerError) -> LineError {
    LineError { line, error }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn scenario_assembler_minimal() {
        let out = assemble_program(&lines("@2\nD=A\n@3\nD=D+A\n@0\nM=D")).unwrap();
        assert_eq!(
            out,
            vec![
                "0000000000000010",
                "1110110000010000",
                "0000000000000011",
                "1110000010010000",
                "0000000000000000",
                "1110001100001000",
            ]
        );
    }

    #[test]
    fn scenario_assembler_with_labels() {
        let out = assemble_program(&lines("@LOOP\n(LOOP)\n@LOOP\n0;JMP")).unwrap();
        assert_eq!(
            out,
            vec!["0000000000000001", "0000000000000001", "1110101010000111"]
        );
    }

    #[test]
    fn scenario_assembler_with_variables() {
        let out = assemble_program(&lines("@i\n@sum\n@i")).unwrap();
        assert_eq!(
            out,
            vec!["0000000000010000", "0000000000010001", "0000000000010000"]
        );
    }

    #[test]
    fn duplicate_label_is_fatal_with_line_number() {
        let err = assemble_program(&lines("(LOOP)\n@0\n(LOOP)")).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(matches!(err.error, AssemblerError::DuplicateLabel(ref s) if s == "LOOP"));
    }

    #[test]
    fn address_literal_above_15_bits_is_rejected() {
        let err = assemble_program(&lines("@40000")).unwrap_err();
        assert!(matches!(err.error, AssemblerError::AddressOutOfRange(40000)));
    }
}
