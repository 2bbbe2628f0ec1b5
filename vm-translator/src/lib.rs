//! VM Translator for the `Nand2Tetris` course
//!
//! Translates the Jack stack-machine VM language into Hack assembly:
//! arithmetic/logical commands, the eight memory segments, branching,
//! and function call/return with a directory-mode bootstrap.
//!
//! # Architecture
//!
//! - [`parser`]: line-number-tracking parsing of VM commands
//! - [`code_writer`]: one `write_*` method per VM command family
//! - [`engine`]: drives parser + writer over one or many files
//!
//! # Example
//!
//! ```rust
//! use vm_translator::code_writer::CodeWriter;
//! use vm_translator::engine::{translate_program, VmFile};
//!
//! let lines: Vec<String> = "push constant 2\npush constant 3\nadd"
//!     .lines()
//!     .map(str::to_string)
//!     .collect();
//! let file = VmFile { name: "Add.vm", lines: &lines };
//! let mut writer = CodeWriter::new(Vec::new());
//! translate_program(&[file], &mut writer, false).unwrap();
//! let asm = String::from_utf8(writer.into_inner()).unwrap();
//! assert!(asm.contains("@SP"));
//! ```

#![warn(clippy::all)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod code_writer;
pub mod engine;
pub mod parser;

pub use code_writer::{CodeWriter, CodeWriterError};
pub use engine::{translate_program, FileLineError, TranslatorError, VmFile};
pub use parser::{CommandType, ParserError, VmParser};
