//! Jack compiler for the `Nand2Tetris` course.
//!
//! Tokenizes a `.jack` class into a flat [`token::Token`] stream, then
//! drives one of two independent consumers over it: [`vm_compiler`]
//! (symbol tables + VM code generation) or [`xml_compiler`] (structural
//! parse-tree dump, for debugging against the course's own test suite).
//!
//! # Architecture
//!
//! - [`token`]/[`tokenizer`]: lexer, an explicit state machine
//! - [`cursor`]: shared token-stream navigation
//! - [`symbol_table`]: two-scope (class/subroutine) symbol tracking
//! - [`vm_writer`]: one `write_*` method per VM command family
//! - [`vm_compiler`]: semantic compiler, emits VM code
//! - [`xml_compiler`]: structural compiler, emits a parse-tree dump
//!
//! # Example
//!
//! ```rust
//! use jack_compiler::tokenizer::tokenize;
//! use jack_compiler::vm_compiler::VmCompiler;
//!
//! let src: Vec<String> = "class Main {\n  function void main() {\n    return;\n  }\n}"
//!     .lines()
//!     .map(str::to_string)
//!     .collect();
//! let tokens = tokenize(&src).unwrap();
//! let vm = VmCompiler::new(&tokens).compile_class().unwrap();
//! assert_eq!(vm, vec!["function Main.main 0", "push constant 0", "return"]);
//! ```

#![warn(clippy::all)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod cursor;
pub mod error;
pub mod symbol_table;
pub mod token;
pub mod tokenizer;
pub mod vm_compiler;
pub mod vm_writer;
pub mod xml_compiler;

pub use error::CompilerError;
pub use tokenizer::tokenize;
pub use vm_compiler::VmCompiler;
pub use xml_compiler::XmlCompiler;
