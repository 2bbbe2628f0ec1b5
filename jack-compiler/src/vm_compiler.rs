//! Recursive-descent Jack compiler: walks the token stream and emits VM
//! commands directly, tracking a two-scope symbol table as it goes.
//!
//! Independent of [`crate::xml_compiler::XmlCompiler`] — both share only
//! the token stream and [`crate::cursor::Cursor`]; neither inherits from
//! the other, so a change to one's grammar walk can't silently break the
//! other.

use crate::cursor::Cursor;
use crate::error::CompilerError;
use crate::symbol_table::{Kind, Symbol, SymbolTable};
use crate::token::{Keyword, Token, TokenKind};
use crate::vm_writer::{Segment, VmWriter};

pub struct VmCompiler<'a> {
    cursor: Cursor<'a>,
    symbols: SymbolTable,
    writer: VmWriter,
    class_name: String,
    label_counter: u32,
}

impl<'a> VmCompiler<'a> {
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            symbols: SymbolTable::new(),
            writer: VmWriter::new(),
            class_name: String::new(),
            label_counter: 0,
        }
    }

    pub fn compile_class(mut self) -> Result<Vec<String>, CompilerError> {
        self.symbols.start_class();
        self.cursor.expect_keyword(Keyword::Class)?;
        self.class_name = self.cursor.expect_identifier()?;
        self.cursor.expect_symbol('{')?;

        while self.cursor.at_keyword(Keyword::Static) || self.cursor.at_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }

        while self.cursor.at_keyword(Keyword::Constructor)
            || self.cursor.at_keyword(Keyword::Function)
            || self.cursor.at_keyword(Keyword::Method)
        {
            self.compile_subroutine()?;
        }

        self.cursor.expect_symbol('}')?;
        Ok(self.writer.into_lines())
    }

    fn compile_class_var_dec(&mut self) -> Result<(), CompilerError> {
        let kind = match self.cursor.advance()?.kind {
            TokenKind::Keyword(Keyword::Static) => Kind::Static,
            TokenKind::Keyword(Keyword::Field) => Kind::Field,
            _ => unreachable!("caller checked at_keyword"),
        };
        let type_name = self.parse_type()?;
        let name = self.cursor.expect_identifier()?;
        self.symbols.define(&name, &type_name, kind);

        while self.cursor.at_symbol(',') {
            self.cursor.expect_symbol(',')?;
            let name = self.cursor.expect_identifier()?;
            self.symbols.define(&name, &type_name, kind);
        }
        self.cursor.expect_symbol(';')
    }

    fn parse_type(&mut self) -> Result<String, CompilerError> {
        let line = self.cursor.current_line();
        let token = self.cursor.advance()?;
        match &token.kind {
            TokenKind::Keyword(Keyword::Int) => Ok("int".to_string()),
            TokenKind::Keyword(Keyword::Char) => Ok("char".to_string()),
            TokenKind::Keyword(Keyword::Boolean) => Ok("boolean".to_string()),
            TokenKind::Identifier(name) => Ok(name.clone()),
            other => Err(CompilerError::Syntax {
                line,
                message: format!("expected a type, found '{}'", type_repr(other)),
            }),
        }
    }

    fn compile_subroutine(&mut self) -> Result<(), CompilerError> {
        let subroutine_kind = self.cursor.advance()?.kind.clone();
        self.symbols.start_subroutine();

        if matches!(subroutine_kind, TokenKind::Keyword(Keyword::Method)) {
            self.symbols.define("this", &self.class_name.clone(), Kind::Argument);
        }

        if self.cursor.at_keyword(Keyword::Void) {
            self.cursor.expect_keyword(Keyword::Void)?;
        } else {
            self.parse_type()?;
        }
        let name = self.cursor.expect_identifier()?;
        let full_name = format!("{}.{name}", self.class_name);

        self.cursor.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.cursor.expect_symbol(')')?;

        self.cursor.expect_symbol('{')?;
        while self.cursor.at_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }
        let n_locals = self.symbols.var_count(Kind::Var);
        self.writer.write_function(&full_name, n_locals);

        match subroutine_kind {
            TokenKind::Keyword(Keyword::Constructor) => {
                let n_fields = self.symbols.var_count(Kind::Field);
                self.writer.write_push(Segment::Constant, n_fields);
                self.writer.write_call("Memory.alloc", 1);
                self.writer.write_pop(Segment::Pointer, 0);
            }
            TokenKind::Keyword(Keyword::Method) => {
                self.writer.write_push(Segment::Argument, 0);
                self.writer.write_pop(Segment::Pointer, 0);
            }
            _ => {}
        }

        self.compile_statements()?;
        self.cursor.expect_symbol('}')
    }

    fn compile_parameter_list(&mut self) -> Result<(), CompilerError> {
        if self.cursor.at_symbol(')') {
            return Ok(());
        }
        let type_name = self.parse_type()?;
        let name = self.cursor.expect_identifier()?;
        self.symbols.define(&name, &type_name, Kind::Argument);

        while self.cursor.at_symbol(',') {
            self.cursor.expect_symbol(',')?;
            let type_name = self.parse_type()?;
            let name = self.cursor.expect_identifier()?;
            self.symbols.define(&name, &type_name, Kind::Argument);
        }
        Ok(())
    }

    fn compile_var_dec(&mut self) -> Result<(), CompilerError> {
        self.cursor.expect_keyword(Keyword::Var)?;
        let type_name = self.parse_type()?;
        let name = self.cursor.expect_identifier()?;
        self.symbols.define(&name, &type_name, Kind::Var);

        while self.cursor.at_symbol(',') {
            self.cursor.expect_symbol(',')?;
            let name = self.cursor.expect_identifier()?;
            self.symbols.define(&name, &type_name, Kind::Var);
        }
        self.cursor.expect_symbol(';')
    }

    fn compile_statements(&mut self) -> Result<(), CompilerError> {
        loop {
            if self.cursor.at_keyword(Keyword::Let) {
                self.compile_let()?;
            } else if self.cursor.at_keyword(Keyword::If) {
                self.compile_if()?;
            } else if self.cursor.at_keyword(Keyword::While) {
                self.compile_while()?;
            } else if self.cursor.at_keyword(Keyword::Do) {
                self.compile_do()?;
            } else if self.cursor.at_keyword(Keyword::Return) {
                self.compile_return()?;
            } else {
                return Ok(());
            }
        }
    }

    fn compile_let(&mut self) -> Result<(), CompilerError> {
        self.cursor.expect_keyword(Keyword::Let)?;
        let line = self.cursor.current_line();
        let name = self.cursor.expect_identifier()?;

        if self.cursor.at_symbol('[') {
            self.cursor.expect_symbol('[')?;
            self.compile_expression()?;
            self.cursor.expect_symbol(']')?;
            self.push_symbol(&name, line)?;
            self.writer.write_arithmetic("add");

            self.cursor.expect_symbol('=')?;
            self.compile_expression()?;
            self.cursor.expect_symbol(';')?;

            self.writer.write_pop(Segment::Temp, 0);
            self.writer.write_pop(Segment::Pointer, 1);
            self.writer.write_push(Segment::Temp, 0);
            self.writer.write_pop(Segment::That, 0);
        } else {
            self.cursor.expect_symbol('=')?;
            self.compile_expression()?;
            self.cursor.expect_symbol(';')?;
            self.pop_symbol(&name, line)?;
        }
        Ok(())
    }

    fn compile_if(&mut self) -> Result<(), CompilerError> {
        self.cursor.expect_keyword(Keyword::If)?;
        let n = self.next_label();
        let else_label = format!("IF_ELSE_{n}");

        self.cursor.expect_symbol('(')?;
        self.compile_expression()?;
        self.cursor.expect_symbol(')')?;
        self.writer.write_arithmetic("not");
        self.writer.write_if(&else_label);

        self.cursor.expect_symbol('{')?;
        self.compile_statements()?;
        self.cursor.expect_symbol('}')?;

        if self.cursor.at_keyword(Keyword::Else) {
            let end_label = format!("IF_END_{n}");
            self.writer.write_goto(&end_label);
            self.writer.write_label(&else_label);

            self.cursor.expect_keyword(Keyword::Else)?;
            self.cursor.expect_symbol('{')?;
            self.compile_statements()?;
            self.cursor.expect_symbol('}')?;

            self.writer.write_label(&end_label);
        } else {
            self.writer.write_label(&else_label);
        }
        Ok(())
    }

    fn compile_while(&mut self) -> Result<(), CompilerError> {
        self.cursor.expect_keyword(Keyword::While)?;
        let n = self.next_label();
        let top_label = format!("WHILE_TOP_{n}");
        let end_label = format!("WHILE_END_{n}");

        self.writer.write_label(&top_label);
        self.cursor.expect_symbol('(')?;
        self.compile_expression()?;
        self.cursor.expect_symbol(')')?;
        self.writer.write_arithmetic("not");
        self.writer.write_if(&end_label);

        self.cursor.expect_symbol('{')?;
        self.compile_statements()?;
        self.cursor.expect_symbol('}')?;
        self.writer.write_goto(&top_label);
        self.writer.write_label(&end_label);
        Ok(())
    }

    fn compile_do(&mut self) -> Result<(), CompilerError> {
        self.cursor.expect_keyword(Keyword::Do)?;
        let line = self.cursor.current_line();
        let name = self.cursor.expect_identifier()?;
        self.compile_subroutine_call(&name, line)?;
        self.cursor.expect_symbol(';')?;
        self.writer.write_pop(Segment::Temp, 0);
        Ok(())
    }

    fn compile_return(&mut self) -> Result<(), CompilerError> {
        self.cursor.expect_keyword(Keyword::Return)?;
        if self.cursor.at_symbol(';') {
            self.writer.write_push(Segment::Constant, 0);
        } else {
            self.compile_expression()?;
        }
        self.cursor.expect_symbol(';')?;
        self.writer.write_return();
        Ok(())
    }

    fn compile_expression(&mut self) -> Result<(), CompilerError> {
        self.compile_term()?;
        loop {
            let op = match self.cursor.peek().map(|t| &t.kind) {
                Some(TokenKind::Symbol(c @ ('+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '='))) => *c,
                _ => break,
            };
            self.cursor.advance()?;
            self.compile_term()?;
            match op {
                '+' => self.writer.write_arithmetic("add"),
                '-' => self.writer.write_arithmetic("sub"),
                '&' => self.writer.write_arithmetic("and"),
                '|' => self.writer.write_arithmetic("or"),
                '<' => self.writer.write_arithmetic("lt"),
                '>' => self.writer.write_arithmetic("gt"),
                '=' => self.writer.write_arithmetic("eq"),
                '*' => self.writer.write_call("Math.multiply", 2),
                '/' => self.writer.write_call("Math.divide", 2),
                _ => unreachable!(),
            }
        }
        Ok(())
    }

    fn compile_term(&mut self) -> Result<(), CompilerError> {
        let line = self.cursor.current_line();
        let token = self.cursor.peek().ok_or(CompilerError::Syntax {
            line,
            message: "unexpected end of input in expression".to_string(),
        })?;

        match token.kind.clone() {
            TokenKind::IntConst(n) => {
                self.cursor.advance()?;
                self.writer.write_push(Segment::Constant, n);
            }
            TokenKind::StringConst(s) => {
                self.cursor.advance()?;
                self.compile_string_constant(&s);
            }
            TokenKind::Keyword(Keyword::True) => {
                self.cursor.advance()?;
                self.writer.write_push(Segment::Constant, 0);
                self.writer.write_arithmetic("not");
            }
            TokenKind::Keyword(Keyword::False | Keyword::Null) => {
                self.cursor.advance()?;
                self.writer.write_push(Segment::Constant, 0);
            }
            TokenKind::Keyword(Keyword::This) => {
                self.cursor.advance()?;
                self.writer.write_push(Segment::Pointer, 0);
            }
            TokenKind::Symbol('(') => {
                self.cursor.expect_symbol('(')?;
                self.compile_expression()?;
                self.cursor.expect_symbol(')')?;
            }
            TokenKind::Symbol(c @ ('-' | '~')) => {
                self.cursor.advance()?;
                self.compile_term()?;
                self.writer.write_arithmetic(if c == '-' { "neg" } else { "not" });
            }
            TokenKind::Identifier(name) => {
                self.cursor.advance()?;
                if self.cursor.at_symbol('[') {
                    self.cursor.expect_symbol('[')?;
                    self.compile_expression()?;
                    self.cursor.expect_symbol(']')?;
                    self.push_symbol(&name, line)?;
                    self.writer.write_arithmetic("add");
                    self.writer.write_pop(Segment::Pointer, 1);
                    self.writer.write_push(Segment::That, 0);
                } else if self.cursor.at_symbol('(') || self.cursor.at_symbol('.') {
                    self.compile_subroutine_call(&name, line)?;
                } else {
                    self.push_symbol(&name, line)?;
                }
            }
            other => {
                return Err(CompilerError::Syntax {
                    line,
                    message: format!("unexpected token '{}' in expression", type_repr(&other)),
                });
            }
        }
        Ok(())
    }

    fn compile_string_constant(&mut self, s: &str) {
        self.writer.write_push(Segment::Constant, s.chars().count() as u16);
        self.writer.write_call("String.new", 1);
        for c in s.chars() {
            self.writer.write_push(Segment::Constant, c as u16);
            self.writer.write_call("String.appendChar", 2);
        }
    }

    /// Dispatches `name(...)`, `name.sub(...)` on a known local/field
    /// (method call, implicit receiver pushed first), or
    /// `ClassName.sub(...)` (function/constructor call, no receiver).
    fn compile_subroutine_call(&mut self, name: &str, line: u32) -> Result<(), CompilerError> {
        if self.cursor.at_symbol('(') {
            self.cursor.expect_symbol('(')?;
            self.writer.write_push(Segment::Pointer, 0);
            let n_args = self.compile_expression_list()?;
            self.cursor.expect_symbol(')')?;
            self.writer
                .write_call(&format!("{}.{name}", self.class_name), n_args + 1);
            return Ok(());
        }

        self.cursor.expect_symbol('.')?;
        let member = self.cursor.expect_identifier()?;
        self.cursor.expect_symbol('(')?;

        if let Some(symbol) = self.symbols.lookup(name).cloned() {
            self.push_symbol_value(&symbol);
            let n_args = self.compile_expression_list()?;
            self.cursor.expect_symbol(')')?;
            self.writer
                .write_call(&format!("{}.{member}", symbol.type_name), n_args + 1);
        } else {
            let n_args = self.compile_expression_list()?;
            self.cursor.expect_symbol(')')?;
            self.writer.write_call(&format!("{name}.{member}"), n_args);
        }
        let _ = line;
        Ok(())
    }

    fn compile_expression_list(&mut self) -> Result<u16, CompilerError> {
        if self.cursor.at_symbol(')') {
            return Ok(0);
        }
        let mut count = 1;
        self.compile_expression()?;
        while self.cursor.at_symbol(',') {
            self.cursor.expect_symbol(',')?;
            self.compile_expression()?;
            count += 1;
        }
        Ok(count)
    }

    fn push_symbol(&mut self, name: &str, line: u32) -> Result<(), CompilerError> {
        let symbol = self.lookup_or_err(name, line)?;
        self.push_symbol_value(&symbol);
        Ok(())
    }

    fn push_symbol_value(&mut self, symbol: &Symbol) {
        self.writer.write_push(segment_for(symbol.kind), symbol.index);
    }

    fn pop_symbol(&mut self, name: &str, line: u32) -> Result<(), CompilerError> {
        let symbol = self.lookup_or_err(name, line)?;
        self.writer.write_pop(segment_for(symbol.kind), symbol.index);
        Ok(())
    }

    fn lookup_or_err(&self, name: &str, line: u32) -> Result<Symbol, CompilerError> {
        self.symbols
            .lookup(name)
            .cloned()
            .ok_or_else(|| CompilerError::Semantic {
                line,
                message: format!("undeclared variable '{name}'"),
            })
    }

    fn next_label(&mut self) -> u32 {
        let n = self.label_counter;
        self.label_counter += 1;
        n
    }
}

fn segment_for(kind: Kind) -> Segment {
    match kind {
        Kind::Static => Segment::Static,
        Kind::Field => Segment::This,
        Kind::Argument => Segment::Argument,
        Kind::Var => Segment::Local,
    }
}

fn type_repr(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Keyword(k) => k.to_string(),
        TokenKind::Symbol(c) => c.to_string(),
        TokenKind::IntConst(n) => n.to_string(),
        TokenKind::StringConst(s) => format!("\"{s}\""),
        TokenKind::Identifier(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn compile(src: &str) -> Vec<String> {
        let lines: Vec<String> = src.lines().map(str::to_string).collect();
        let tokens = tokenize(&lines).unwrap();
        VmCompiler::new(&tokens).compile_class().unwrap()
    }

    #[test]
    fn empty_function_emits_declaration_and_default_return() {
        let vm = compile("class Main {\n  function void main() {\n    return;\n  }\n}");
        assert_eq!(vm, vec!["function Main.main 0", "push constant 0", "return"]);
    }

    #[test]
    fn constructor_allocates_and_returns_this() {
        let vm = compile(
            "class Point {\n  field int x, y;\n  constructor Point new() {\n    return this;\n  }\n}",
        );
        assert_eq!(
            vm,
            vec![
                "function Point.new 0",
                "push constant 2",
                "call Memory.alloc 1",
                "pop pointer 0",
                "push pointer 0",
                "return",
            ]
        );
    }

    #[test]
    fn array_assignment_stages_address_before_evaluating_rhs() {
        let vm = compile(
            "class Main {\n  function void main() {\n    var Array v;\n    var int i;\n    let v[i] = 7;\n    return;\n  }\n}",
        );
        assert_eq!(
            vm,
            vec![
                "function Main.main 2",
                "push local 1",
                "push local 0",
                "add",
                "push constant 7",
                "pop temp 0",
                "pop pointer 1",
                "push temp 0",
                "pop that 0",
                "push constant 0",
                "return",
            ]
        );
    }

    #[test]
    fn method_call_on_local_object_pushes_receiver_first() {
        let vm = compile(
            "class Main {\n  function void main() {\n    var Point p;\n    do p.move(1, 2);\n    return;\n  }\n}",
        );
        assert_eq!(
            vm,
            vec![
                "function Main.main 1",
                "push local 0",
                "push constant 1",
                "push constant 2",
                "call Point.move 3",
                "pop temp 0",
                "push constant 0",
                "return",
            ]
        );
    }

    #[test]
    fn division_always_calls_math_divide() {
        let vm = compile("class Main {\n  function void main() {\n    do Math.divide(1, 2);\n    return;\n  }\n}");
        assert!(vm.contains(&"call Math.divide 2".to_string()));
    }

    #[test]
    fn if_without_else_omits_end_label_and_goto() {
        let vm = compile(
            "class Main {\n  function void main() {\n    if (true) {\n      do Main.main();\n    }\n    return;\n  }\n}",
        );
        assert_eq!(
            vm,
            vec![
                "function Main.main 0",
                "push constant 0",
                "not",
                "not",
                "if-goto IF_ELSE_0",
                "call Main.main 0",
                "pop temp 0",
                "label IF_ELSE_0",
                "push constant 0",
                "return",
            ]
        );
    }

    #[test]
    fn undeclared_variable_is_a_semantic_error() {
        let lines: Vec<String> = "class Main {\n  function void main() {\n    let x = 1;\n    return;\n  }\n}"
            .lines()
            .map(str::to_string)
            .collect();
        let tokens = tokenize(&lines).unwrap();
        let err = VmCompiler::new(&tokens).compile_class().unwrap_err();
        assert!(matches!(err, CompilerError::Semantic { .. }));
    }
}
