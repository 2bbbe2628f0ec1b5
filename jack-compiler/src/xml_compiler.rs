//! Purely structural XML debug writer: walks the same grammar as
//! [`crate::vm_compiler::VmCompiler`] but tracks no symbol table and
//! emits no VM code, only the parse tree. Independent implementation —
//! it does not call into or subclass the VM compiler.

use crate::cursor::Cursor;
use crate::error::CompilerError;
use crate::token::{Keyword, Token, TokenKind};

pub struct XmlCompiler<'a> {
    cursor: Cursor<'a>,
    out: Vec<String>,
    indent: usize,
}

impl<'a> XmlCompiler<'a> {
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            out: Vec::new(),
            indent: 0,
        }
    }

    pub fn compile_class(mut self) -> Result<Vec<String>, CompilerError> {
        self.open("class");
        self.expect_keyword(Keyword::Class)?;
        self.expect_identifier()?;
        self.expect_symbol('{')?;

        while self.cursor.at_keyword(Keyword::Static) || self.cursor.at_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }
        while self.cursor.at_keyword(Keyword::Constructor)
            || self.cursor.at_keyword(Keyword::Function)
            || self.cursor.at_keyword(Keyword::Method)
        {
            self.compile_subroutine_dec()?;
        }

        self.expect_symbol('}')?;
        self.close("class");
        Ok(self.out)
    }

    fn compile_class_var_dec(&mut self) -> Result<(), CompilerError> {
        self.open("classVarDec");
        self.emit_token()?;
        self.emit_token()?;
        self.expect_identifier()?;
        while self.cursor.at_symbol(',') {
            self.expect_symbol(',')?;
            self.expect_identifier()?;
        }
        self.expect_symbol(';')?;
        self.close("classVarDec");
        Ok(())
    }

    fn compile_subroutine_dec(&mut self) -> Result<(), CompilerError> {
        self.open("subroutineDec");
        self.emit_token()?;
        self.emit_token()?;
        self.expect_identifier()?;
        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;
        self.compile_subroutine_body()?;
        self.close("subroutineDec");
        Ok(())
    }

    fn compile_parameter_list(&mut self) -> Result<(), CompilerError> {
        self.open("parameterList");
        if !self.cursor.at_symbol(')') {
            self.emit_token()?;
            self.expect_identifier()?;
            while self.cursor.at_symbol(',') {
                self.expect_symbol(',')?;
                self.emit_token()?;
                self.expect_identifier()?;
            }
        }
        self.close("parameterList");
        Ok(())
    }

    fn compile_subroutine_body(&mut self) -> Result<(), CompilerError> {
        self.open("subroutineBody");
        self.expect_symbol('{')?;
        while self.cursor.at_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.close("subroutineBody");
        Ok(())
    }

    fn compile_var_dec(&mut self) -> Result<(), CompilerError> {
        self.open("varDec");
        self.expect_keyword(Keyword::Var)?;
        self.emit_token()?;
        self.expect_identifier()?;
        while self.cursor.at_symbol(',') {
            self.expect_symbol(',')?;
            self.expect_identifier()?;
        }
        self.expect_symbol(';')?;
        self.close("varDec");
        Ok(())
    }

    fn compile_statements(&mut self) -> Result<(), CompilerError> {
        self.open("statements");
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
                break;
            }
        }
        self.close("statements");
        Ok(())
    }

    fn compile_let(&mut self) -> Result<(), CompilerError> {
        self.open("letStatement");
        self.expect_keyword(Keyword::Let)?;
        self.expect_identifier()?;
        if self.cursor.at_symbol('[') {
            self.expect_symbol('[')?;
            self.compile_expression()?;
            self.expect_symbol(']')?;
        }
        self.expect_symbol('=')?;
        self.compile_expression()?;
        self.expect_symbol(';')?;
        self.close("letStatement");
        Ok(())
    }

    fn compile_if(&mut self) -> Result<(), CompilerError> {
        self.open("ifStatement");
        self.expect_keyword(Keyword::If)?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        if self.cursor.at_keyword(Keyword::Else) {
            self.expect_keyword(Keyword::Else)?;
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
        }
        self.close("ifStatement");
        Ok(())
    }

    fn compile_while(&mut self) -> Result<(), CompilerError> {
        self.open("whileStatement");
        self.expect_keyword(Keyword::While)?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.close("whileStatement");
        Ok(())
    }

    fn compile_do(&mut self) -> Result<(), CompilerError> {
        self.open("doStatement");
        self.expect_keyword(Keyword::Do)?;
        self.expect_identifier()?;
        self.compile_subroutine_call_tail()?;
        self.expect_symbol(';')?;
        self.close("doStatement");
        Ok(())
    }

    fn compile_return(&mut self) -> Result<(), CompilerError> {
        self.open("returnStatement");
        self.expect_keyword(Keyword::Return)?;
        if !self.cursor.at_symbol(';') {
            self.compile_expression()?;
        }
        self.expect_symbol(';')?;
        self.close("returnStatement");
        Ok(())
    }

    fn compile_expression(&mut self) -> Result<(), CompilerError> {
        self.open("expression");
        self.compile_term()?;
        while matches!(
            self.cursor.peek().map(|t| &t.kind),
            Some(TokenKind::Symbol('+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '='))
        ) {
            self.emit_token()?;
            self.compile_term()?;
        }
        self.close("expression");
        Ok(())
    }

    fn compile_term(&mut self) -> Result<(), CompilerError> {
        self.open("term");
        let line = self.cursor.current_line();
        let kind = self
            .cursor
            .peek()
            .ok_or(CompilerError::Syntax {
                line,
                message: "unexpected end of input in expression".to_string(),
            })?
            .kind
            .clone();

        match kind {
            TokenKind::IntConst(_) | TokenKind::StringConst(_) => {
                self.emit_token()?;
            }
            TokenKind::Keyword(Keyword::True | Keyword::False | Keyword::Null | Keyword::This) => {
                self.emit_token()?;
            }
            TokenKind::Symbol('(') => {
                self.expect_symbol('(')?;
                self.compile_expression()?;
                self.expect_symbol(')')?;
            }
            TokenKind::Symbol('-' | '~') => {
                self.emit_token()?;
                self.compile_term()?;
            }
            TokenKind::Identifier(_) => {
                self.emit_token()?;
                if self.cursor.at_symbol('[') {
                    self.expect_symbol('[')?;
                    self.compile_expression()?;
                    self.expect_symbol(']')?;
                } else if self.cursor.at_symbol('(') || self.cursor.at_symbol('.') {
                    self.compile_subroutine_call_tail()?;
                }
            }
            other => {
                return Err(CompilerError::Syntax {
                    line,
                    message: format!("unexpected token '{other:?}' in expression"),
                });
            }
        }
        self.close("term");
        Ok(())
    }

    fn compile_subroutine_call_tail(&mut self) -> Result<(), CompilerError> {
        if self.cursor.at_symbol('(') {
            self.expect_symbol('(')?;
            self.compile_expression_list()?;
            self.expect_symbol(')')?;
        } else {
            self.expect_symbol('.')?;
            self.expect_identifier()?;
            self.expect_symbol('(')?;
            self.compile_expression_list()?;
            self.expect_symbol(')')?;
        }
        Ok(())
    }

    fn compile_expression_list(&mut self) -> Result<(), CompilerError> {
        self.open("expressionList");
        if !self.cursor.at_symbol(')') {
            self.compile_expression()?;
            while self.cursor.at_symbol(',') {
                self.expect_symbol(',')?;
                self.compile_expression()?;
            }
        }
        self.close("expressionList");
        Ok(())
    }

    fn open(&mut self, tag: &str) {
        self.push_line(format!("<{tag}>"));
        self.indent += 1;
    }

    fn close(&mut self, tag: &str) {
        self.indent -= 1;
        self.push_line(format!("</{tag}>"));
    }

    fn push_line(&mut self, text: String) {
        self.out.push(format!("{}{text}", "  ".repeat(self.indent)));
    }

    fn emit_token(&mut self) -> Result<(), CompilerError> {
        let token = self.cursor.advance()?;
        let tag = token.xml_tag();
        let text = escape(&token.lexeme());
        self.push_line(format!("<{tag}> {text} </{tag}>"));
        Ok(())
    }

    fn expect_symbol(&mut self, c: char) -> Result<(), CompilerError> {
        if !self.cursor.at_symbol(c) {
            let line = self.cursor.current_line();
            return Err(CompilerError::Syntax {
                line,
                message: format!("expected '{c}'"),
            });
        }
        self.emit_token()
    }

    fn expect_keyword(&mut self, k: Keyword) -> Result<(), CompilerError> {
        if !self.cursor.at_keyword(k) {
            let line = self.cursor.current_line();
            return Err(CompilerError::Syntax {
                line,
                message: format!("expected keyword '{k}'"),
            });
        }
        self.emit_token()
    }

    fn expect_identifier(&mut self) -> Result<(), CompilerError> {
        let line = self.cursor.current_line();
        match self.cursor.peek().map(|t| &t.kind) {
            Some(TokenKind::Identifier(_)) => self.emit_token(),
            _ => Err(CompilerError::Syntax {
                line,
                message: "expected identifier".to_string(),
            }),
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
