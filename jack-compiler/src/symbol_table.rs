//! Two-scope symbol table: class scope (static/field) and subroutine
//! scope (argument/var), each with its own zero-based index counter per
//! kind. Mirrors `hack_assembler::symbol_table::SymbolTable`'s shape —
//! a flat map plus small counters — generalized to two scopes and four
//! kinds instead of one scope and one kind.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Static,
    Field,
    Argument,
    Var,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub type_name: String,
    pub kind: Kind,
    pub index: u16,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    class_scope: HashMap<String, Symbol>,
    subroutine_scope: HashMap<String, Symbol>,
    static_count: u16,
    field_count: u16,
    argument_count: u16,
    var_count: u16,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the class scope and its counters, for the start of a new
    /// `class` declaration.
    pub fn start_class(&mut self) {
        self.class_scope.clear();
        self.static_count = 0;
        self.field_count = 0;
        self.start_subroutine();
    }

    /// Clears the subroutine scope and its counters, for the start of a
    /// new subroutine body.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.argument_count = 0;
        self.var_count = 0;
    }

    /// Defines a new symbol, inserting it into the scope its kind
    /// belongs to and returning the index it was assigned.
    pub fn define(&mut self, name: &str, type_name: &str, kind: Kind) -> u16 {
        let index = match kind {
            Kind::Static => {
                let i = self.static_count;
                self.static_count += 1;
                i
            }
            Kind::Field => {
                let i = self.field_count;
                self.field_count += 1;
                i
            }
            Kind::Argument => {
                let i = self.argument_count;
                self.argument_count += 1;
                i
            }
            Kind::Var => {
                let i = self.var_count;
                self.var_count += 1;
                i
            }
        };

        let symbol = Symbol {
            type_name: type_name.to_string(),
            kind,
            index,
        };

        match kind {
            Kind::Static | Kind::Field => {
                self.class_scope.insert(name.to_string(), symbol);
            }
            Kind::Argument | Kind::Var => {
                self.subroutine_scope.insert(name.to_string(), symbol);
            }
        }

        index
    }

    /// Looks up a name, preferring the (innermost) subroutine scope.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    #[must_use]
    pub fn var_count(&self, kind: Kind) -> u16 {
        match kind {
            Kind::Static => self.static_count,
            Kind::Field => self.field_count,
            Kind::Argument => self.argument_count,
            Kind::Var => self.var_count,
        }
    }
}
