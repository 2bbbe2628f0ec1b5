//! Emits textual VM commands, one `write_*` method per command family —
//! the same shape as `vm_translator::code_writer::CodeWriter`, aimed at
//! the VM language itself instead of Hack assembly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Argument => "argument",
            Self::Local => "local",
            Self::Static => "static",
            Self::This => "this",
            Self::That => "that",
            Self::Pointer => "pointer",
            Self::Temp => "temp",
        }
    }
}

#[derive(Default)]
pub struct VmWriter {
    lines: Vec<String>,
}

impl VmWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_push(&mut self, segment: Segment, index: u16) {
        self.lines.push(format!("push {} {index}", segment.as_str()));
    }

    pub fn write_pop(&mut self, segment: Segment, index: u16) {
        self.lines.push(format!("pop {} {index}", segment.as_str()));
    }

    pub fn write_arithmetic(&mut self, command: &'static str) {
        self.lines.push(command.to_string());
    }

    pub fn write_label(&mut self, label: &str) {
        self.lines.push(format!("label {label}"));
    }

    pub fn write_goto(&mut self, label: &str) {
        self.lines.push(format!("goto {label}"));
    }

    pub fn write_if(&mut self, label: &str) {
        self.lines.push(format!("if-goto {label}"));
    }

    pub fn write_call(&mut self, name: &str, n_args: u16) {
        self.lines.push(format!("call {name} {n_args}"));
    }

    pub fn write_function(&mut self, name: &str, n_locals: u16) {
        self.lines.push(format!("function {name} {n_locals}"));
    }

    pub fn write_return(&mut self) {
        self.lines.push("return".to_string());
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_render_segment_and_index() {
        let mut w = VmWriter::new();
        w.write_push(Segment::Local, 2);
        w.write_pop(Segment::This, 0);
        assert_eq!(w.into_lines(), vec!["push local 2", "pop this 0"]);
    }

    #[test]
    fn call_and_function_render_two_trailing_tokens() {
        let mut w = VmWriter::new();
        w.write_function("Main.main", 3);
        w.write_call("Math.multiply", 2);
        assert_eq!(
            w.into_lines(),
            vec!["function Main.main 3", "call Math.multiply 2"]
        );
    }
}
