//! Error taxonomy for the Jack compiler: lexical, syntactic, semantic,
//! and I/O, matching the taxonomy the toolchain-wide error design names.

#[derive(Debug, thiserror::Error)]
pub enum CompilerError {
    #[error("line {line}: {message}")]
    Lexical { line: u32, message: String },
    #[error("line {line}: {message}")]
    Syntax { line: u32, message: String },
    #[error("line {line}: {message}")]
    Semantic { line: u32, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CompilerError {
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Lexical { line, .. } | Self::Syntax { line, .. } | Self::Semantic { line, .. } => {
                Some(*line)
            }
            Self::Io(_) => None,
        }
    }
}
