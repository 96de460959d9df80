use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum LexerError {
    #[diagnostic(code(lexer::invalid_char))]
    #[error("Lexer error on '{char}' line: {line} column: {column}")]
    InvalidChar {
        char: char,
        line: usize,
        column: usize,
        #[label("no token starts with this character")]
        span: SourceSpan,
    },
}
