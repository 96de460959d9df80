use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::lexer::{LexerError, TokenKind};

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ParserError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    LexerError(#[from] LexerError),

    #[diagnostic(code(parser::unexpected_token))]
    #[error("Unexpected token: expected {expected}, got {got} '{lexeme}' at {line}:{column}")]
    Expected {
        expected: TokenKind,
        got: TokenKind,
        lexeme: String,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(parser::unexpected_token))]
    #[error("Unexpected token: expected {expected}, got {got} '{lexeme}' at {line}:{column}")]
    ExpectedAny {
        expected: &'static str,
        got: TokenKind,
        lexeme: String,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(
        code(parser::too_deep),
        help("split the expression or block into smaller pieces")
    )]
    #[error("Nesting deeper than {limit} levels at {line}:{column}")]
    TooDeep {
        limit: usize,
        line: usize,
        column: usize,
        #[label("nested too deeply")]
        span: SourceSpan,
    },

    #[diagnostic(code(parser::invalid_integer))]
    #[error("Integer literal '{lexeme}' at {line}:{column} is out of range")]
    InvalidInteger {
        lexeme: String,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },
}
