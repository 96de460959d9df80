pub mod config;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod sema;
mod stack;

pub use config::InterpreterConfig;
pub use interpreter::{ActivationRecord, Interpreter, RuntimeError, Value};
pub use lexer::{Lexer, LexerError, Token, TokenKind};
pub use parser::{Module, Parser, ParserError};
pub use sema::{Sema, SemaError};

use miette::Diagnostic;
use thiserror::Error;

/// Any failure of the pipeline. Each stage stops at its first error.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Sema(#[from] SemaError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Runtime(#[from] RuntimeError),
}

pub fn lex(source: &str) -> Result<Vec<Token<'_>>, LexerError> {
    Lexer::new(source).lex()
}

pub fn parse(source: &str) -> Result<Module, ParserError> {
    Parser::new(source).parse()
}

/// Resolves names and annotates every call site in place.
pub fn analyze(module: &mut Module) -> Result<(), SemaError> {
    Sema::new().run(module)
}

pub fn interpret(
    module: &Module,
    config: InterpreterConfig,
) -> Result<ActivationRecord, RuntimeError> {
    Interpreter::new(config).interpret(module)
}

/// Parses, analyzes and runs `source`, returning the final program record.
pub fn run(source: &str) -> Result<ActivationRecord, Error> {
    run_with_config(source, InterpreterConfig::default())
}

pub fn run_with_config(
    source: &str,
    config: InterpreterConfig,
) -> Result<ActivationRecord, Error> {
    let mut module = parse(source)?;
    analyze(&mut module)?;
    Ok(interpret(&module, config)?)
}
