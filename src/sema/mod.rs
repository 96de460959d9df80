mod analyzer;
mod context_checker;
mod error;
mod symbols;

pub use analyzer::SemanticAnalyzer;
pub use context_checker::ContextChecker;
pub use error::SemaError;
pub use symbols::{BuiltinTypeSymbol, ProcedureSymbol, Scope, ScopeChain, Symbol, VarSymbol};

use crate::parser;

pub struct Sema {}

impl Sema {
    pub fn new() -> Self {
        Sema {}
    }

    pub fn run(&mut self, module: &mut parser::Module) -> Result<(), SemaError> {
        let mut analyzer = SemanticAnalyzer::new();
        let mut context_checker = ContextChecker::new();

        analyzer.run(module)?;
        context_checker.run(module)?;

        Ok(())
    }
}

impl Default for Sema {
    fn default() -> Self {
        Sema::new()
    }
}
