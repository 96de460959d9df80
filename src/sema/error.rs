use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum SemaError {
    #[diagnostic(code(sema::identifier_not_found))]
    #[error("Identifier not found: '{name}' at {line}:{column}")]
    IdentifierNotFound {
        name: String,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::duplicate_identifier))]
    #[error("Duplicate identifier found: '{name}' at {line}:{column}")]
    DuplicateIdentifier {
        name: String,
        line: usize,
        column: usize,
        #[label("already defined in this scope")]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::wrong_parameter_count))]
    #[error(
        "Wrong number of parameters: '{name}' takes {expected}, got {got} at {line}:{column}"
    )]
    WrongParameterCount {
        name: String,
        expected: usize,
        got: usize,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::not_a_procedure))]
    #[error("'{name}' is not a procedure at {line}:{column}")]
    NotAProcedure {
        name: String,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::not_a_variable))]
    #[error("'{name}' is not a variable at {line}:{column}")]
    NotAVariable {
        name: String,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::break_outside_loop))]
    #[error("'break' outside of a loop at {line}:{column}")]
    BreakOutsideLoop {
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::continue_outside_loop))]
    #[error("'continue' outside of a loop at {line}:{column}")]
    ContinueOutsideLoop {
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(sema::return_outside_procedure))]
    #[error("'return' outside of a procedure at {line}:{column}")]
    ReturnOutsideProcedure {
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },
}
