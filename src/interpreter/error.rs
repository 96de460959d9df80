use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum RuntimeError {
    #[diagnostic(code(runtime::unexpected_return))]
    #[error(
        "Procedure '{name}' has no return type but returned a value, called at {line}:{column}"
    )]
    UnexpectedReturn {
        name: String,
        line: usize,
        column: usize,
        #[label("called here")]
        span: SourceSpan,
    },

    #[diagnostic(code(runtime::missing_return))]
    #[error(
        "Procedure '{name}' declares a return type but finished without returning, called at {line}:{column}"
    )]
    MissingReturn {
        name: String,
        line: usize,
        column: usize,
        #[label("called here")]
        span: SourceSpan,
    },

    #[diagnostic(
        code(runtime::stack_exhausted),
        help("raise the limit with --max-depth if the recursion is intended")
    )]
    #[error("Stack exhausted: call depth exceeded {max_depth} calling '{name}' at {line}:{column}")]
    StackExhausted {
        name: String,
        max_depth: usize,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(runtime::division_by_zero))]
    #[error("Division by zero at {line}:{column}")]
    DivisionByZero {
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(runtime::integer_overflow))]
    #[error("Integer overflow evaluating '{op}' at {line}:{column}")]
    IntegerOverflow {
        op: String,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(runtime::missing_value))]
    #[error("Operand of '{op}' has no value at {line}:{column}")]
    MissingValue {
        op: String,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(runtime::unbound_name))]
    #[error("'{name}' has no binding in activation record '{record}' at {line}:{column}")]
    UnboundName {
        name: String,
        record: String,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(
        code(runtime::unresolved_call),
        help("run semantic analysis before interpreting")
    )]
    #[error("Call to '{name}' was never resolved at {line}:{column}")]
    UnresolvedCall {
        name: String,
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },

    #[diagnostic(code(runtime::empty_call_stack))]
    #[error("No activation record is active at {line}:{column}")]
    EmptyCallStack {
        line: usize,
        column: usize,
        #[label]
        span: SourceSpan,
    },
}
