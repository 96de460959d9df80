/// Activation records allowed on the call stack at once, the program record
/// included.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub max_depth: usize,
}

impl InterpreterConfig {
    pub fn with_max_depth(max_depth: usize) -> Self {
        InterpreterConfig { max_depth }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
