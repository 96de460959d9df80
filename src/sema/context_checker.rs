use super::SemaError;
use crate::parser;
use crate::stack::ensure_sufficient_stack;

/// Checks that `break`/`continue` sit inside a loop of the current procedure
/// and that `return` sits inside a procedure.
pub struct ContextChecker {
    context: Stack,
}

impl ContextChecker {
    pub fn new() -> Self {
        ContextChecker {
            context: Stack::new(),
        }
    }

    pub fn run(&mut self, module: &parser::Module) -> Result<(), SemaError> {
        for stmt in &module.body {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &parser::Stmt) -> Result<(), SemaError> {
        ensure_sufficient_stack(|| {
            let parser::Stmt { kind, span } = stmt;

            match kind {
                parser::StmtKind::While { body, .. } | parser::StmtKind::DoWhile { body, .. } => {
                    self.context.push(ContextKind::Loop);
                    self.check_stmt(body)?;
                    self.context.pop();
                }
                parser::StmtKind::For {
                    init, step, body, ..
                } => {
                    self.check_stmt(init)?;
                    self.context.push(ContextKind::Loop);
                    self.check_stmt(step)?;
                    self.check_stmt(body)?;
                    self.context.pop();
                }
                parser::StmtKind::FunctionDef(def) => {
                    self.context.push(ContextKind::Procedure);
                    for stmt in &def.body {
                        self.check_stmt(stmt)?;
                    }
                    self.context.pop();
                }
                parser::StmtKind::Break => {
                    if !self.context.inside_loop() {
                        return Err(SemaError::BreakOutsideLoop {
                            line: span.line,
                            column: span.column,
                            span: (*span).into(),
                        });
                    }
                }
                parser::StmtKind::Continue => {
                    if !self.context.inside_loop() {
                        return Err(SemaError::ContinueOutsideLoop {
                            line: span.line,
                            column: span.column,
                            span: (*span).into(),
                        });
                    }
                }
                parser::StmtKind::Return(_) => {
                    if !self.context.inside_procedure() {
                        return Err(SemaError::ReturnOutsideProcedure {
                            line: span.line,
                            column: span.column,
                            span: (*span).into(),
                        });
                    }
                }
                parser::StmtKind::If {
                    body, else_body, ..
                } => {
                    self.check_stmt(body)?;
                    if let Some(else_body) = else_body {
                        self.check_stmt(else_body)?;
                    }
                }
                parser::StmtKind::Compound(body) => {
                    for stmt in body {
                        self.check_stmt(stmt)?;
                    }
                }
                parser::StmtKind::Declaration { .. }
                | parser::StmtKind::Assign { .. }
                | parser::StmtKind::Call(_)
                | parser::StmtKind::Pass => {}
            };

            Ok(())
        })
    }
}

impl Default for ContextChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Stack {
    stack: Vec<ContextKind>,
}

impl Stack {
    fn new() -> Self {
        Stack { stack: Vec::new() }
    }

    fn push(&mut self, context: ContextKind) {
        self.stack.push(context);
    }

    fn pop(&mut self) {
        self.stack.pop();
    }

    /// Loops outside the innermost procedure do not count.
    fn inside_loop(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .take_while(|kind| !matches!(kind, ContextKind::Procedure))
            .any(|kind| matches!(kind, ContextKind::Loop))
    }

    fn inside_procedure(&self) -> bool {
        self.stack
            .iter()
            .any(|kind| matches!(kind, ContextKind::Procedure))
    }
}

#[derive(Debug)]
enum ContextKind {
    Loop,
    Procedure,
}
