mod call_stack;
mod error;
mod value;

pub use call_stack::{ActivationRecord, ArKind, CallStack};
pub use error::RuntimeError;
pub use value::{Value, ValueError};

use std::collections::HashMap;

use crate::config::InterpreterConfig;
use crate::parser::{self, ProcId, Span};
use crate::stack::ensure_sufficient_stack;

/// How a statement handed control back to its enclosing construct.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Flow {
    Completed,
    Returned(Value),
    Broke,
    Continued,
}

/// Walks an analyzed module, keeping variable bindings in activation records
/// on an explicit call stack.
pub struct Interpreter<'ast> {
    call_stack: CallStack,
    procedures: HashMap<ProcId, &'ast parser::FunctionDef>,
}

impl<'ast> Interpreter<'ast> {
    pub fn new(config: InterpreterConfig) -> Self {
        Interpreter {
            call_stack: CallStack::new(config.max_depth),
            procedures: HashMap::new(),
        }
    }

    /// Runs the module and returns the program's activation record. The call
    /// stack is empty again afterwards, whether or not the run succeeded.
    pub fn interpret(
        &mut self,
        module: &'ast parser::Module,
    ) -> Result<ActivationRecord, RuntimeError> {
        self.call_stack.clear();
        self.procedures.clear();
        self.collect_procedures(&module.body);

        let result = self.run_program(module);
        self.call_stack.clear();
        result
    }

    fn run_program(&mut self, module: &parser::Module) -> Result<ActivationRecord, RuntimeError> {
        let span = Span::new(0, 0, 1, 1);
        let program = ActivationRecord::new("program", ArKind::Program, 1);
        self.push(program, span)?;
        self.exec_block(&module.body)?;

        let program = self
            .call_stack
            .pop()
            .ok_or_else(|| empty_call_stack(span))?;
        tracing::debug!(bindings = program.bindings.len(), "program finished");
        Ok(program)
    }

    fn collect_procedures(&mut self, body: &'ast [parser::Stmt]) {
        for stmt in body {
            self.collect_procedures_in(stmt);
        }
    }

    fn collect_procedures_in(&mut self, stmt: &'ast parser::Stmt) {
        ensure_sufficient_stack(|| match &stmt.kind {
            parser::StmtKind::FunctionDef(def) => {
                self.procedures.insert(def.id, def);
                self.collect_procedures(&def.body);
            }
            parser::StmtKind::Compound(body) => self.collect_procedures(body),
            parser::StmtKind::If {
                body, else_body, ..
            } => {
                self.collect_procedures_in(body);
                if let Some(else_body) = else_body {
                    self.collect_procedures_in(else_body);
                }
            }
            parser::StmtKind::While { body, .. }
            | parser::StmtKind::DoWhile { body, .. }
            | parser::StmtKind::For { body, .. } => self.collect_procedures_in(body),
            parser::StmtKind::Declaration { .. }
            | parser::StmtKind::Assign { .. }
            | parser::StmtKind::Call(_)
            | parser::StmtKind::Return(_)
            | parser::StmtKind::Break
            | parser::StmtKind::Continue
            | parser::StmtKind::Pass => {}
        })
    }

    fn push(&mut self, record: ActivationRecord, span: Span) -> Result<(), RuntimeError> {
        self.call_stack
            .push(record)
            .map_err(|record| RuntimeError::StackExhausted {
                name: record.name,
                max_depth: self.call_stack.max_depth(),
                line: span.line,
                column: span.column,
                span: span.into(),
            })
    }

    fn record(&self, span: Span) -> Result<&ActivationRecord, RuntimeError> {
        self.call_stack
            .peek()
            .ok_or_else(|| empty_call_stack(span))
    }

    fn record_mut(&mut self, span: Span) -> Result<&mut ActivationRecord, RuntimeError> {
        self.call_stack
            .peek_mut()
            .ok_or_else(|| empty_call_stack(span))
    }

    /// Stops at the first statement that does not complete normally.
    fn exec_block(&mut self, body: &[parser::Stmt]) -> Result<Flow, RuntimeError> {
        for stmt in body {
            match self.exec_stmt(stmt)? {
                Flow::Completed => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Completed)
    }

    fn exec_stmt(&mut self, stmt: &parser::Stmt) -> Result<Flow, RuntimeError> {
        let span = stmt.span;

        ensure_sufficient_stack(|| match &stmt.kind {
            parser::StmtKind::Compound(body) => self.exec_block(body),
            parser::StmtKind::Declaration { name, ty } => {
                self.record_mut(span)?.set(name.clone(), Value::zero(*ty));
                Ok(Flow::Completed)
            }
            parser::StmtKind::Assign { name, value } => {
                let value = self.eval_expr(value)?;
                self.record_mut(span)?.set(name.clone(), value);
                Ok(Flow::Completed)
            }
            parser::StmtKind::Call(call) => {
                self.eval_call(call, span)?;
                Ok(Flow::Completed)
            }
            parser::StmtKind::If {
                test,
                body,
                else_body,
            } => {
                if self.eval_expr(test)?.is_truthy() {
                    self.exec_stmt(body)
                } else if let Some(else_body) = else_body {
                    self.exec_stmt(else_body)
                } else {
                    Ok(Flow::Completed)
                }
            }
            parser::StmtKind::While { test, body } => {
                while self.eval_expr(test)?.is_truthy() {
                    match self.exec_stmt(body)? {
                        Flow::Broke => break,
                        Flow::Returned(value) => return Ok(Flow::Returned(value)),
                        Flow::Completed | Flow::Continued => {}
                    }
                }
                Ok(Flow::Completed)
            }
            parser::StmtKind::DoWhile { test, body } => {
                loop {
                    match self.exec_stmt(body)? {
                        Flow::Broke => break,
                        Flow::Returned(value) => return Ok(Flow::Returned(value)),
                        Flow::Completed | Flow::Continued => {}
                    }
                    if !self.eval_expr(test)?.is_truthy() {
                        break;
                    }
                }
                Ok(Flow::Completed)
            }
            parser::StmtKind::For {
                init,
                test,
                step,
                body,
            } => {
                self.exec_stmt(init)?;
                while self.eval_expr(test)?.is_truthy() {
                    match self.exec_stmt(body)? {
                        Flow::Broke => break,
                        Flow::Returned(value) => return Ok(Flow::Returned(value)),
                        Flow::Completed | Flow::Continued => {}
                    }
                    self.exec_stmt(step)?;
                }
                Ok(Flow::Completed)
            }
            parser::StmtKind::Return(expr) => {
                let value = self.eval_expr(expr)?;
                self.record_mut(span)?.return_value = Some(value);
                Ok(Flow::Returned(value))
            }
            parser::StmtKind::Break => Ok(Flow::Broke),
            parser::StmtKind::Continue => Ok(Flow::Continued),
            parser::StmtKind::Pass | parser::StmtKind::FunctionDef(_) => Ok(Flow::Completed),
        })
    }

    fn eval_expr(&mut self, expr: &parser::Expr) -> Result<Value, RuntimeError> {
        let span = expr.span;

        ensure_sufficient_stack(|| match &expr.kind {
            parser::ExprKind::Number(n) => Ok(Value::Int(*n)),
            parser::ExprKind::Name(name) => {
                let record = self.record(span)?;
                record.get(name).ok_or_else(|| RuntimeError::UnboundName {
                    name: name.clone(),
                    record: record.name.clone(),
                    line: span.line,
                    column: span.column,
                    span: span.into(),
                })
            }
            parser::ExprKind::Unary(op, operand) => {
                let operand = self.eval_expr(operand)?;
                Value::unary(*op, operand).map_err(|err| value_error(err, op, span))
            }
            parser::ExprKind::Binary(op, lhs, rhs) => {
                let lhs = self.eval_expr(lhs)?;
                let rhs = self.eval_expr(rhs)?;
                Value::binary(*op, lhs, rhs).map_err(|err| value_error(err, op, span))
            }
            parser::ExprKind::Call(call) => self.eval_call(call, span),
        })
    }

    fn eval_call(&mut self, call: &parser::Call, span: Span) -> Result<Value, RuntimeError> {
        let unresolved = || RuntimeError::UnresolvedCall {
            name: call.name.clone(),
            line: span.line,
            column: span.column,
            span: span.into(),
        };
        let symbol = call.resolved.as_ref().ok_or_else(unresolved)?;
        let def = self
            .procedures
            .get(&symbol.id)
            .copied()
            .ok_or_else(unresolved)?;

        // Arguments see the caller's bindings.
        let mut record =
            ActivationRecord::new(&symbol.name, ArKind::Procedure, symbol.scope_level + 1);
        for (param, arg) in symbol.params.iter().zip(&call.args) {
            let value = self.eval_expr(arg)?;
            record.set(param.name.clone(), value);
        }

        tracing::debug!(procedure = %symbol.name, depth = self.call_stack.len() + 1, "call");
        self.push(record, span)?;
        tracing::trace!("{}", self.call_stack);
        let flow = self.exec_block(&def.body)?;
        self.call_stack.pop();

        match (flow, symbol.return_type) {
            (Flow::Returned(value), Some(_)) => Ok(value),
            (Flow::Returned(_), None) => Err(RuntimeError::UnexpectedReturn {
                name: symbol.name.clone(),
                line: span.line,
                column: span.column,
                span: span.into(),
            }),
            (_, Some(_)) => Err(RuntimeError::MissingReturn {
                name: symbol.name.clone(),
                line: span.line,
                column: span.column,
                span: span.into(),
            }),
            (_, None) => Ok(Value::None),
        }
    }
}

impl Default for Interpreter<'_> {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

fn empty_call_stack(span: Span) -> RuntimeError {
    RuntimeError::EmptyCallStack {
        line: span.line,
        column: span.column,
        span: span.into(),
    }
}

fn value_error(err: ValueError, op: impl std::fmt::Display, span: Span) -> RuntimeError {
    let (line, column) = (span.line, span.column);
    let span = span.into();
    match err {
        ValueError::DivisionByZero => RuntimeError::DivisionByZero { line, column, span },
        ValueError::Overflow => RuntimeError::IntegerOverflow {
            op: op.to_string(),
            line,
            column,
            span,
        },
        ValueError::Missing => RuntimeError::MissingValue {
            op: op.to_string(),
            line,
            column,
            span,
        },
    }
}
