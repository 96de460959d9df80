use super::SemaError;
use super::symbols::{ProcedureSymbol, ScopeChain, Symbol, VarSymbol};
use crate::parser::{self, BuiltinType, Span};
use crate::stack::ensure_sufficient_stack;

/// Resolves every name against a chain of scopes and annotates call sites
/// with the procedure they refer to.
pub struct SemanticAnalyzer {
    scopes: ScopeChain,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        SemanticAnalyzer {
            scopes: ScopeChain::new(),
        }
    }

    pub fn run(&mut self, module: &mut parser::Module) -> Result<(), SemaError> {
        self.scopes = ScopeChain::new();
        self.scopes.push("global");
        for stmt in &mut module.body {
            self.visit_stmt(stmt)?;
        }
        self.scopes.pop();
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &mut parser::Stmt) -> Result<(), SemaError> {
        ensure_sufficient_stack(|| {
            let span = stmt.span;

            match &mut stmt.kind {
                parser::StmtKind::Compound(body) => {
                    for stmt in body {
                        self.visit_stmt(stmt)?;
                    }
                }
                parser::StmtKind::Declaration { name, ty } => {
                    let ty = self.resolve_type(*ty, span)?;
                    self.define_var(name, ty, span)?;
                }
                parser::StmtKind::Assign { name, value } => {
                    self.resolve_var(name, span)?;
                    self.visit_expr(value)?;
                }
                parser::StmtKind::Call(call) => self.visit_call(call, span)?,
                parser::StmtKind::If {
                    test,
                    body,
                    else_body,
                } => {
                    self.visit_expr(test)?;
                    self.visit_stmt(body)?;
                    if let Some(else_body) = else_body {
                        self.visit_stmt(else_body)?;
                    }
                }
                parser::StmtKind::While { test, body } | parser::StmtKind::DoWhile { test, body } => {
                    self.visit_expr(test)?;
                    self.visit_stmt(body)?;
                }
                parser::StmtKind::For {
                    init,
                    test,
                    step,
                    body,
                } => {
                    self.visit_stmt(init)?;
                    self.visit_expr(test)?;
                    self.visit_stmt(step)?;
                    self.visit_stmt(body)?;
                }
                parser::StmtKind::Return(expr) => self.visit_expr(expr)?,
                parser::StmtKind::Break | parser::StmtKind::Continue | parser::StmtKind::Pass => {}
                parser::StmtKind::FunctionDef(def) => self.visit_function_def(def, span)?,
            };

            Ok(())
        })
    }

    fn visit_function_def(
        &mut self,
        def: &mut parser::FunctionDef,
        span: Span,
    ) -> Result<(), SemaError> {
        if self.scopes.lookup(&def.name, true).is_some() {
            return Err(SemaError::DuplicateIdentifier {
                name: def.name.clone(),
                line: span.line,
                column: span.column,
                span: span.into(),
            });
        }

        self.scopes.push(def.name.clone());

        let mut params = Vec::with_capacity(def.params.len());
        for param in &def.params {
            let ty = self.resolve_type(param.ty, param.span)?;
            params.push(self.define_var(&param.name, ty, param.span)?);
        }

        // Visible to the body so the procedure can call itself.
        let symbol = ProcedureSymbol {
            id: def.id,
            name: def.name.clone(),
            params,
            return_type: def.return_type,
            scope_level: 0,
        };
        if let Some(enclosing) = self.scopes.enclosing_mut() {
            enclosing.define(Symbol::Procedure(symbol));
        }

        for stmt in &mut def.body {
            self.visit_stmt(stmt)?;
        }

        self.scopes.pop();
        Ok(())
    }

    fn visit_call(&mut self, call: &mut parser::Call, span: Span) -> Result<(), SemaError> {
        let symbol = match self.scopes.lookup(&call.name, false) {
            Some(Symbol::Procedure(symbol)) => symbol.clone(),
            Some(_) => {
                return Err(SemaError::NotAProcedure {
                    name: call.name.clone(),
                    line: span.line,
                    column: span.column,
                    span: span.into(),
                });
            }
            None => {
                return Err(SemaError::IdentifierNotFound {
                    name: call.name.clone(),
                    line: span.line,
                    column: span.column,
                    span: span.into(),
                });
            }
        };

        if symbol.params.len() != call.args.len() {
            return Err(SemaError::WrongParameterCount {
                name: call.name.clone(),
                expected: symbol.params.len(),
                got: call.args.len(),
                line: span.line,
                column: span.column,
                span: span.into(),
            });
        }

        for arg in &mut call.args {
            self.visit_expr(arg)?;
        }

        call.resolved = Some(symbol);
        Ok(())
    }

    fn visit_expr(&mut self, expr: &mut parser::Expr) -> Result<(), SemaError> {
        ensure_sufficient_stack(|| {
            let span = expr.span;

            match &mut expr.kind {
                parser::ExprKind::Number(_) => {}
                parser::ExprKind::Name(name) => self.resolve_var(name, span)?,
                parser::ExprKind::Unary(_, operand) => self.visit_expr(operand)?,
                parser::ExprKind::Binary(_, lhs, rhs) => {
                    self.visit_expr(lhs)?;
                    self.visit_expr(rhs)?;
                }
                parser::ExprKind::Call(call) => self.visit_call(call, span)?,
            };

            Ok(())
        })
    }

    fn resolve_type(&self, ty: BuiltinType, span: Span) -> Result<BuiltinType, SemaError> {
        match self.scopes.lookup(ty.name(), false) {
            Some(Symbol::BuiltinType(symbol)) => Ok(symbol.ty),
            _ => Err(SemaError::IdentifierNotFound {
                name: ty.name().to_string(),
                line: span.line,
                column: span.column,
                span: span.into(),
            }),
        }
    }

    fn resolve_var(&self, name: &str, span: Span) -> Result<(), SemaError> {
        match self.scopes.lookup(name, false) {
            Some(Symbol::Var(_)) => Ok(()),
            Some(_) => Err(SemaError::NotAVariable {
                name: name.to_string(),
                line: span.line,
                column: span.column,
                span: span.into(),
            }),
            None => Err(SemaError::IdentifierNotFound {
                name: name.to_string(),
                line: span.line,
                column: span.column,
                span: span.into(),
            }),
        }
    }

    fn define_var(
        &mut self,
        name: &str,
        ty: BuiltinType,
        span: Span,
    ) -> Result<VarSymbol, SemaError> {
        if self.scopes.lookup(name, true).is_some() {
            return Err(SemaError::DuplicateIdentifier {
                name: name.to_string(),
                line: span.line,
                column: span.column,
                span: span.into(),
            });
        }

        let mut var = VarSymbol::new(name, ty);
        var.scope_level = self.scopes.level();
        if let Some(scope) = self.scopes.current_mut() {
            scope.define(Symbol::Var(var.clone()));
        }
        Ok(var)
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ExprKind, Parser, ProcId, StmtKind};

    fn analyze(src: &str) -> Result<parser::Module, SemaError> {
        let mut module = Parser::new(src).parse().unwrap();
        SemanticAnalyzer::new().run(&mut module)?;
        Ok(module)
    }

    #[test]
    fn undeclared_read() {
        let err = analyze("int x; x = y;").unwrap_err();
        assert!(matches!(err, SemaError::IdentifierNotFound { name, .. } if name == "y"));
    }

    #[test]
    fn undeclared_assignment() {
        let err = analyze("x = 1;").unwrap_err();
        assert!(matches!(
            err,
            SemaError::IdentifierNotFound { name, line: 1, column: 1, .. } if name == "x"
        ));
    }

    #[test]
    fn duplicate_in_same_scope() {
        let err = analyze("int x; float x;").unwrap_err();
        assert!(matches!(err, SemaError::DuplicateIdentifier { name, .. } if name == "x"));
    }

    #[test]
    fn compound_blocks_share_the_enclosing_scope() {
        let err = analyze("int x; { int x; }").unwrap_err();
        assert!(matches!(err, SemaError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn shadowing_in_nested_scope() {
        assert!(analyze("int x; def f() { int x; x = 1; }").is_ok());
    }

    #[test]
    fn params_are_local() {
        assert!(analyze("def int f(int a) { return a; }").is_ok());
        let err = analyze("def int f(int a) { return a; } int x; x = a;").unwrap_err();
        assert!(matches!(err, SemaError::IdentifierNotFound { name, .. } if name == "a"));
    }

    #[test]
    fn duplicate_params() {
        let err = analyze("def f(int a, float a) { }").unwrap_err();
        assert!(matches!(err, SemaError::DuplicateIdentifier { name, .. } if name == "a"));
    }

    #[test]
    fn duplicate_procedure() {
        let err = analyze("def f() { } def f() { }").unwrap_err();
        assert!(matches!(err, SemaError::DuplicateIdentifier { name, .. } if name == "f"));
    }

    #[test]
    fn builtin_type_names_are_taken() {
        let err = analyze("int INTEGER;").unwrap_err();
        assert!(matches!(err, SemaError::DuplicateIdentifier { .. }));
        let err = analyze("int x; x = FLOAT;").unwrap_err();
        assert!(matches!(err, SemaError::NotAVariable { .. }));
    }

    #[test]
    fn wrong_parameter_count() {
        let err = analyze("def f(int a) { } f(1, 2);").unwrap_err();
        assert!(matches!(
            err,
            SemaError::WrongParameterCount {
                expected: 1,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn calling_a_variable() {
        let err = analyze("int f; f();").unwrap_err();
        assert!(matches!(err, SemaError::NotAProcedure { .. }));
    }

    #[test]
    fn procedure_used_as_value() {
        let err = analyze("def int f() { return 1; } int x; x = f;").unwrap_err();
        assert!(matches!(err, SemaError::NotAVariable { .. }));
    }

    #[test]
    fn recursion_resolves() {
        assert!(analyze("def int f(int n) { if (n) return f(n - 1); return 0; }").is_ok());
    }

    #[test]
    fn no_forward_references() {
        let err = analyze("def int f() { return g(); } def int g() { return 1; }").unwrap_err();
        assert!(matches!(err, SemaError::IdentifierNotFound { name, .. } if name == "g"));
    }

    #[test]
    fn call_sites_are_annotated() {
        let module = analyze("def int g(int a, var b) { return a; } int x; x = g(1, 2);").unwrap();
        let StmtKind::Assign { value, .. } = &module.body[2].kind else {
            panic!("expected assignment");
        };
        let ExprKind::Call(call) = &value.kind else {
            panic!("expected call");
        };

        let symbol = call.resolved.as_ref().unwrap();
        assert_eq!(symbol.id, ProcId(0));
        assert_eq!(symbol.scope_level, 1);
        assert_eq!(symbol.return_type, Some(BuiltinType::Integer));
        assert_eq!(
            symbol
                .params
                .iter()
                .map(|p| (p.name.as_str(), p.ty, p.scope_level))
                .collect::<Vec<_>>(),
            vec![
                ("a", BuiltinType::Integer, 2),
                ("b", BuiltinType::Universal, 2)
            ]
        );
    }

    #[test]
    fn nested_procedures_nest_levels() {
        let module = analyze("def f() { def g() { } g(); } f();").unwrap();
        let StmtKind::FunctionDef(f) = &module.body[0].kind else {
            panic!("expected function");
        };
        let StmtKind::Call(call) = &f.body[1].kind else {
            panic!("expected call");
        };
        assert_eq!(call.resolved.as_ref().unwrap().scope_level, 2);
    }

    #[test]
    fn nested_procedures_are_not_visible_outside() {
        let err = analyze("def f() { def g() { } } g();").unwrap_err();
        assert!(matches!(err, SemaError::IdentifierNotFound { name, .. } if name == "g"));
    }
}
