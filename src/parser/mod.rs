mod ast;
mod error;

pub use ast::{
    BinaryOperator, BuiltinType, Call, Expr, ExprKind, FunctionDef, Module, Param, ProcId, Span,
    Stmt, StmtKind, UnaryOperator,
};
pub use error::ParserError;

use crate::lexer::{Lexer, Token, TokenKind};
use crate::stack::ensure_sufficient_stack;

/// Deepest nesting of blocks, statements and expressions the parser accepts.
/// Binary operator chains count one level per operator, since they build
/// left-deep trees.
pub const MAX_NESTING: usize = 1024;

/// Recursive-descent parser with one token of lookahead plus an optional
/// second token, used only to tell a call statement from an assignment.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    tok: Option<Token<'a>>,
    lookahead: Option<Token<'a>>,
    prev: Span,
    proc_counter: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser::from_lexer(Lexer::new(input))
    }

    pub fn from_lexer(lexer: Lexer<'a>) -> Self {
        Parser {
            lexer,
            tok: None,
            lookahead: None,
            prev: Span::default(),
            proc_counter: 0,
            depth: 0,
        }
    }

    // <program> ::= <statement_list>
    pub fn parse(&mut self) -> Result<Module, ParserError> {
        let body = self.parse_statement_list()?;
        let tok = self.current()?;
        if tok.kind != TokenKind::Eof {
            let tok = tok.clone();
            return Err(Self::unexpected(&tok, "end of input"));
        }
        Ok(Module { body })
    }

    fn pull(&mut self) -> Result<Token<'a>, ParserError> {
        match self.lookahead.take() {
            Some(tok) => Ok(tok),
            None => Ok(self.lexer.next_token()?),
        }
    }

    fn current(&mut self) -> Result<&Token<'a>, ParserError> {
        let tok = match self.tok.take() {
            Some(tok) => tok,
            None => self.pull()?,
        };
        Ok(self.tok.insert(tok))
    }

    fn kind(&mut self) -> Result<TokenKind, ParserError> {
        Ok(self.current()?.kind)
    }

    /// Kind of the token after the current one, without consuming either.
    fn peek_next(&mut self) -> Result<TokenKind, ParserError> {
        self.current()?;
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lexer.next_token()?);
        }
        Ok(self
            .lookahead
            .as_ref()
            .map_or(TokenKind::Eof, |tok| tok.kind))
    }

    fn advance(&mut self) -> Result<Token<'a>, ParserError> {
        let tok = match self.tok.take() {
            Some(tok) => tok,
            None => self.pull()?,
        };
        self.prev = tok.span;
        Ok(tok)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, ParserError> {
        let tok = self.current()?;
        if tok.kind == kind {
            self.advance()
        } else {
            Err(ParserError::Expected {
                expected: kind,
                got: tok.kind,
                lexeme: tok.lexeme.to_string(),
                line: tok.line(),
                column: tok.column(),
                span: tok.span.into(),
            })
        }
    }

    fn unexpected(tok: &Token<'_>, expected: &'static str) -> ParserError {
        ParserError::ExpectedAny {
            expected,
            got: tok.kind,
            lexeme: tok.lexeme.to_string(),
            line: tok.line(),
            column: tok.column(),
            span: tok.span.into(),
        }
    }

    fn enter(&mut self) -> Result<(), ParserError> {
        if self.depth >= MAX_NESTING {
            let tok = self.current()?;
            return Err(ParserError::TooDeep {
                limit: MAX_NESTING,
                line: tok.line(),
                column: tok.column(),
                span: tok.span.into(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs one level of recursive descent under the nesting limit.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParserError>,
    ) -> Result<T, ParserError> {
        self.enter()?;
        let result = ensure_sufficient_stack(|| parse(self));
        self.depth -= 1;
        result
    }

    fn start(&mut self) -> Result<Span, ParserError> {
        Ok(self.current()?.span)
    }

    fn finish(&self, start: Span) -> Span {
        start.to(self.prev)
    }

    // <statement_list> ::= { <statement> | <compound_statement> | <function_definition> }
    fn parse_statement_list(&mut self) -> Result<Vec<Stmt>, ParserError> {
        let mut body = Vec::new();
        loop {
            match self.kind()? {
                TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::LBrace => body.push(self.parse_compound()?),
                TokenKind::Def => body.push(self.parse_function_definition()?),
                _ => body.push(self.parse_stmt()?),
            }
        }
        Ok(body)
    }

    // <compound_statement> ::= "{" <statement_list> "}"
    fn parse_compound(&mut self) -> Result<Stmt, ParserError> {
        let start = self.start()?;
        let body = self.nested(Self::parse_braced)?;
        Ok(Stmt {
            kind: StmtKind::Compound(body),
            span: self.finish(start),
        })
    }

    fn parse_braced(&mut self) -> Result<Vec<Stmt>, ParserError> {
        self.expect(TokenKind::LBrace)?;
        let body = self.parse_statement_list()?;
        self.expect(TokenKind::RBrace)?;
        Ok(body)
    }

    // <function_definition> ::= "def" [ <type> ] <identifier> "(" <arguments> ")" <compound_statement>
    fn parse_function_definition(&mut self) -> Result<Stmt, ParserError> {
        let start = self.expect(TokenKind::Def)?.span;

        let return_type = if self.kind()?.is_type() {
            Some(self.parse_type()?)
        } else {
            None
        };
        let name = self.expect(TokenKind::Identifier)?.lexeme.to_string();

        self.expect(TokenKind::LParen)?;
        let params = self.parse_arguments()?;
        self.expect(TokenKind::RParen)?;

        let body = self.nested(Self::parse_braced)?;

        let id = ProcId(self.proc_counter);
        self.proc_counter += 1;

        Ok(Stmt {
            kind: StmtKind::FunctionDef(FunctionDef {
                id,
                name,
                params,
                return_type,
                body,
            }),
            span: self.finish(start),
        })
    }

    // <arguments> ::= [ <argument> { "," <argument> } ]
    // <argument>  ::= <type> <identifier>
    fn parse_arguments(&mut self) -> Result<Vec<Param>, ParserError> {
        let mut params = Vec::new();
        if self.kind()? == TokenKind::RParen {
            return Ok(params);
        }

        loop {
            let start = self.start()?;
            let ty = self.parse_type()?;
            let name = self.expect(TokenKind::Identifier)?.lexeme.to_string();
            params.push(Param {
                name,
                ty,
                span: self.finish(start),
            });

            if self.kind()? != TokenKind::Comma {
                break;
            }
            self.advance()?;
        }

        Ok(params)
    }

    // <type> ::= "int" | "float" | "var"
    fn parse_type(&mut self) -> Result<BuiltinType, ParserError> {
        let tok = self.current()?.clone();
        let ty = match tok.kind {
            TokenKind::Int => BuiltinType::Integer,
            TokenKind::Float => BuiltinType::Float,
            TokenKind::Var => BuiltinType::Universal,
            _ => return Err(Self::unexpected(&tok, "a type")),
        };
        self.advance()?;
        Ok(ty)
    }

    // <block> ::= <compound_statement> | <statement>
    fn parse_block(&mut self) -> Result<Stmt, ParserError> {
        match self.kind()? {
            TokenKind::LBrace => self.parse_compound(),
            _ => self.parse_stmt(),
        }
    }

    // <statement> ::= <simple_statement> ";" | <conditional> | <loop>
    fn parse_stmt(&mut self) -> Result<Stmt, ParserError> {
        self.nested(Self::parse_stmt_inner)
    }

    fn parse_stmt_inner(&mut self) -> Result<Stmt, ParserError> {
        match self.kind()? {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return | TokenKind::Break | TokenKind::Continue => {
                let stmt = self.parse_jump()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(stmt)
            }
            TokenKind::Identifier
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Var
            | TokenKind::Semicolon => {
                let stmt = self.parse_simple_stmt()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(stmt)
            }
            _ => {
                let tok = self.current()?.clone();
                Err(Self::unexpected(&tok, "a statement"))
            }
        }
    }

    // <simple_statement> ::= <proccall> | <assignment> | <declaration> | <empty>
    fn parse_simple_stmt(&mut self) -> Result<Stmt, ParserError> {
        let start = self.start()?;
        let kind = match self.kind()? {
            TokenKind::Identifier if self.peek_next()? == TokenKind::LParen => {
                StmtKind::Call(self.parse_call()?)
            }
            // <assignment> ::= <identifier> "=" <expr>
            TokenKind::Identifier => {
                let name = self.advance()?.lexeme.to_string();
                self.expect(TokenKind::Eq)?;
                let value = self.parse_expr()?;
                StmtKind::Assign { name, value }
            }
            // <declaration> ::= <type> <identifier>
            TokenKind::Int | TokenKind::Float | TokenKind::Var => {
                let ty = self.parse_type()?;
                let name = self.expect(TokenKind::Identifier)?.lexeme.to_string();
                StmtKind::Declaration { name, ty }
            }
            TokenKind::Semicolon | TokenKind::RParen => {
                return Ok(Stmt {
                    kind: StmtKind::Pass,
                    span: Span { end: start.start, ..start },
                });
            }
            _ => {
                let tok = self.current()?.clone();
                return Err(Self::unexpected(&tok, "a statement"));
            }
        };

        Ok(Stmt {
            kind,
            span: self.finish(start),
        })
    }

    // <return_stmt> ::= "return" <expr>
    fn parse_jump(&mut self) -> Result<Stmt, ParserError> {
        let tok = self.advance()?;
        let kind = match tok.kind {
            TokenKind::Return => StmtKind::Return(self.parse_expr()?),
            TokenKind::Break => StmtKind::Break,
            TokenKind::Continue => StmtKind::Continue,
            _ => return Err(Self::unexpected(&tok, "'return', 'break' or 'continue'")),
        };
        Ok(Stmt {
            kind,
            span: self.finish(tok.span),
        })
    }

    // <conditional> ::= "if" "(" <expr> ")" <block> [ "else" <block> ]
    fn parse_if(&mut self) -> Result<Stmt, ParserError> {
        let start = self.expect(TokenKind::If)?.span;
        let test = self.parse_paren_expr()?;
        let body = Box::new(self.parse_block()?);

        let else_body = if self.kind()? == TokenKind::Else {
            self.advance()?;
            Some(Box::new(self.parse_block()?))
        } else {
            None
        };

        Ok(Stmt {
            kind: StmtKind::If {
                test,
                body,
                else_body,
            },
            span: self.finish(start),
        })
    }

    // <while_loop> ::= "while" "(" <expr> ")" <block>
    fn parse_while(&mut self) -> Result<Stmt, ParserError> {
        let start = self.expect(TokenKind::While)?.span;
        let test = self.parse_paren_expr()?;
        let body = Box::new(self.parse_block()?);

        Ok(Stmt {
            kind: StmtKind::While { test, body },
            span: self.finish(start),
        })
    }

    // <do_while_loop> ::= "do" <block> "while" "(" <expr> ")" ";"
    fn parse_do_while(&mut self) -> Result<Stmt, ParserError> {
        let start = self.expect(TokenKind::Do)?.span;
        let body = Box::new(self.parse_block()?);
        self.expect(TokenKind::While)?;
        let test = self.parse_paren_expr()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Stmt {
            kind: StmtKind::DoWhile { test, body },
            span: self.finish(start),
        })
    }

    // <for_loop> ::= "for" "(" <simple_statement> ";" <expr> ";" <simple_statement> ")" <block>
    fn parse_for(&mut self) -> Result<Stmt, ParserError> {
        let start = self.expect(TokenKind::For)?.span;
        self.expect(TokenKind::LParen)?;
        let init = Box::new(self.parse_simple_stmt()?);
        self.expect(TokenKind::Semicolon)?;
        let test = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        let step = Box::new(self.parse_simple_stmt()?);
        self.expect(TokenKind::RParen)?;
        let body = Box::new(self.parse_block()?);

        Ok(Stmt {
            kind: StmtKind::For {
                init,
                test,
                step,
                body,
            },
            span: self.finish(start),
        })
    }

    fn parse_paren_expr(&mut self) -> Result<Expr, ParserError> {
        self.expect(TokenKind::LParen)?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(expr)
    }

    // <proccall> ::= <identifier> "(" [ <expr> { "," <expr> } ] ")"
    fn parse_call(&mut self) -> Result<Call, ParserError> {
        let name = self.expect(TokenKind::Identifier)?.lexeme.to_string();
        self.expect(TokenKind::LParen)?;

        let mut args = Vec::new();
        if self.kind()? != TokenKind::RParen {
            args.push(self.parse_expr()?);
            while self.kind()? == TokenKind::Comma {
                self.advance()?;
                args.push(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::RParen)?;

        Ok(Call {
            name,
            args,
            resolved: None,
        })
    }

    // <expr> ::= <term> { ( "+" | "-" ) <term> }
    fn parse_expr(&mut self) -> Result<Expr, ParserError> {
        let mut lhs = self.parse_term()?;
        let mut chained = 0;

        loop {
            let op = match self.kind()? {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                _ => break,
            };
            self.advance()?;
            self.enter()?;
            chained += 1;

            let rhs = self.parse_term()?;
            let span = lhs.span.to(rhs.span);
            lhs = Expr {
                kind: ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)),
                span,
            };
        }

        self.depth -= chained;
        Ok(lhs)
    }

    // <term> ::= <factor> { ( "*" | "/" ) <factor> }
    fn parse_term(&mut self) -> Result<Expr, ParserError> {
        let mut lhs = self.parse_factor()?;
        let mut chained = 0;

        loop {
            let op = match self.kind()? {
                TokenKind::Mul => BinaryOperator::Mul,
                TokenKind::Div => BinaryOperator::Div,
                _ => break,
            };
            self.advance()?;
            self.enter()?;
            chained += 1;

            let rhs = self.parse_factor()?;
            let span = lhs.span.to(rhs.span);
            lhs = Expr {
                kind: ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)),
                span,
            };
        }

        self.depth -= chained;
        Ok(lhs)
    }

    // <factor> ::= ( "+" | "-" ) <factor> | integer | "(" <expr> ")" | <proccall> | <identifier>
    fn parse_factor(&mut self) -> Result<Expr, ParserError> {
        self.nested(Self::parse_factor_inner)
    }

    fn parse_factor_inner(&mut self) -> Result<Expr, ParserError> {
        let tok = self.current()?.clone();
        match tok.kind {
            TokenKind::Plus | TokenKind::Minus => {
                self.advance()?;
                let op = if tok.kind == TokenKind::Plus {
                    UnaryOperator::Plus
                } else {
                    UnaryOperator::Minus
                };
                let operand = self.parse_factor()?;
                let span = tok.span.to(operand.span);
                Ok(Expr {
                    kind: ExprKind::Unary(op, Box::new(operand)),
                    span,
                })
            }
            TokenKind::Integer => {
                self.advance()?;
                let value = tok
                    .lexeme
                    .parse()
                    .map_err(|_| ParserError::InvalidInteger {
                        lexeme: tok.lexeme.to_string(),
                        line: tok.line(),
                        column: tok.column(),
                        span: tok.span.into(),
                    })?;
                Ok(Expr {
                    kind: ExprKind::Number(value),
                    span: tok.span,
                })
            }
            TokenKind::LParen => self.parse_paren_expr(),
            TokenKind::Identifier if self.peek_next()? == TokenKind::LParen => {
                let call = self.parse_call()?;
                Ok(Expr {
                    kind: ExprKind::Call(call),
                    span: self.finish(tok.span),
                })
            }
            TokenKind::Identifier => {
                self.advance()?;
                Ok(Expr {
                    kind: ExprKind::Name(tok.lexeme.to_string()),
                    span: tok.span,
                })
            }
            _ => Err(Self::unexpected(&tok, "an expression")),
        }
    }
}
