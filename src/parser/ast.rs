use miette::SourceSpan;

use crate::sema::ProcedureSymbol;

/// Byte range of a node in the source plus the line and column where it
/// starts.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Extends `self` up to the end of `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            end: other.end.max(self.end),
            ..self
        }
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.end.saturating_sub(span.start))
    }
}

/// Identifies a procedure definition within one parsed module.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ProcId(pub usize);

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BuiltinType {
    Integer,
    Float,
    Universal,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 3] = [
        BuiltinType::Universal,
        BuiltinType::Float,
        BuiltinType::Integer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Integer => "INTEGER",
            BuiltinType::Float => "FLOAT",
            BuiltinType::Universal => "UNIVERSAL",
        }
    }
}

impl std::fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Module {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl PartialEq for Stmt {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Stmt {}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum StmtKind {
    Compound(Vec<Stmt>),
    Declaration {
        name: String,
        ty: BuiltinType,
    },
    Assign {
        name: String,
        value: Expr,
    },
    Call(Call),
    If {
        test: Expr,
        body: Box<Stmt>,
        else_body: Option<Box<Stmt>>,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        test: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Box<Stmt>,
        test: Expr,
        step: Box<Stmt>,
        body: Box<Stmt>,
    },
    Return(Expr),
    Break,
    Continue,
    Pass,
    FunctionDef(FunctionDef),
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub id: ProcId,
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<BuiltinType>,
    pub body: Vec<Stmt>,
}

impl PartialEq for FunctionDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.params == other.params
            && self.return_type == other.return_type
            && self.body == other.body
    }
}

impl Eq for FunctionDef {}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: BuiltinType,
    pub span: Span,
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ty == other.ty
    }
}

impl Eq for Param {}

/// A procedure call. `resolved` is filled in once by semantic analysis.
#[derive(Debug, Clone)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expr>,
    pub resolved: Option<ProcedureSymbol>,
}

impl PartialEq for Call {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

impl Eq for Call {}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Minus => write!(f, "-"),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Sub => write!(f, "-"),
            BinaryOperator::Mul => write!(f, "*"),
            BinaryOperator::Div => write!(f, "/"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Expr {}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum ExprKind {
    Number(i64),
    Name(String),
    Unary(UnaryOperator, Box<Expr>),
    Binary(BinaryOperator, Box<Expr>, Box<Expr>),
    Call(Call),
}
