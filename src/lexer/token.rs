use crate::parser::Span;

#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub span: Span,
}

impl PartialEq for Token<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.lexeme == other.lexeme
    }
}

impl Eq for Token<'_> {}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?}(\"{}\")@{}:{}",
            self.kind, self.lexeme, self.span.line, self.span.column
        )
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub enum TokenKind {
    Plus,
    Minus,
    Mul,
    Div,
    LParen,
    RParen,
    Eq,
    Semicolon,
    LBrace,
    RBrace,
    Comma,
    Var,
    Int,
    Float,
    Return,
    If,
    Else,
    Def,
    For,
    While,
    Do,
    Break,
    Continue,
    Integer,
    Identifier,
    Eof,
}

impl TokenKind {
    /// Reserved-word table. Anything not listed here lexes as an identifier.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        match word {
            "var" => Some(TokenKind::Var),
            "int" => Some(TokenKind::Int),
            "float" => Some(TokenKind::Float),
            "return" => Some(TokenKind::Return),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "def" => Some(TokenKind::Def),
            "for" => Some(TokenKind::For),
            "while" => Some(TokenKind::While),
            "do" => Some(TokenKind::Do),
            "break" => Some(TokenKind::Break),
            "continue" => Some(TokenKind::Continue),
            _ => None,
        }
    }

    pub fn punctuation(c: char) -> Option<TokenKind> {
        match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Mul),
            '/' => Some(TokenKind::Div),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '=' => Some(TokenKind::Eq),
            ';' => Some(TokenKind::Semicolon),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            ',' => Some(TokenKind::Comma),
            _ => None,
        }
    }

    pub fn is_type(self) -> bool {
        matches!(self, TokenKind::Var | TokenKind::Int | TokenKind::Float)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TokenKind::Plus => "'+'",
                TokenKind::Minus => "'-'",
                TokenKind::Mul => "'*'",
                TokenKind::Div => "'/'",
                TokenKind::LParen => "'('",
                TokenKind::RParen => "')'",
                TokenKind::Eq => "'='",
                TokenKind::Semicolon => "';'",
                TokenKind::LBrace => "'{'",
                TokenKind::RBrace => "'}'",
                TokenKind::Comma => "','",
                TokenKind::Var => "'var'",
                TokenKind::Int => "'int'",
                TokenKind::Float => "'float'",
                TokenKind::Return => "'return'",
                TokenKind::If => "'if'",
                TokenKind::Else => "'else'",
                TokenKind::Def => "'def'",
                TokenKind::For => "'for'",
                TokenKind::While => "'while'",
                TokenKind::Do => "'do'",
                TokenKind::Break => "'break'",
                TokenKind::Continue => "'continue'",
                TokenKind::Integer => "integer",
                TokenKind::Identifier => "identifier",
                TokenKind::Eof => "end of input",
            }
        )
    }
}
