mod error;
mod token;

use miette::SourceSpan;
use std::{iter::Peekable, str::CharIndices};
pub use token::{Token, TokenKind};

pub use error::LexerError;

use crate::parser::Span;

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    idx: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            idx: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    pub fn lex(&mut self) -> Result<Vec<Token<'a>>, LexerError> {
        self.by_ref().collect()
    }

    /// Pulls the next token. Once the input is exhausted this keeps returning
    /// `Eof`.
    pub fn next_token(&mut self) -> Result<Token<'a>, LexerError> {
        self.skip_whitespace();

        let start = self.idx;
        let (line, column) = (self.line, self.column);

        let Some(c) = self.next_char() else {
            return Ok(Token::new(
                TokenKind::Eof,
                "",
                Span::new(start, start, line, column),
            ));
        };

        let kind = match c {
            '0'..='9' => {
                self.consume_while(|d| d.is_ascii_digit());
                TokenKind::Integer
            }
            c if c.is_ascii_alphabetic() => {
                self.consume_while(|d| d.is_ascii_alphanumeric());
                TokenKind::keyword(&self.input[start..self.idx]).unwrap_or(TokenKind::Identifier)
            }
            c => match TokenKind::punctuation(c) {
                Some(kind) => kind,
                None => {
                    return Err(LexerError::InvalidChar {
                        char: c,
                        line,
                        column,
                        span: SourceSpan::new(start.into(), c.len_utf8()),
                    });
                }
            },
        };

        Ok(Token::new(
            kind,
            &self.input[start..self.idx],
            Span::new(start, self.idx, line, column),
        ))
    }

    /// The character right after the last consumed token, if any.
    pub fn current_char(&mut self) -> Option<char> {
        self.peek_char().copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let (i, c) = self.chars.next()?;
        self.idx = i + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek_char(&mut self) -> Option<&char> {
        self.chars.peek().map(|(_, c)| c)
    }

    fn skip_whitespace(&mut self) {
        self.consume_while(char::is_whitespace);
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(&c) = self.peek_char() {
            if pred(c) {
                self.next_char();
            } else {
                break;
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_token() {
            Ok(tok) if tok.kind == TokenKind::Eof => {
                self.finished = true;
                None
            }
            Ok(tok) => Some(Ok(tok)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
