//! Lexer for the PHP subset.
//!
//! Tokens carry the 1-based line they start on, the line they end on, and
//! their byte offsets; the parser folds these into node spans. A leading
//! `<?php` tag is consumed as trivia.

use crate::error::{RefactorError, Result};

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub end_line: u32,
    pub start: usize,
    pub end: usize,
}

/// The closed set of token kinds. Keywords are plain identifiers; the parser
/// gives them meaning by position.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Variable(String),
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Semi,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Assign,
    Eq,
    NotEq,
    Identical,
    NotIdentical,
    Lt,
    Gt,
    Le,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Dot,
    Arrow,
    DoubleArrow,
    AndAnd,
    OrOr,
    Bang,
    Eof,
}

impl TokenKind {
    /// Human-readable description used in parse error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Variable(name) => format!("variable '${name}'"),
            TokenKind::Ident(name) => format!("'{name}'"),
            TokenKind::Int(value) => format!("'{value}'"),
            TokenKind::Float(value) => format!("'{value}'"),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Semi => "';'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Assign => "'='".to_string(),
            TokenKind::Eq => "'=='".to_string(),
            TokenKind::NotEq => "'!='".to_string(),
            TokenKind::Identical => "'==='".to_string(),
            TokenKind::NotIdentical => "'!=='".to_string(),
            TokenKind::Lt => "'<'".to_string(),
            TokenKind::Gt => "'>'".to_string(),
            TokenKind::Le => "'<='".to_string(),
            TokenKind::Ge => "'>='".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Percent => "'%'".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Arrow => "'->'".to_string(),
            TokenKind::DoubleArrow => "'=>'".to_string(),
            TokenKind::AndAnd => "'&&'".to_string(),
            TokenKind::OrOr => "'||'".to_string(),
            TokenKind::Bang => "'!'".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: u32,
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte >= 0x80
}

fn is_ident_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte >= 0x80
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    /// Tokenize the whole input, ending with a [`TokenKind::Eof`] token.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        if self.src.starts_with(b"<?php") {
            self.pos = 5;
        }

        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.pos >= self.src.len() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line: self.line,
                    end_line: self.line,
                    start: self.pos,
                    end: self.pos,
                });
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn skip_trivia(&mut self) -> Result<()> {
        while self.pos < self.src.len() {
            match self.src[self.pos] {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'#' => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let start_line = self.line;
        self.pos += 2;
        while self.pos < self.src.len() {
            if self.src[self.pos] == b'\n' {
                self.line += 1;
                self.pos += 1;
            } else if self.src[self.pos] == b'*' && self.peek_at(1) == Some(b'/') {
                self.pos += 2;
                return Ok(());
            } else {
                self.pos += 1;
            }
        }
        Err(self.error(format!(
            "Syntax error, unterminated comment starting on line {start_line}"
        )))
    }

    fn next_token(&mut self) -> Result<Token> {
        let start = self.pos;
        let start_line = self.line;
        let byte = self.src[self.pos];

        let kind = match byte {
            b'$' => {
                self.pos += 1;
                let name = self.take_ident();
                if name.is_empty() {
                    return Err(self.error(format!(
                        "Syntax error, unexpected '$' on line {start_line}"
                    )));
                }
                TokenKind::Variable(name)
            }
            b if is_ident_start(b) => TokenKind::Ident(self.take_ident()),
            b'0'..=b'9' => self.take_number()?,
            b'\'' => self.take_single_quoted(start_line)?,
            b'"' => self.take_double_quoted(start_line)?,
            _ => self.take_operator(start_line)?,
        };

        Ok(Token {
            kind,
            line: start_line,
            end_line: self.line,
            start,
            end: self.pos,
        })
    }

    fn take_ident(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.src.len() && is_ident_continue(self.src[self.pos]) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.src[start..self.pos]).into_owned()
    }

    fn take_number(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        let start_line = self.line;
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
            self.pos += 1;
        }

        let is_float = self.src.get(self.pos) == Some(&b'.')
            && self
                .peek_at(1)
                .is_some_and(|b| b.is_ascii_digit());
        if is_float {
            self.pos += 1;
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }

        let text = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| self.error(format!("Syntax error, invalid number on line {start_line}")))?;
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.error(format!("Syntax error, invalid number on line {start_line}")))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| self.error(format!("Syntax error, invalid number on line {start_line}")))
        }
    }

    fn take_single_quoted(&mut self, start_line: u32) -> Result<TokenKind> {
        self.pos += 1;
        let mut value = Vec::new();
        while self.pos < self.src.len() {
            match self.src[self.pos] {
                b'\'' => {
                    self.pos += 1;
                    return Ok(TokenKind::Str(
                        String::from_utf8_lossy(&value).into_owned(),
                    ));
                }
                b'\\' if matches!(self.peek_at(1), Some(b'\\') | Some(b'\'')) => {
                    value.push(self.src[self.pos + 1]);
                    self.pos += 2;
                }
                b'\n' => {
                    value.push(b'\n');
                    self.line += 1;
                    self.pos += 1;
                }
                b => {
                    value.push(b);
                    self.pos += 1;
                }
            }
        }
        Err(self.error(format!(
            "Syntax error, unterminated string starting on line {start_line}"
        )))
    }

    fn take_double_quoted(&mut self, start_line: u32) -> Result<TokenKind> {
        self.pos += 1;
        let mut value = Vec::new();
        while self.pos < self.src.len() {
            match self.src[self.pos] {
                b'"' => {
                    self.pos += 1;
                    return Ok(TokenKind::Str(
                        String::from_utf8_lossy(&value).into_owned(),
                    ));
                }
                b'\\' => {
                    let escaped = match self.peek_at(1) {
                        Some(b'n') => b'\n',
                        Some(b't') => b'\t',
                        Some(b'r') => b'\r',
                        Some(b'\\') => b'\\',
                        Some(b'"') => b'"',
                        Some(b'$') => b'$',
                        Some(other) => {
                            value.push(b'\\');
                            other
                        }
                        None => break,
                    };
                    value.push(escaped);
                    self.pos += 2;
                }
                b'\n' => {
                    value.push(b'\n');
                    self.line += 1;
                    self.pos += 1;
                }
                b => {
                    value.push(b);
                    self.pos += 1;
                }
            }
        }
        Err(self.error(format!(
            "Syntax error, unterminated string starting on line {start_line}"
        )))
    }

    fn take_operator(&mut self, start_line: u32) -> Result<TokenKind> {
        let rest = &self.src[self.pos..];
        let table: &[(&[u8], TokenKind)] = &[
            (b"===", TokenKind::Identical),
            (b"!==", TokenKind::NotIdentical),
            (b"==", TokenKind::Eq),
            (b"!=", TokenKind::NotEq),
            (b"<=", TokenKind::Le),
            (b">=", TokenKind::Ge),
            (b"&&", TokenKind::AndAnd),
            (b"||", TokenKind::OrOr),
            (b"->", TokenKind::Arrow),
            (b"=>", TokenKind::DoubleArrow),
            (b"=", TokenKind::Assign),
            (b"<", TokenKind::Lt),
            (b">", TokenKind::Gt),
            (b"+", TokenKind::Plus),
            (b"-", TokenKind::Minus),
            (b"*", TokenKind::Star),
            (b"/", TokenKind::Slash),
            (b"%", TokenKind::Percent),
            (b".", TokenKind::Dot),
            (b"!", TokenKind::Bang),
            (b";", TokenKind::Semi),
            (b",", TokenKind::Comma),
            (b"(", TokenKind::LParen),
            (b")", TokenKind::RParen),
            (b"{", TokenKind::LBrace),
            (b"}", TokenKind::RBrace),
            (b"[", TokenKind::LBracket),
            (b"]", TokenKind::RBracket),
        ];

        for (text, kind) in table {
            if rest.starts_with(text) {
                self.pos += text.len();
                return Ok(kind.clone());
            }
        }

        Err(self.error(format!(
            "Syntax error, unexpected character '{}' on line {start_line}",
            self.src[self.pos] as char
        )))
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn error(&self, message: String) -> RefactorError {
        RefactorError::Parse { message }
    }
}
