use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use strum_macros::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,

    // Identifiers and literals
    Identifier,
    IntegerConstant,
    StringConstant,

    // Operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    EqualEqual,
    NotEqual,

    // Delimiters
    Comma,
    Semicolon,
    Colon,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Program,
    Var,
    Func,
    If,
    Else,
    For,
    True,
    False,
    Return,
    Int,
    Float64,
    String,
    Bool,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = vec![
        ("program", TokenKind::Program),
        ("var", TokenKind::Var),
        ("func", TokenKind::Func),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("for", TokenKind::For),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("int", TokenKind::Int),
        ("float64", TokenKind::Float64),
        ("string", TokenKind::String),
        ("bool", TokenKind::Bool),
        ("return", TokenKind::Return),
    ]
    .into_iter()
    .collect();
}

/// Looks a word up in the keyword table, ignoring case.
pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS.get(word.to_lowercase().as_str()).copied()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, text: S, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::Eof, "", line)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input (line {})", self.line),
            kind => write!(f, "{} '{}' (line {})", kind, self.text, self.line),
        }
    }
}
