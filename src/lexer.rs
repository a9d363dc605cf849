use crate::token::{self, Token, TokenKind};
use custom_error::custom_error;
use log::trace;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub LexError

    UnrecognizedCharacter{position: usize, line: usize, character: char} = "unrecognized character '{character}' at position {position} (line {line})",
    UnterminatedString{position: usize, line: usize} = "unterminated string literal starting at position {position} (line {line})",
    UnterminatedComment{position: usize, line: usize} = "unterminated block comment starting at position {position} (line {line})",
}

/// Converts source text into its token sequence, always terminated by one `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];
    loop {
        let token = lexer.next_token()?;
        let done = token.is(TokenKind::Eof);
        tokens.push(token);
        if done {
            break;
        }
    }
    trace!("lexed {} tokens", tokens.len());
    Ok(tokens)
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    read_position: usize,
    ch: Option<char>,
    line: usize,
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut lexer = Self {
            input: input.chars().collect(),
            position: 0,
            read_position: 0,
            ch: None,
            line: 1,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        if self.ch == Some('\n') {
            self.line += 1;
        }
        self.ch = self.input.get(self.read_position).copied();
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.read_position).copied()
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            self.skip_whitespace();
            if self.ch == Some('/') && self.peek_char() == Some('/') {
                self.skip_line_comment();
            } else if self.ch == Some('/') && self.peek_char() == Some('*') {
                self.skip_block_comment()?;
            } else {
                break;
            }
        }

        let c = match self.ch {
            Some(c) => c,
            None => return Ok(Token::eof(self.line)),
        };

        let kind = match c {
            '"' => return self.read_string(),
            '=' => self.one_or_two('=', TokenKind::Assign, TokenKind::EqualEqual),
            '!' => self.one_or_two('=', TokenKind::Bang, TokenKind::NotEqual),
            '<' => self.one_or_two('=', TokenKind::Less, TokenKind::LessEqual),
            '>' => self.one_or_two('=', TokenKind::Greater, TokenKind::GreaterEqual),
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            c if is_letter(c) => return Ok(self.read_identifier()),
            c if c.is_ascii_digit() => return Ok(self.read_number()),
            character => {
                return Err(LexError::UnrecognizedCharacter {
                    position: self.position,
                    line: self.line,
                    character,
                })
            }
        };

        let start = self.position;
        let line = self.line;
        self.read_char();
        Ok(Token::new(kind, self.lexeme(start), line))
    }

    /// Consumes the second character of a two-character operator when it follows.
    fn one_or_two(&mut self, second: char, single: TokenKind, double: TokenKind) -> TokenKind {
        if self.peek_char() == Some(second) {
            self.read_char();
            double
        } else {
            single
        }
    }

    fn lexeme(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.position;
        let line = self.line;
        while self.ch.map_or(false, is_word_char) {
            self.read_char();
        }
        let text = self.lexeme(start);
        let kind = token::keyword(&text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, line)
    }

    // Real literals share the integer token kind; the interpreter resolves them.
    fn read_number(&mut self) -> Token {
        let start = self.position;
        let line = self.line;
        let mut seen_point = false;
        while let Some(c) = self.ch {
            if c.is_ascii_digit() {
                self.read_char();
            } else if c == '.' && !seen_point {
                seen_point = true;
                self.read_char();
            } else {
                break;
            }
        }
        Token::new(TokenKind::IntegerConstant, self.lexeme(start), line)
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let opening = self.position;
        let line = self.line;
        self.read_char();
        let start = self.position;
        while let Some(c) = self.ch {
            if c == '"' {
                let text = self.lexeme(start);
                self.read_char();
                return Ok(Token::new(TokenKind::StringConstant, text, line));
            }
            self.read_char();
        }
        Err(LexError::UnterminatedString {
            position: opening,
            line,
        })
    }

    fn skip_line_comment(&mut self) {
        while self.ch.map_or(false, |c| c != '\n') {
            self.read_char();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let opening = self.position;
        let line = self.line;
        self.read_char();
        self.read_char();
        loop {
            match self.ch {
                None => {
                    return Err(LexError::UnterminatedComment {
                        position: opening,
                        line,
                    })
                }
                Some('*') if self.peek_char() == Some('/') => {
                    self.read_char();
                    self.read_char();
                    return Ok(());
                }
                Some(_) => self.read_char(),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.ch.map_or(false, char::is_whitespace) {
            self.read_char();
        }
    }
}
