//! Lexer (tokenizer) for chain expressions.

use crate::error::{RatioGraphError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

/// Token types in a chain expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A node name
    Name,
    /// A run of ASCII digits (multiplicity)
    Number,
    /// Segment separator '.'
    Dot,
    /// Fan-out separator ','
    Comma,
    /// End of input
    Eof,
}

/// Map alternate full stops and commas onto their ASCII forms.
fn normalize(ch: char) -> char {
    match ch {
        '\u{3002}' | '\u{FF0E}' => '.',
        '\u{FF0C}' => ',',
        other => other,
    }
}

/// Lexer for tokenizing a single chain expression.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let start_column = self.column;
        let ch = match self.peek() {
            Some(ch) => ch,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    column: start_column,
                });
            }
        };

        let token = match ch {
            '.' => {
                self.advance();
                Token {
                    kind: TokenKind::Dot,
                    text: ".".to_string(),
                    column: start_column,
                }
            }
            ',' => {
                self.advance();
                Token {
                    kind: TokenKind::Comma,
                    text: ",".to_string(),
                    column: start_column,
                }
            }
            '0'..='9' => Token {
                kind: TokenKind::Number,
                text: self.read_while(|c| c.is_ascii_digit()),
                column: start_column,
            },
            _ if ch.is_alphabetic() || ch == '_' => Token {
                kind: TokenKind::Name,
                text: self.read_while(|c| c.is_alphanumeric() || c == '_'),
                column: start_column,
            },
            _ => {
                return Err(RatioGraphError::parse(
                    self.input,
                    format!("unexpected character '{}' at column {}", ch, start_column),
                ));
            }
        };

        Ok(token)
    }

    /// Collect every token up to and including `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied().map(normalize)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next().map(normalize)?;
        self.column += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if accept(ch) {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }
}
