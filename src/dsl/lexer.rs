//! Lexer for a single rule line.
//!
//! Words are separated by exactly one ASCII space. Leading, trailing or
//! doubled spaces, tabs and control characters are rejected here so the
//! parser only ever sees well-separated tokens.

use super::error::LexError;
use super::token::{Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            pos: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            if self.is_at_end() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    col: self.col(),
                });
                break;
            }

            if !tokens.is_empty() {
                self.expect_separator()?;
            }
            tokens.push(self.lex_word()?);
        }

        Ok(tokens)
    }

    fn col(&self) -> usize {
        self.pos + 1
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn expect_separator(&mut self) -> Result<(), LexError> {
        // The previous word stopped on a space; consume exactly that one.
        self.advance();
        if self.is_at_end() {
            return Err(LexError::new("trailing space", self.pos));
        }
        if self.peek() == ' ' {
            return Err(LexError::new(
                "words must be separated by a single space",
                self.col(),
            ));
        }
        Ok(())
    }

    fn lex_word(&mut self) -> Result<Token, LexError> {
        let col = self.col();
        let mut text = String::new();

        while !self.is_at_end() {
            let ch = self.peek();
            if ch == ' ' {
                break;
            }
            if ch.is_whitespace() || ch.is_control() {
                return Err(LexError::new(
                    format!("unexpected character {ch:?}"),
                    self.col(),
                ));
            }
            text.push(self.advance());
        }

        if text.is_empty() {
            return Err(LexError::new("leading space", col));
        }

        let kind = if let Some(keyword) = TokenKind::keyword(&text) {
            keyword
        } else if text.chars().all(|c| c.is_ascii_digit()) {
            text.parse().map(TokenKind::Integer).unwrap_or(TokenKind::Word)
        } else {
            TokenKind::Word
        };

        Ok(Token { kind, text, col })
    }
}
