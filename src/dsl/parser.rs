//! Parser for one rule line.
//!
//! ```text
//! line         := playKind SP timestamp SP "play" SP noteList (SP notePlayMode)?
//! playKind     := "at" | "every"
//! timestamp    := segment (":" segment){0,3}
//! segment      := digits unit
//! unit         := "h" | "m" | "s" | "ds"
//! noteList     := note ("," note)*
//! note         := [A-G] ("#" | "b")?
//! notePlayMode := "scale" | "arpeggio" | "repeat" (SP digits)?
//! ```

use super::ast::*;
use super::error::{ErrorKind, LineError};
use super::note::Note;
use super::token::{Token, TokenKind};
use super::units::parse_timestamp;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_rule(&mut self) -> Result<RuleDef, LineError> {
        let kind = self.parse_kind()?;
        let timestamp_col = self.peek().col;
        let timestamp_ms = self.parse_timestamp()?;
        self.expect(TokenKind::Play)?;
        let notes = self.parse_note_list()?;
        let play_mode = self.parse_play_mode()?;

        let t = self.peek();
        if t.kind != TokenKind::Eof {
            return Err(LineError::new(
                ErrorKind::Grammar,
                format!("unexpected '{}' at end of rule", t.text),
                t.col,
            ));
        }

        Ok(RuleDef {
            kind,
            timestamp_ms,
            timestamp_col,
            notes,
            play_mode,
        })
    }

    fn peek(&self) -> &Token {
        // The lexer always terminates the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let t = self.peek().clone();
        if t.kind != TokenKind::Eof {
            self.pos += 1;
        }
        t
    }

    fn found(t: &Token) -> String {
        match t.kind {
            TokenKind::Eof => "end of line".to_string(),
            _ => format!("'{}'", t.text),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, LineError> {
        let t = self.peek();
        if t.kind == kind {
            Ok(self.advance())
        } else {
            Err(LineError::new(
                ErrorKind::Grammar,
                format!("expected {}, found {}", kind.describe(), Self::found(t)),
                t.col,
            ))
        }
    }

    fn parse_kind(&mut self) -> Result<CommandKind, LineError> {
        let t = self.advance();
        match t.kind {
            TokenKind::At => Ok(CommandKind::At),
            TokenKind::Every => Ok(CommandKind::Every),
            TokenKind::Eof => Err(LineError::new(
                ErrorKind::Grammar,
                "blank lines are not allowed",
                t.col,
            )),
            _ => Err(LineError::new(
                ErrorKind::Grammar,
                format!("expected 'at' or 'every', found '{}'", t.text),
                t.col,
            )),
        }
    }

    fn parse_timestamp(&mut self) -> Result<u64, LineError> {
        let t = self.advance();
        match t.kind {
            TokenKind::Word | TokenKind::Integer(_) => parse_timestamp(&t.text).map_err(|e| {
                let col = t.col + t.text[..e.offset()].chars().count();
                LineError::new(ErrorKind::Timestamp, e.to_string(), col)
            }),
            _ => Err(LineError::new(
                ErrorKind::Grammar,
                format!("expected timestamp, found {}", Self::found(&t)),
                t.col,
            )),
        }
    }

    fn parse_note_list(&mut self) -> Result<Vec<Note>, LineError> {
        let t = self.advance();
        if !matches!(t.kind, TokenKind::Word | TokenKind::Integer(_)) {
            return Err(LineError::new(
                ErrorKind::NoteList,
                format!("expected note list, found {}", Self::found(&t)),
                t.col,
            ));
        }
        if t.text.ends_with(',') {
            return Err(LineError::new(
                ErrorKind::NoteList,
                "note list ends with a trailing ','",
                t.col + t.text.chars().count() - 1,
            ));
        }

        let mut notes = Vec::new();
        let mut offset = 0;
        for item in t.text.split(',') {
            let note = item.parse::<Note>().map_err(|e| {
                let msg = if item.is_empty() {
                    "empty note in note list".to_string()
                } else {
                    format!("invalid note '{item}': {e}")
                };
                LineError::new(ErrorKind::NoteList, msg, t.col + offset)
            })?;
            notes.push(note);
            offset += item.chars().count() + 1;
        }
        Ok(notes)
    }

    fn parse_play_mode(&mut self) -> Result<Option<PlayModeDef>, LineError> {
        let t = self.peek().clone();
        let mode = match t.kind {
            TokenKind::Eof => return Ok(None),
            TokenKind::Scale => PlayModeDef::Scale,
            TokenKind::Arpeggio => PlayModeDef::Arpeggio,
            TokenKind::Repeat => {
                self.advance();
                return Ok(Some(PlayModeDef::Repeat {
                    count: self.parse_repeat_count()?,
                }));
            }
            _ => {
                return Err(LineError::new(
                    ErrorKind::PlayMode,
                    format!(
                        "expected 'scale', 'arpeggio' or 'repeat', found '{}'",
                        t.text
                    ),
                    t.col,
                ))
            }
        };
        self.advance();

        let next = self.peek();
        if let TokenKind::Integer(_) = next.kind {
            return Err(LineError::new(
                ErrorKind::PlayMode,
                format!("a count is only allowed after 'repeat', not '{}'", t.text),
                next.col,
            ));
        }
        Ok(Some(mode))
    }

    fn parse_repeat_count(&mut self) -> Result<Option<u32>, LineError> {
        let t = self.peek().clone();
        match t.kind {
            TokenKind::Integer(n) => {
                self.advance();
                match u32::try_from(n) {
                    Ok(0) => Err(LineError::new(
                        ErrorKind::PlayMode,
                        "repeat count must be at least 1",
                        t.col,
                    )),
                    Ok(count) => Ok(Some(count)),
                    Err(_) => Err(LineError::new(
                        ErrorKind::PlayMode,
                        "repeat count is too large",
                        t.col,
                    )),
                }
            }
            _ => Ok(None),
        }
    }
}
