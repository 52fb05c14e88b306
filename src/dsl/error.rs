//! Error types for the rule compiler.

use thiserror::Error;

/// Which compiler stage rejected a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Grammar,
    Timestamp,
    NoteList,
    PlayMode,
}

/// A lexing failure inside one line, before the line index is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub col: usize,
}

impl LexError {
    pub fn new(message: impl Into<String>, col: usize) -> Self {
        Self {
            message: message.into(),
            col,
        }
    }
}

/// A problem found while parsing one line, positioned by column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub kind: ErrorKind,
    pub message: String,
    pub col: usize,
}

impl LineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, col: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            col,
        }
    }

    /// Attach the line index and source text.
    pub fn at_line(self, line: usize, text: &str) -> SyntaxError {
        SyntaxError {
            line,
            col: self.col,
            text: text.to_string(),
            kind: self.kind,
            message: self.message,
        }
    }
}

impl From<LexError> for LineError {
    fn from(e: LexError) -> Self {
        LineError::new(ErrorKind::Lex, e.message, e.col)
    }
}

/// The first invalid line of a rule text. Compilation stops here and the
/// whole rule set is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rule at line {line}, column {col}: {message}\n{text}")]
pub struct SyntaxError {
    /// 0-based line index.
    pub line: usize,
    /// 1-based column where the problem starts.
    pub col: usize,
    /// The offending line, verbatim.
    pub text: String,
    pub kind: ErrorKind,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_line_and_text() {
        let err = LineError::new(ErrorKind::Grammar, "expected 'play'", 7).at_line(2, "at 5s C");
        let msg = err.to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains("column 7"));
        assert!(msg.ends_with("\nat 5s C"));
    }

    #[test]
    fn lex_error_converts() {
        let line: LineError = LexError::new("trailing space", 9).into();
        assert_eq!(line.kind, ErrorKind::Lex);
        assert_eq!(line.col, 9);
    }
}
