//! Token types for the rule lexer.

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub text: String,
    /// 1-based column of the first character.
    pub col: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    At,
    Every,
    Play,
    Scale,
    Arpeggio,
    Repeat,

    // Literals
    Integer(u64),
    /// Any other whitespace-free run: timestamps, note lists.
    Word,

    Eof,
}

impl TokenKind {
    pub fn keyword(word: &str) -> Option<Self> {
        match word {
            "at" => Some(TokenKind::At),
            "every" => Some(TokenKind::Every),
            "play" => Some(TokenKind::Play),
            "scale" => Some(TokenKind::Scale),
            "arpeggio" => Some(TokenKind::Arpeggio),
            "repeat" => Some(TokenKind::Repeat),
            _ => None,
        }
    }

    /// Human-readable name used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::At => "'at'",
            TokenKind::Every => "'every'",
            TokenKind::Play => "'play'",
            TokenKind::Scale => "'scale'",
            TokenKind::Arpeggio => "'arpeggio'",
            TokenKind::Repeat => "'repeat'",
            TokenKind::Integer(_) => "integer",
            TokenKind::Word => "word",
            TokenKind::Eof => "end of line",
        }
    }
}
