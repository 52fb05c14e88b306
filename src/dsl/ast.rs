//! Syntax tree for one rule line.

use super::note::Note;

/// When a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Once, at an absolute instant.
    At,
    /// Repeatedly, with a fixed period.
    Every,
}

/// The trailing play-mode clause as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayModeDef {
    Scale,
    Arpeggio,
    Repeat { count: Option<u32> },
}

/// A parsed rule line: `<kind> <timestamp> play <notes> [<mode>]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDef {
    pub kind: CommandKind,
    /// Instant (`at`) or period (`every`) in milliseconds.
    pub timestamp_ms: u64,
    /// 1-based column of the timestamp token.
    pub timestamp_col: usize,
    pub notes: Vec<Note>,
    /// `None` when the line has no play-mode clause.
    pub play_mode: Option<PlayModeDef>,
}
