//! Event data model: what the scheduler hands to the audio side.

use std::fmt;

use crate::dsl::note::Note;

/// A note to sound, `delay_ms` after the tick that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub note: Note,
    pub delay_ms: u64,
}

impl NoteEvent {
    pub fn new(note: Note, delay_ms: u64) -> Self {
        Self { note, delay_ms }
    }
}

impl fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{}ms)", self.note, self.delay_ms)
    }
}

/// A half-open polling window `[start_ms, end_ms)` measured from the
/// chronometer's logical zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Window {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn width(self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    pub fn is_empty(self) -> bool {
        self.end_ms <= self.start_ms
    }

    pub fn contains(self, instant_ms: u64) -> bool {
        self.start_ms <= instant_ms && instant_ms < self.end_ms
    }
}
