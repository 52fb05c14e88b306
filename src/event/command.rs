//! Compiled rule: one stateful command evaluated against polling windows.
//!
//! An `at` command fires once when its instant falls inside a window. An
//! `every` command fires whenever a window crosses a multiple of its
//! period, and what it emits depends on its [`PlayMode`] and cursor:
//!
//! - `Scale`: one note per firing, walking the list and wrapping.
//! - `Arpeggio`: a growing prefix of the list, each note one delay step
//!   after the previous, wrapping back to a single note.
//! - `Repeat`: the whole list as a chord, stacked once more per firing up
//!   to the repeat maximum, each stack one delay step later.

use std::num::NonZeroU64;

use crate::dsl::ast::CommandKind;
use crate::dsl::note::Note;

use super::types::{NoteEvent, Window};

/// How an `every` command spreads its notes over successive firings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Scale,
    Arpeggio,
    Repeat { max: u32 },
}

/// A compiled rule with its cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    kind: CommandKind,
    timestamp_ms: u64,
    notes: Vec<Note>,
    play_mode: PlayMode,
    cursor: usize,
}

impl Command {
    /// A one-shot command firing at `instant_ms`.
    ///
    /// # Panics
    /// If `notes` is empty.
    pub fn at(instant_ms: u64, notes: Vec<Note>) -> Self {
        assert!(!notes.is_empty(), "a command needs at least one note");
        Self {
            kind: CommandKind::At,
            timestamp_ms: instant_ms,
            notes,
            play_mode: PlayMode::Repeat { max: 1 },
            cursor: 0,
        }
    }

    /// A periodic command. A repeat maximum of 0 is treated as 1.
    ///
    /// # Panics
    /// If `notes` is empty.
    pub fn every(period_ms: NonZeroU64, notes: Vec<Note>, play_mode: PlayMode) -> Self {
        assert!(!notes.is_empty(), "a command needs at least one note");
        let play_mode = match play_mode {
            PlayMode::Repeat { max } => PlayMode::Repeat { max: max.max(1) },
            other => other,
        };
        Self {
            kind: CommandKind::Every,
            timestamp_ms: period_ms.get(),
            notes,
            play_mode,
            cursor: 0,
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Firing instant for `at`, period for `every`, in milliseconds.
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether this command fires in `window`. Never touches the cursor.
    pub fn fires(&self, window: Window) -> bool {
        if window.is_empty() {
            return false;
        }
        match self.kind {
            CommandKind::At => window.contains(self.timestamp_ms),
            CommandKind::Every => {
                let period = self.timestamp_ms;
                let min_mod = window.start_ms % period;
                let max_mod = window.end_ms % period;
                // The modulus wraps when the window crosses a multiple of the
                // period; a window at least one period wide always crosses one.
                min_mod > max_mod || window.width() >= period
            }
        }
    }

    /// Notes emitted by a firing from the current cursor, and the cursor
    /// that follows it.
    pub fn emission(&self, inter_note_delay_ms: u64) -> (usize, Vec<NoteEvent>) {
        let step = |i: usize| (i as u64).saturating_mul(inter_note_delay_ms);

        if self.kind == CommandKind::At {
            let events = self.notes.iter().map(|&n| NoteEvent::new(n, 0)).collect();
            return (self.cursor, events);
        }

        let len = self.notes.len();
        match self.play_mode {
            PlayMode::Scale => {
                let events = vec![NoteEvent::new(self.notes[self.cursor], 0)];
                ((self.cursor + 1) % len, events)
            }
            PlayMode::Arpeggio => {
                let events = self.notes[..=self.cursor]
                    .iter()
                    .enumerate()
                    .map(|(i, &n)| NoteEvent::new(n, step(i)))
                    .collect();
                ((self.cursor + 1) % len, events)
            }
            PlayMode::Repeat { max } => {
                let events = (0..=self.cursor)
                    .flat_map(|i| self.notes.iter().map(move |&n| NoteEvent::new(n, step(i))))
                    .collect();
                ((self.cursor + 1) % max as usize, events)
            }
        }
    }

    /// Notes to play for the window `[start_ms, end_ms)`, advancing the
    /// cursor when the command fires.
    pub fn notes_to_play_between(
        &mut self,
        start_ms: u64,
        end_ms: u64,
        inter_note_delay_ms: u64,
    ) -> Vec<NoteEvent> {
        if !self.fires(Window::new(start_ms, end_ms)) {
            return Vec::new();
        }
        let (next, events) = self.emission(inter_note_delay_ms);
        tracing::debug!(
            kind = ?self.kind,
            timestamp_ms = self.timestamp_ms,
            cursor = self.cursor,
            count = events.len(),
            "command fired"
        );
        self.cursor = next;
        events
    }

    /// Return the cursor to its initial state.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}
