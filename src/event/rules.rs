//! Rule set: every compiled command of one rule text, polled together.

use crate::dsl::{Compiler, SyntaxError};

use super::command::Command;
use super::types::{NoteEvent, Window};

/// Spacing between stacked notes when none is configured.
pub const DEFAULT_INTER_NOTE_DELAY_MS: u64 = 250;

/// The compiled commands of one rule text, in source line order.
///
/// A rule set is built once per rule text and replaced wholesale when the
/// text changes. Windows passed to [`RuleSet::notes_to_play`] must be
/// contiguous and increasing, starting at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    commands: Vec<Command>,
    inter_note_delay_ms: u64,
}

impl RuleSet {
    pub fn new(commands: Vec<Command>, inter_note_delay_ms: u64) -> Self {
        Self {
            commands,
            inter_note_delay_ms,
        }
    }

    /// Compile rule text. Fails on the first invalid line; nothing is
    /// kept from the lines before it.
    pub fn compile(text: &str, inter_note_delay_ms: u64) -> Result<Self, SyntaxError> {
        let commands = Compiler::compile(text)?;
        tracing::info!(
            commands = commands.len(),
            inter_note_delay_ms,
            "rules loaded"
        );
        Ok(Self::new(commands, inter_note_delay_ms))
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn inter_note_delay_ms(&self) -> u64 {
        self.inter_note_delay_ms
    }

    /// Notes fired by every command in `[start_ms, end_ms)`, in declaration
    /// order. An empty or reversed window yields nothing.
    pub fn notes_to_play(&mut self, start_ms: u64, end_ms: u64) -> Vec<NoteEvent> {
        if Window::new(start_ms, end_ms).is_empty() {
            if end_ms < start_ms {
                tracing::warn!(start_ms, end_ms, "reversed polling window ignored");
            }
            return Vec::new();
        }

        let delay = self.inter_note_delay_ms;
        self.commands
            .iter_mut()
            .flat_map(|c| c.notes_to_play_between(start_ms, end_ms, delay))
            .collect()
    }

    /// Poll with a [`Window`].
    pub fn notes_in(&mut self, window: Window) -> Vec<NoteEvent> {
        self.notes_to_play(window.start_ms, window.end_ms)
    }

    /// Reset every command's cursor.
    pub fn reset(&mut self) {
        for command in &mut self.commands {
            command.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(events: &[NoteEvent]) -> Vec<String> {
        events.iter().map(|e| e.note.to_string()).collect()
    }

    #[test]
    fn compile_keeps_line_order() {
        let rules = RuleSet::compile("every 1s play C\nat 2s play D", 250).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.commands()[0].timestamp_ms(), 1_000);
        assert_eq!(rules.commands()[1].timestamp_ms(), 2_000);
    }

    #[test]
    fn events_concatenate_in_declaration_order() {
        let mut rules = RuleSet::compile("at 1s play G\nevery 1s play C,E", 250).unwrap();
        let events = rules.notes_to_play(950, 1_050);
        assert_eq!(names(&events), vec!["G", "C", "E"]);
    }

    #[test]
    fn reversed_window_is_empty() {
        let mut rules = RuleSet::compile("every 1s play C", 250).unwrap();
        assert!(rules.notes_to_play(1_500, 500).is_empty());
        assert!(rules.notes_to_play(1_000, 1_000).is_empty());
    }

    #[test]
    fn reset_all_cursors() {
        let mut rules =
            RuleSet::compile("every 1s play C,E scale\nevery 1s play C,E arpeggio", 250).unwrap();
        rules.notes_to_play(900, 1_000);
        assert!(rules.commands().iter().all(|c| c.cursor() == 1));
        rules.reset();
        assert!(rules.commands().iter().all(|c| c.cursor() == 0));
    }

    #[test]
    fn uses_configured_delay() {
        let mut rules = RuleSet::compile("every 1s play C,E repeat 2", 100).unwrap();
        rules.notes_to_play(900, 1_000);
        let events = rules.notes_in(Window::new(1_900, 2_000));
        let delays: Vec<u64> = events.iter().map(|e| e.delay_ms).collect();
        assert_eq!(delays, vec![0, 0, 100, 100]);
    }

    #[test]
    fn failed_compile_returns_error() {
        let err = RuleSet::compile("every 1s play C\nevery 0s play C", 250).unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.text, "every 0s play C");
    }
}
