//! Scheduling engine: compiled commands polled against a chronometer.
//!
//! The [`Chrono`] produces contiguous windows of elapsed time; a
//! [`RuleSet`] answers, for each window, which notes fire and when.

pub mod chrono;
pub mod command;
pub mod rules;
pub mod types;

pub use chrono::{format_elapsed, Chrono, PlayState};
pub use command::{Command, PlayMode};
pub use rules::{RuleSet, DEFAULT_INTER_NOTE_DELAY_MS};
pub use types::{NoteEvent, Window};
