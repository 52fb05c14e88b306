//! Audio side: tone synthesis and offline rendering of note events.

pub mod render;
pub mod tone;

pub use render::{render_rules, schedule, write_wav, PlacedNote, RenderError, RenderSettings};
pub use tone::{render_note, render_tone};
