//! Note tokens such as `C`, `Eb` or `F#`, and their pitch.
//!
//! Rules name notes without an octave; every note sounds in octave 4
//! (C4 = MIDI 60, A4 = 440 Hz).

use std::fmt;
use std::str::FromStr;

/// Octave every rule note is played in.
pub const NOTE_OCTAVE: i32 = 4;

/// A chromatic alteration of a natural note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

/// A note token from a rule's note list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    letter: char,
    accidental: Accidental,
}

/// Why a note token was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    Empty,
    InvalidLetter(char),
    InvalidAccidental(char),
    TrailingInput(String),
}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteError::Empty => write!(f, "empty note"),
            NoteError::InvalidLetter(c) => write!(f, "'{c}' is not a note letter (A-G)"),
            NoteError::InvalidAccidental(c) => {
                write!(f, "'{c}' is not an accidental (expected '#' or 'b')")
            }
            NoteError::TrailingInput(s) => write!(f, "unexpected '{s}' after note"),
        }
    }
}

impl std::error::Error for NoteError {}

impl Note {
    /// Semitone offset from C within the octave, before the accidental.
    fn base_semitone(self) -> i32 {
        match self.letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            _ => 11,
        }
    }

    /// MIDI note number in [`NOTE_OCTAVE`]. `Cb` is B3 and `B#` is C5.
    pub fn midi(self) -> u8 {
        let shift = match self.accidental {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        };
        // MIDI note = (octave + 1) * 12 + base + accidental
        ((NOTE_OCTAVE + 1) * 12 + self.base_semitone() + shift) as u8
    }

    /// Frequency in Hz, equal temperament with A4 = 440 Hz.
    pub fn frequency(self) -> f64 {
        440.0 * 2.0f64.powf((self.midi() as f64 - 69.0) / 12.0)
    }
}

impl FromStr for Note {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(NoteError::Empty)?;
        if !matches!(letter, 'A'..='G') {
            return Err(NoteError::InvalidLetter(letter));
        }

        let accidental = match chars.next() {
            None => Accidental::Natural,
            Some('#') => Accidental::Sharp,
            Some('b') => Accidental::Flat,
            Some(c) => return Err(NoteError::InvalidAccidental(c)),
        };

        let rest: String = chars.collect();
        if !rest.is_empty() {
            return Err(NoteError::TrailingInput(rest));
        }

        Ok(Self { letter, accidental })
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accidental {
            Accidental::Natural => write!(f, "{}", self.letter),
            Accidental::Sharp => write!(f, "{}#", self.letter),
            Accidental::Flat => write!(f, "{}b", self.letter),
        }
    }
}
