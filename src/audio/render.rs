//! Offline render: drive a rule set on a simulated clock and mix the
//! resulting tones into a mono buffer.

use std::path::Path;

use thiserror::Error;

use crate::event::{RuleSet, Window};

use super::tone::{render_note, sample_count};

/// Gain applied to each tone before mixing.
pub const VOICE_GAIN: f32 = 0.3;

/// Longest render, and longest single tone, accepted.
pub const MAX_RENDER_MS: u64 = 3_600_000;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{what} of {duration_ms}ms is longer than one hour")]
    TooLong { what: &'static str, duration_ms: u64 },
}

/// Parameters of an offline render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Elapsed time to simulate.
    pub length_ms: u64,
    /// Polling cadence of the simulated clock.
    pub tick_ms: u64,
    pub note_duration_ms: u64,
    pub sample_rate: u32,
}

/// A note placed on the rendered timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedNote {
    pub at_ms: u64,
    pub note: crate::dsl::Note,
}

/// Poll `rules` with contiguous windows of `tick_ms` up to `length_ms` and
/// return every note with its absolute start time. A note fired in window
/// `[a, b)` starts at `b + delay`, when the tick at `b` would play it.
pub fn schedule(rules: &mut RuleSet, length_ms: u64, tick_ms: u64) -> Vec<PlacedNote> {
    let tick_ms = tick_ms.max(1);
    let mut placed = Vec::new();
    let mut start = 0;

    while start < length_ms {
        let end = start.saturating_add(tick_ms).min(length_ms);
        for event in rules.notes_in(Window::new(start, end)) {
            placed.push(PlacedNote {
                at_ms: end.saturating_add(event.delay_ms),
                note: event.note,
            });
        }
        start = end;
    }

    placed
}

/// Render `rules` to a mono buffer of exactly `length_ms`. Tones that run
/// past the end are cut.
pub fn render_rules(
    rules: &mut RuleSet,
    settings: &RenderSettings,
) -> Result<Vec<f32>, RenderError> {
    if settings.length_ms > MAX_RENDER_MS {
        return Err(RenderError::TooLong {
            what: "render length",
            duration_ms: settings.length_ms,
        });
    }
    if settings.note_duration_ms > MAX_RENDER_MS {
        return Err(RenderError::TooLong {
            what: "note duration",
            duration_ms: settings.note_duration_ms,
        });
    }

    let total = sample_count(settings.length_ms, settings.sample_rate);
    let mut buffer = vec![0.0f32; total];

    let placed = schedule(rules, settings.length_ms, settings.tick_ms);
    tracing::debug!(notes = placed.len(), "rendering schedule");

    for p in placed {
        let offset = sample_count(p.at_ms, settings.sample_rate);
        if offset >= total {
            continue;
        }
        let tone = render_note(p.note, settings.note_duration_ms, settings.sample_rate);
        for (dst, src) in buffer[offset..].iter_mut().zip(tone) {
            *dst += src * VOICE_GAIN;
        }
    }

    for sample in buffer.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }
    Ok(buffer)
}

/// Write mono samples as 16-bit PCM WAV.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample((s * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}
