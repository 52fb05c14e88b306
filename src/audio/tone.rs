//! Tone synthesis: a sine wave with short linear fades.

use std::f64::consts::PI;

use crate::dsl::note::Note;

/// Fraction of a tone spent fading in, and again fading out.
pub const RAMP_FRACTION: f64 = 0.05;

/// Amplitude at sample `i` of `len`: linear fade over the first and last
/// [`RAMP_FRACTION`] of the tone, full level in between.
pub fn ramp_gain(i: usize, len: usize) -> f64 {
    let ramp = (len as f64 * RAMP_FRACTION) as usize;
    if ramp == 0 {
        return 1.0;
    }
    if i < ramp {
        i as f64 / ramp as f64
    } else if i >= len.saturating_sub(ramp) {
        (len - i) as f64 / ramp as f64
    } else {
        1.0
    }
}

/// Number of samples in `duration_ms` at `sample_rate`, rounded up.
/// Saturates instead of wrapping for durations past the render limit.
pub fn sample_count(duration_ms: u64, sample_rate: u32) -> usize {
    let samples = duration_ms.saturating_mul(sample_rate as u64).div_ceil(1000);
    usize::try_from(samples).unwrap_or(usize::MAX)
}

/// Render a mono sine tone at `freq_hz`.
pub fn render_tone(freq_hz: f64, duration_ms: u64, sample_rate: u32) -> Vec<f32> {
    let len = sample_count(duration_ms, sample_rate);
    (0..len)
        .map(|i| {
            let phase = freq_hz * i as f64 / sample_rate as f64;
            ((phase * 2.0 * PI).sin() * ramp_gain(i, len)) as f32
        })
        .collect()
}

/// Render the tone for a rule note.
pub fn render_note(note: Note, duration_ms: u64, sample_rate: u32) -> Vec<f32> {
    render_tone(note.frequency(), duration_ms, sample_rate)
}
