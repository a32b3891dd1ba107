//! Duration descriptors and time conversion
//!
//! A duration descriptor is the raw text accumulated for one event: digit
//! segments joined by `^` (tied, durations add), each segment optionally
//! dotted (x1.5). The digits are a whole-note denominator, so `4` is a
//! quarter note and `8` an eighth.

use crate::error::{Error, Result};

/// Tempo assumed when a score never declares one
pub const DEFAULT_TEMPO: u32 = 120;

/// Length denominator assumed when an event carries no digits (quarter note)
pub const DEFAULT_LENGTH: u32 = 4;

/// Ticks per quarter note for MIDI-style output
pub const DEFAULT_PPQ: u32 = 128;

/// Convert a duration descriptor to milliseconds at the given tempo
///
/// An empty descriptor means the default length. Empty or ill-formed
/// segments inside a tie are rejected.
pub fn calc_ms(descriptor: &str, tempo: u32) -> Result<f64> {
    if tempo == 0 {
        return Err(Error::InvalidTempo("0".to_string()));
    }
    if descriptor.is_empty() {
        return Ok(whole_ms(tempo) / DEFAULT_LENGTH as f64);
    }

    let mut total = 0.0;
    for segment in descriptor.split('^') {
        total += segment_ms(segment, tempo)?;
    }
    Ok(total)
}

/// Convert milliseconds to a whole number of audio frames
pub fn calc_frames(ms: f64, frame_rate: f64) -> i64 {
    (ms * frame_rate / 1000.0).round() as i64
}

/// Convert milliseconds to MIDI-style ticks; fractional ticks are preserved
pub fn calc_ticks(ms: f64, tempo: u32, ppq: u32) -> Result<f64> {
    if tempo == 0 {
        return Err(Error::InvalidTempo("0".to_string()));
    }
    let tick_ms = 60_000.0 / tempo as f64 / ppq as f64;
    Ok(ms / tick_ms)
}

/// Milliseconds of one whole note at the given tempo
fn whole_ms(tempo: u32) -> f64 {
    240_000.0 / tempo as f64
}

/// One tie segment: length digits, then nothing but dots
fn segment_ms(segment: &str, tempo: u32) -> Result<f64> {
    let digits_end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    let (digits, dots) = segment.split_at(digits_end);

    if digits.is_empty() || !dots.chars().all(|c| c == '.') {
        return Err(Error::MalformedDuration(segment.to_string()));
    }

    let length: u32 = digits
        .parse()
        .map_err(|_| Error::MalformedDuration(segment.to_string()))?;
    if length == 0 {
        return Err(Error::MalformedDuration(segment.to_string()));
    }

    let mut ms = whole_ms(tempo) / length as f64;
    if !dots.is_empty() {
        // Dotting is not cumulative: `4.` and `4..` both mean x1.5
        ms *= 1.5;
    }
    Ok(ms)
}
