//! MIDI-style delta-time event list, the melody dialect's output

use crate::duration::{calc_ms, calc_ticks, DEFAULT_PPQ};
use crate::error::Result;
use crate::notation::{Dialect, RawEvent, Song};
use serde::{Serialize, Serializer};
use std::fs;
use std::path::Path;

/// A tick count rendered on the wire as a `T`-prefixed string (`"T128"`,
/// fractional values kept as-is)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticks(pub f64);

impl Serialize for Ticks {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("T{}", self.0))
    }
}

/// Rest time accumulated before a note
///
/// Serializes as the number `0` when the note follows immediately, or as a
/// tick string like a duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wait {
    None,
    Rest(f64),
}

impl Serialize for Wait {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Wait::None => serializer.serialize_u32(0),
            Wait::Rest(ticks) => Ticks(*ticks).serialize(serializer),
        }
    }
}

/// One resolved melody event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MidiNote {
    /// MIDI note numbers, chord order preserved
    pub pitch: Vec<i32>,
    /// Sounding length in ticks
    pub duration: Ticks,
    /// Rest accumulated since the previous note
    pub wait: Wait,
}

/// The resolved melody score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MidiScore {
    pub tempo: u32,
    pub tracks: Vec<MidiNote>,
}

/// Resolves melody notation into a flat delta-time event list
#[derive(Debug, Clone)]
pub struct MidiCompiler {
    /// Ticks per quarter note
    pub ppq: u32,
}

impl MidiCompiler {
    pub fn new(ppq: u32) -> Self {
        Self { ppq }
    }

    /// Tokenize and resolve a whole melody score
    pub fn compile(&self, text: &str) -> Result<MidiScore> {
        let song = Song::parse(text, Dialect::Melody)?;
        self.resolve(&song)
    }

    /// Compile a score read from a file
    pub fn compile_file(&self, path: &Path) -> Result<MidiScore> {
        let text = fs::read_to_string(path)?;
        self.compile(&text)
    }

    /// Resolve an already tokenized song
    ///
    /// Tracks are flattened in order. Rests fold into the following note's
    /// `wait`, so the output stream has no explicit rest entries.
    pub fn resolve(&self, song: &Song) -> Result<MidiScore> {
        let mut tracks = Vec::new();
        let mut pending_wait = 0.0;

        for event in song.tracks.iter().flatten() {
            match event {
                RawEvent::Rest { duration } => {
                    let ms = calc_ms(duration, song.tempo)?;
                    pending_wait += calc_ticks(ms, song.tempo, self.ppq)?;
                }
                RawEvent::Note {
                    pitches, duration, ..
                } => {
                    let ms = calc_ms(duration, song.tempo)?;
                    let ticks = calc_ticks(ms, song.tempo, self.ppq)?;
                    let pitch = pitches
                        .iter()
                        .map(|p| p.midi_number())
                        .collect::<Result<Vec<i32>>>()?;

                    tracks.push(MidiNote {
                        pitch,
                        duration: Ticks(ticks),
                        wait: if pending_wait != 0.0 {
                            Wait::Rest(pending_wait)
                        } else {
                            Wait::None
                        },
                    });
                    pending_wait = 0.0;
                }
            }
        }

        Ok(MidiScore {
            tempo: song.tempo,
            tracks,
        })
    }
}

impl Default for MidiCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_PPQ)
    }
}
