//! Frame-accurate phrase score, the lyric dialect's output
//!
//! This is the note layout a VOICEVOX-style singing synthesizer consumes:
//! notes carry absolute frame positions, and runs of adjacent notes are
//! grouped into phrases separated by the silence between them, so a
//! downstream renderer can synthesize each phrase in one request and pad
//! `distance` frames in between.

use crate::duration::{calc_frames, calc_ms};
use crate::error::Result;
use crate::notation::{Dialect, RawEvent, Song};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Output frames per second of the VOICEVOX engine (24000 Hz / 256 hop)
pub const FRAME_RATE: f64 = 93.75;

/// One resolved singing note
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameNote {
    /// MIDI-style key; the wire format allows `null` for padding silence
    pub key: Option<i32>,
    /// The syllable to sing (empty for melody-dialect input)
    pub lyric: String,
    /// Sounding length in frames
    pub frame_length: i64,
    /// Absolute start position in frames
    pub pos: i64,
    /// Absolute start position in milliseconds
    pub ms_pos: f64,
    /// Sounding length in milliseconds
    pub ms: f64,
}

/// A run of adjacent notes, preceded by `distance` frames of silence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phrase {
    pub distance: i64,
    pub notes: Vec<FrameNote>,
}

/// The resolved lyric score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameScore {
    pub tempo: u32,
    pub tracks: Vec<Phrase>,
}

/// Resolves lyric notation into frame-positioned phrases
#[derive(Debug, Clone)]
pub struct FrameCompiler {
    /// Frames per second of the target engine
    pub frame_rate: f64,
    /// Semitone shift applied to every resolved key
    pub key_shift: i32,
}

impl FrameCompiler {
    pub fn new() -> Self {
        Self {
            frame_rate: FRAME_RATE,
            key_shift: 0,
        }
    }

    /// Tokenize and resolve a whole lyric score
    pub fn compile(&self, text: &str) -> Result<FrameScore> {
        let song = Song::parse(text, Dialect::Lyric)?;
        self.resolve(&song)
    }

    /// Compile a score read from a file
    pub fn compile_file(&self, path: &Path) -> Result<FrameScore> {
        let text = fs::read_to_string(path)?;
        self.compile(&text)
    }

    /// Resolve an already tokenized song
    ///
    /// Walks every track in order keeping absolute frame and ms positions.
    /// Positions advance by each event's own rounded frame length, so notes
    /// with no rest between them stay exactly adjacent. A gap closes the
    /// current phrase and becomes the next phrase's `distance`. Chords (a
    /// melody-dialect song resolved here) sing their first pitch.
    pub fn resolve(&self, song: &Song) -> Result<FrameScore> {
        let mut phrases = Vec::new();
        let mut notes: Vec<FrameNote> = Vec::new();
        let mut distance = 0i64;

        let mut frame_pos = 0i64;
        let mut ms_pos = 0.0;
        // End of the last placed note, for gap detection
        let mut sung_until = 0i64;

        for event in song.tracks.iter().flatten() {
            let (duration, resolved) = match event {
                RawEvent::Rest { duration } => (duration, None),
                RawEvent::Note {
                    pitches,
                    duration,
                    lyric,
                } => {
                    let key = pitches[0].midi_number()? + self.key_shift;
                    (duration, Some((key, lyric.clone().unwrap_or_default())))
                }
            };

            let ms = calc_ms(duration, song.tempo)?;
            let frames = calc_frames(ms, self.frame_rate);

            if let Some((key, lyric)) = resolved {
                let gap = frame_pos - sung_until;
                if notes.is_empty() {
                    distance = gap;
                } else if gap > 0 {
                    phrases.push(Phrase {
                        distance,
                        notes: std::mem::take(&mut notes),
                    });
                    distance = gap;
                }

                notes.push(FrameNote {
                    key: Some(key),
                    lyric,
                    frame_length: frames,
                    pos: frame_pos,
                    ms_pos,
                    ms,
                });
                sung_until = frame_pos + frames;
            }

            frame_pos += frames;
            ms_pos += ms;
        }

        if !notes.is_empty() {
            phrases.push(Phrase { distance, notes });
        }

        Ok(FrameScore {
            tempo: song.tempo,
            tracks: phrases,
        })
    }
}

impl Default for FrameCompiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(text: &str) -> FrameScore {
        FrameCompiler::new().compile(text).expect("compilation failed")
    }

    #[test]
    fn test_single_note_wire_shape() {
        let value = serde_json::to_value(compile("あ:c4")).unwrap();
        assert_eq!(
            value,
            json!({
                "tempo": 120,
                "tracks": [{
                    "distance": 0,
                    "notes": [{
                        "key": 60,
                        "lyric": "あ",
                        "frame_length": 47,
                        "pos": 0,
                        "ms_pos": 0.0,
                        "ms": 500.0
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_adjacent_notes_stay_in_one_phrase() {
        let score = compile("あい:c4d4");
        assert_eq!(score.tracks.len(), 1);
        let notes = &score.tracks[0].notes;
        assert_eq!(notes[1].pos, notes[0].pos + notes[0].frame_length);
        assert_eq!(notes[1].ms_pos, 500.0);
    }

    #[test]
    fn test_rest_splits_phrases() {
        let score = compile("あいう:c4r4d4e4");
        assert_eq!(score.tracks.len(), 2);

        assert_eq!(score.tracks[0].distance, 0);
        assert_eq!(score.tracks[0].notes.len(), 1);

        assert_eq!(score.tracks[1].distance, 47);
        assert_eq!(score.tracks[1].notes.len(), 2);
        assert_eq!(score.tracks[1].notes[0].pos, 94);
        assert_eq!(score.tracks[1].notes[1].pos, 141);
    }

    #[test]
    fn test_leading_rest_becomes_first_distance() {
        let score = compile("あ:r4c4");
        assert_eq!(score.tracks.len(), 1);
        assert_eq!(score.tracks[0].distance, 47);

        let note = &score.tracks[0].notes[0];
        assert_eq!(note.pos, 47);
        assert_eq!(note.ms_pos, 500.0);
    }

    #[test]
    fn test_all_rests_make_no_phrases() {
        let score = compile(":r4r4");
        assert!(score.tracks.is_empty());
    }

    #[test]
    fn test_key_shift_applies_to_every_note() {
        let mut compiler = FrameCompiler::new();
        compiler.key_shift = -12;
        let score = compiler.compile("あい:cd").unwrap();
        assert_eq!(score.tracks[0].notes[0].key, Some(48));
        assert_eq!(score.tracks[0].notes[1].key, Some(50));
    }

    #[test]
    fn test_melody_song_sings_the_first_chord_pitch() {
        let song = Song::parse("ceg", Dialect::Melody).unwrap();
        let score = FrameCompiler::new().resolve(&song).unwrap();
        assert_eq!(score.tracks.len(), 1);
        assert_eq!(score.tracks[0].notes[0].key, Some(60));
        assert_eq!(score.tracks[0].notes[0].lyric, "");
    }
}
