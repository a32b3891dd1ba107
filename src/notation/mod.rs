//! Notation tokenizer
//!
//! Scans one statement of notation text character by character, tracking the
//! octave, pending tempo/octave digits and the in-progress event. Letters
//! `c`-`b` sound pitches, `r` rests, `o`+digit sets the octave, `t`+digits
//! the tempo, `<`/`>` step the octave down/up, digits and dots accumulate
//! into the open event's duration, `^` ties, `+`/`#`/`-` alter the last
//! pitch. Anything else is cosmetic and skipped.

pub mod event;
pub mod song;

pub use event::RawEvent;
pub use song::Song;

use crate::duration::DEFAULT_TEMPO;
use crate::error::{Error, Result};
use crate::pitch::{Accidental, Letter, Pitch};
use event::EventBuilder;
use std::collections::VecDeque;

/// Which notation dialect a score is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Letters map straight to pitches; consecutive letters stack into one
    /// chord until a digit or dot closes the note
    Melody,
    /// Every pitch letter is its own note and consumes one syllable from the
    /// parallel lyric text
    Lyric,
}

/// Tokenized form of one statement
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Tempo in beats per minute (the default when the statement has no
    /// `t` run)
    pub tempo: u32,
    pub events: Vec<RawEvent>,
    /// Octave state at the end of the statement, carried into the next one
    pub ending_octave: i32,
}

impl Line {
    /// Tokenize one melody-dialect statement
    pub fn parse_melody(notation: &str, octave: i32) -> Result<Line> {
        Scanner::new(Dialect::Melody, octave, "").run(notation)
    }

    /// Tokenize one lyric-dialect statement against its syllable text
    pub fn parse_lyric(notation: &str, lyrics: &str, octave: i32) -> Result<Line> {
        Scanner::new(Dialect::Lyric, octave, lyrics).run(notation)
    }
}

/// Digit-consuming mode armed by `o` or `t`
///
/// Any pitch letter, `r`, `o` or `t` disarms it; every other character
/// leaves it armed, so `o 5` and `t1<2` behave like `o5` and `t12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    /// Each digit (re)sets the octave, so `o45` ends at octave 5
    Octave,
    /// Digits accumulate into the tempo buffer
    Tempo,
}

struct Scanner {
    dialect: Dialect,
    octave: i32,
    pending: Pending,
    tempo_digits: String,
    /// Set by digits and dots. A sealed note cannot take further chord
    /// pitches; the next letter opens a fresh event.
    sealed: bool,
    builder: EventBuilder,
    events: Vec<RawEvent>,
    syllables: VecDeque<char>,
}

impl Scanner {
    fn new(dialect: Dialect, octave: i32, lyrics: &str) -> Self {
        Self {
            dialect,
            octave,
            pending: Pending::None,
            tempo_digits: String::new(),
            sealed: true,
            builder: EventBuilder::Idle,
            events: Vec::new(),
            syllables: lyrics.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    fn run(mut self, notation: &str) -> Result<Line> {
        for c in notation.chars() {
            self.step(c.to_ascii_lowercase())?;
        }
        self.builder.close(&mut self.events);

        let tempo = if self.tempo_digits.is_empty() {
            DEFAULT_TEMPO
        } else {
            match self.tempo_digits.parse::<u32>() {
                Ok(tempo) if tempo > 0 => tempo,
                _ => return Err(Error::InvalidTempo(self.tempo_digits)),
            }
        };

        Ok(Line {
            tempo,
            events: self.events,
            ending_octave: self.octave,
        })
    }

    fn step(&mut self, c: char) -> Result<()> {
        if let Some(letter) = Letter::from_char(c) {
            self.pending = Pending::None;
            return self.open_or_extend(letter);
        }

        match c {
            'r' => {
                self.pending = Pending::None;
                self.builder.close(&mut self.events);
                self.builder = EventBuilder::open_rest();
                self.sealed = false;
            }
            'o' => self.pending = Pending::Octave,
            't' => {
                self.pending = Pending::Tempo;
                self.tempo_digits.clear();
            }
            '<' => self.octave -= 1,
            '>' => self.octave += 1,
            '.' => {
                self.builder.push_duration('.')?;
                self.sealed = true;
            }
            '^' => self.builder.push_duration('^')?,
            '0'..='9' => match self.pending {
                Pending::Octave => self.octave = (c as u8 - b'0') as i32,
                Pending::Tempo => self.tempo_digits.push(c),
                Pending::None => {
                    self.builder.push_duration(c)?;
                    self.sealed = true;
                }
            },
            '+' | '#' => self.builder.apply_accidental(Accidental::Sharp, c)?,
            '-' => self.builder.apply_accidental(Accidental::Flat, c)?,
            // Commas and anything unrecognized are cosmetic
            _ => {}
        }

        Ok(())
    }

    /// A pitch letter extends the open chord (melody dialect, unsealed note)
    /// or closes the open event and starts a fresh note
    fn open_or_extend(&mut self, letter: Letter) -> Result<()> {
        let pitch = Pitch::new(letter, self.octave);

        if self.dialect == Dialect::Melody && !self.sealed {
            if let EventBuilder::Note { pitches, .. } = &mut self.builder {
                pitches.push(pitch);
                return Ok(());
            }
        }

        let lyric = match self.dialect {
            Dialect::Melody => None,
            Dialect::Lyric => Some(self.next_syllable()?),
        };

        self.builder.close(&mut self.events);
        self.builder = EventBuilder::open_note(pitch, lyric);
        self.sealed = false;
        Ok(())
    }

    fn next_syllable(&mut self) -> Result<String> {
        match self.syllables.pop_front() {
            Some(c) => Ok(c.to_string()),
            None => Err(Error::MissingLyric),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn melody(notation: &str) -> Line {
        Line::parse_melody(notation, 4).expect("notation should parse")
    }

    fn lyric(notation: &str, lyrics: &str) -> Line {
        Line::parse_lyric(notation, lyrics, 4).expect("notation should parse")
    }

    /// Pitch spellings of a note event, e.g. ["c4", "e4"]
    fn spellings(event: &RawEvent) -> Vec<String> {
        match event {
            RawEvent::Note { pitches, .. } => pitches.iter().map(|p| p.to_string()).collect(),
            RawEvent::Rest { .. } => panic!("expected a note, got a rest"),
        }
    }

    fn duration(event: &RawEvent) -> &str {
        match event {
            RawEvent::Note { duration, .. } | RawEvent::Rest { duration } => duration,
        }
    }

    #[test]
    fn test_consecutive_letters_stack_into_a_chord() {
        let line = melody("ceg");
        assert_eq!(line.events.len(), 1);
        assert_eq!(spellings(&line.events[0]), vec!["c4", "e4", "g4"]);
    }

    #[test]
    fn test_digits_seal_the_open_note() {
        let line = melody("c4d4");
        assert_eq!(line.events.len(), 2);
        assert_eq!(spellings(&line.events[0]), vec!["c4"]);
        assert_eq!(spellings(&line.events[1]), vec!["d4"]);
    }

    #[test]
    fn test_dots_seal_the_open_note() {
        let line = melody("c.d");
        assert_eq!(line.events.len(), 2);
        assert_eq!(duration(&line.events[0]), ".");
    }

    #[test]
    fn test_tie_does_not_seal() {
        // The tie keeps the chord open, leaving its duration starting at '^'
        let line = melody("c^d");
        assert_eq!(line.events.len(), 1);
        assert_eq!(spellings(&line.events[0]), vec!["c4", "d4"]);
        assert_eq!(duration(&line.events[0]), "^");
    }

    #[test]
    fn test_duration_accumulates_in_order() {
        let line = melody("c4.^8");
        assert_eq!(duration(&line.events[0]), "4.^8");

        let line = melody("c16");
        assert_eq!(duration(&line.events[0]), "16");
    }

    #[test]
    fn test_octave_shifts_are_relative() {
        let line = melody("o5c4<c4>c4");
        assert_eq!(line.events.len(), 3);
        assert_eq!(spellings(&line.events[0]), vec!["c5"]);
        assert_eq!(spellings(&line.events[1]), vec!["c4"]);
        assert_eq!(spellings(&line.events[2]), vec!["c5"]);
        assert_eq!(line.ending_octave, 5);
    }

    #[test]
    fn test_octave_shift_inside_an_open_chord() {
        let line = melody("o5c<c");
        assert_eq!(line.events.len(), 1);
        assert_eq!(spellings(&line.events[0]), vec!["c5", "c4"]);
        assert_eq!(line.ending_octave, 4);
    }

    #[test]
    fn test_octave_digits_overwrite_until_a_letter() {
        let line = melody("o45c4");
        assert_eq!(spellings(&line.events[0]), vec!["c5"]);

        // The armed mode survives cosmetic characters
        let line = melody("o 5 c4");
        assert_eq!(spellings(&line.events[0]), vec!["c5"]);
    }

    #[test]
    fn test_tempo_digits_accumulate() {
        assert_eq!(melody("t90c4").tempo, 90);
        assert_eq!(melody("t145c4").tempo, 145);
        // Digits keep accumulating across cosmetic characters
        assert_eq!(melody("c4 t 9 0").tempo, 90);
    }

    #[test]
    fn test_last_tempo_run_wins() {
        assert_eq!(melody("t60c4t90d4").tempo, 90);
        // A trailing `t` clears the buffer, falling back to the default
        assert_eq!(melody("t90c4t").tempo, DEFAULT_TEMPO);
    }

    #[test]
    fn test_directive_only_statement_has_no_events() {
        let line = melody("t140o5");
        assert_eq!(line.tempo, 140);
        assert!(line.events.is_empty());
        assert_eq!(line.ending_octave, 5);
    }

    #[test]
    fn test_zero_tempo_is_rejected() {
        assert!(matches!(
            Line::parse_melody("t0c4", 4),
            Err(Error::InvalidTempo(digits)) if digits == "0"
        ));
    }

    #[test]
    fn test_rest_never_joins_a_chord() {
        let line = melody("cr");
        assert_eq!(line.events.len(), 2);
        assert!(matches!(line.events[1], RawEvent::Rest { .. }));
    }

    #[test]
    fn test_letter_never_extends_a_rest() {
        let line = melody("rc");
        assert_eq!(line.events.len(), 2);
        assert!(matches!(line.events[0], RawEvent::Rest { .. }));
        assert_eq!(spellings(&line.events[1]), vec!["c4"]);
    }

    #[test]
    fn test_rest_takes_durations() {
        let line = melody("r4.^8");
        assert_eq!(line.events.len(), 1);
        assert_eq!(duration(&line.events[0]), "4.^8");
    }

    #[test]
    fn test_accidentals_alter_the_last_pitch() {
        let line = melody("c+eg-");
        assert_eq!(spellings(&line.events[0]), vec!["c+4", "e4", "g-4"]);

        // '#' is an alternate sharp
        let line = melody("f#");
        assert_eq!(spellings(&line.events[0]), vec!["f+4"]);
    }

    #[test]
    fn test_accidental_after_digits_still_applies() {
        let line = melody("c4+");
        assert_eq!(spellings(&line.events[0]), vec!["c+4"]);
    }

    #[test]
    fn test_stacked_accidentals_are_rejected() {
        assert!(matches!(
            Line::parse_melody("c+-", 4),
            Err(Error::InvalidPitch(name)) if name == "c+-"
        ));
    }

    #[test]
    fn test_accidental_with_nothing_open() {
        assert!(matches!(
            Line::parse_melody("+c", 4),
            Err(Error::UnterminatedEvent('+'))
        ));
        assert!(matches!(
            Line::parse_melody("r+", 4),
            Err(Error::UnterminatedEvent('+'))
        ));
    }

    #[test]
    fn test_duration_token_with_nothing_open() {
        for bad in ["4c", ".c", "^c"] {
            let c = bad.chars().next().unwrap();
            assert!(
                matches!(Line::parse_melody(bad, 4), Err(Error::UnterminatedEvent(e)) if e == c),
                "'{}' should report a misplaced '{}'",
                bad,
                c
            );
        }
    }

    #[test]
    fn test_unknown_characters_are_cosmetic() {
        let plain = melody("c4e4g4");
        let decorated = melody("c4, e4, | g4!");
        assert_eq!(plain.events, decorated.events);
    }

    #[test]
    fn test_input_is_case_insensitive() {
        assert_eq!(melody("C4D4").events, melody("c4d4").events);
        assert_eq!(melody("T90O5C").tempo, 90);
    }

    #[test]
    fn test_lyric_letters_each_take_a_syllable() {
        let line = lyric("cdefgab", "あいうえおかき");
        assert_eq!(line.events.len(), 7);
        let expected = ["c4", "d4", "e4", "f4", "g4", "a4", "b4"];
        let syllables = ["あ", "い", "う", "え", "お", "か", "き"];
        for (i, event) in line.events.iter().enumerate() {
            assert_eq!(spellings(event), vec![expected[i]]);
            match event {
                RawEvent::Note { lyric, .. } => {
                    assert_eq!(lyric.as_deref(), Some(syllables[i]));
                }
                RawEvent::Rest { .. } => panic!("expected a note"),
            }
        }
    }

    #[test]
    fn test_lyric_dialect_never_chords() {
        let line = lyric("o5c<c", "あい");
        assert_eq!(line.events.len(), 2);
        assert_eq!(spellings(&line.events[0]), vec!["c5"]);
        assert_eq!(spellings(&line.events[1]), vec!["c4"]);
        assert_eq!(line.ending_octave, 4);
    }

    #[test]
    fn test_lyric_rests_consume_nothing() {
        let line = lyric("c4r4d4", "あい");
        assert_eq!(line.events.len(), 3);
        match &line.events[2] {
            RawEvent::Note { lyric, .. } => assert_eq!(lyric.as_deref(), Some("い")),
            RawEvent::Rest { .. } => panic!("expected a note"),
        }
    }

    #[test]
    fn test_lyric_shortfall_is_an_error() {
        assert!(matches!(
            Line::parse_lyric("cd", "あ", 4),
            Err(Error::MissingLyric)
        ));
    }

    #[test]
    fn test_extra_syllables_are_ignored() {
        let line = lyric("c4", "あいう");
        assert_eq!(line.events.len(), 1);
    }

    #[test]
    fn test_lyric_whitespace_is_skipped() {
        let line = lyric("cd", "あ い");
        match &line.events[1] {
            RawEvent::Note { lyric, .. } => assert_eq!(lyric.as_deref(), Some("い")),
            RawEvent::Rest { .. } => panic!("expected a note"),
        }
    }
}
