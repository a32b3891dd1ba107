//! Pitch names and MIDI-style pitch arithmetic

use crate::error::{Error, Result};
use std::fmt;

/// The seven pitch letters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Map a lower-cased notation character to a letter
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(Letter::C),
            'd' => Some(Letter::D),
            'e' => Some(Letter::E),
            'f' => Some(Letter::F),
            'g' => Some(Letter::G),
            'a' => Some(Letter::A),
            'b' => Some(Letter::B),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Letter::C => 'c',
            Letter::D => 'd',
            Letter::E => 'e',
            Letter::F => 'f',
            Letter::G => 'g',
            Letter::A => 'a',
            Letter::B => 'b',
        }
    }
}

/// Accidental suffix on a pitch letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

/// A pitch letter with its accidental, spelled the way the notation writes
/// it: `c`, `f+`, `e-`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchName {
    pub letter: Letter,
    pub accidental: Accidental,
}

impl PitchName {
    pub fn new(letter: Letter) -> Self {
        Self {
            letter,
            accidental: Accidental::Natural,
        }
    }

    /// Semitone offset within the octave (c = 0 .. b = 11)
    ///
    /// Sharps and flats resolve through the enharmonic alias pairs. The four
    /// spellings without an alias (`e+`, `b+`, `c-`, `f-`) have no table
    /// entry and return `None`.
    pub fn semitone(&self) -> Option<i32> {
        use Accidental::*;
        use Letter::*;

        let offset = match (self.letter, self.accidental) {
            (C, Natural) => 0,
            (C, Sharp) | (D, Flat) => 1,
            (D, Natural) => 2,
            (D, Sharp) | (E, Flat) => 3,
            (E, Natural) => 4,
            (F, Natural) => 5,
            (F, Sharp) | (G, Flat) => 6,
            (G, Natural) => 7,
            (G, Sharp) | (A, Flat) => 8,
            (A, Natural) => 9,
            (A, Sharp) | (B, Flat) => 10,
            (B, Natural) => 11,
            (E, Sharp) | (B, Sharp) | (C, Flat) | (F, Flat) => return None,
        };
        Some(offset)
    }
}

impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        match self.accidental {
            Accidental::Natural => Ok(()),
            Accidental::Sharp => write!(f, "+"),
            Accidental::Flat => write!(f, "-"),
        }
    }
}

/// A concrete sounding pitch: name plus octave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub name: PitchName,
    pub octave: i32,
}

impl Pitch {
    pub fn new(letter: Letter, octave: i32) -> Self {
        Self {
            name: PitchName::new(letter),
            octave,
        }
    }

    /// MIDI-style note number (c4 = 60, a4 = 69)
    pub fn midi_number(&self) -> Result<i32> {
        let offset = self
            .name
            .semitone()
            .ok_or_else(|| Error::InvalidPitch(self.name.to_string()))?;
        Ok(offset + (self.octave + 1) * 12)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}
