//! Raw notation events and the in-progress event builder

use crate::error::{Error, Result};
use crate::pitch::{Accidental, Pitch};

/// One tokenized event, duration still unresolved
///
/// The duration descriptor stays raw text until resolution; an empty
/// descriptor means the default length.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    Note {
        /// Simultaneous pitches in notation order, never empty
        pitches: Vec<Pitch>,
        duration: String,
        /// The consumed syllable (lyric dialect only)
        lyric: Option<String>,
    },
    Rest {
        duration: String,
    },
}

/// The event currently being built by the scanner
///
/// `Idle` makes "nothing open" an explicit state, so a duration or accidental
/// character arriving with no event to attach to is reported instead of
/// dereferencing nothing.
#[derive(Debug)]
pub(crate) enum EventBuilder {
    Idle,
    Note {
        pitches: Vec<Pitch>,
        duration: String,
        lyric: Option<String>,
    },
    Rest {
        duration: String,
    },
}

impl EventBuilder {
    pub(crate) fn open_note(pitch: Pitch, lyric: Option<String>) -> Self {
        EventBuilder::Note {
            pitches: vec![pitch],
            duration: String::new(),
            lyric,
        }
    }

    pub(crate) fn open_rest() -> Self {
        EventBuilder::Rest {
            duration: String::new(),
        }
    }

    /// Close the open event, if any, and append it to `events`
    pub(crate) fn close(&mut self, events: &mut Vec<RawEvent>) {
        match std::mem::replace(self, EventBuilder::Idle) {
            EventBuilder::Idle => {}
            EventBuilder::Note {
                pitches,
                duration,
                lyric,
            } => events.push(RawEvent::Note {
                pitches,
                duration,
                lyric,
            }),
            EventBuilder::Rest { duration } => events.push(RawEvent::Rest { duration }),
        }
    }

    /// Append a duration character (digit, dot or tie) to the open event
    pub(crate) fn push_duration(&mut self, c: char) -> Result<()> {
        match self {
            EventBuilder::Idle => Err(Error::UnterminatedEvent(c)),
            EventBuilder::Note { duration, .. } | EventBuilder::Rest { duration } => {
                duration.push(c);
                Ok(())
            }
        }
    }

    /// Attach an accidental to the most recently added pitch of the open note
    ///
    /// Rests take no accidentals, and a pitch can only be altered once; the
    /// second alteration reports the stacked spelling (`c+-`).
    pub(crate) fn apply_accidental(&mut self, accidental: Accidental, c: char) -> Result<()> {
        let EventBuilder::Note { pitches, .. } = self else {
            return Err(Error::UnterminatedEvent(c));
        };
        let pitch = pitches.last_mut().expect("an open note has at least one pitch");
        if pitch.name.accidental != Accidental::Natural {
            return Err(Error::InvalidPitch(format!("{}{}", pitch.name, c)));
        }
        pitch.name.accidental = accidental;
        Ok(())
    }
}
