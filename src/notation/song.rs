//! Score assembly across statements

use super::{Dialect, Line, RawEvent};
use crate::duration::DEFAULT_TEMPO;
use crate::error::{Error, Result};

/// A fully tokenized score: one track per statement
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    /// Song tempo, fixed by the first statement
    pub tempo: u32,
    pub tracks: Vec<Vec<RawEvent>>,
}

impl Song {
    /// Tokenize a whole score
    ///
    /// Statements are `;`-separated; newlines are cosmetic and removed up
    /// front. The octave at the end of one statement carries into the next.
    /// Tempo directives on later statements are validated but do not change
    /// the song tempo. The first failing statement aborts the parse.
    pub fn parse(text: &str, dialect: Dialect) -> Result<Song> {
        let text: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();

        let mut tempo = None;
        let mut octave = 4;
        let mut tracks = Vec::new();

        for (index, statement) in text.split(';').filter(|s| !s.is_empty()).enumerate() {
            let line =
                parse_statement(statement, dialect, octave).map_err(|source| Error::Line {
                    index,
                    text: statement.to_string(),
                    source: Box::new(source),
                })?;

            if tempo.is_none() {
                tempo = Some(line.tempo);
            }
            octave = line.ending_octave;
            tracks.push(line.events);
        }

        Ok(Song {
            tempo: tempo.unwrap_or(DEFAULT_TEMPO),
            tracks,
        })
    }
}

fn parse_statement(statement: &str, dialect: Dialect, octave: i32) -> Result<Line> {
    match dialect {
        Dialect::Melody => Line::parse_melody(statement, octave),
        Dialect::Lyric => {
            // Everything before the first ':' is the lyric text; a statement
            // without one is all notation
            let (lyrics, notation) = match statement.split_once(':') {
                Some((lyrics, notation)) => (lyrics, notation),
                None => ("", statement),
            };
            Line::parse_lyric(notation, lyrics, octave)
        }
    }
}
