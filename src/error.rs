use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid pitch: '{0}'")]
    InvalidPitch(String),

    #[error("Misplaced '{0}': no open note or rest")]
    UnterminatedEvent(char),

    #[error("Malformed duration segment: '{0}'")]
    MalformedDuration(String),

    #[error("Invalid tempo: '{0}'")]
    InvalidTempo(String),

    #[error("Notation has more notes than lyric syllables")]
    MissingLyric,

    #[error("Parse error in statement {index} ('{text}'): {source}")]
    Line {
        index: usize,
        text: String,
        source: Box<Error>,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
