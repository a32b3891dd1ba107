pub mod duration;
pub mod error;
pub mod notation;
pub mod pitch;
pub mod score;

pub use error::{Error, Result};
pub use notation::{Dialect, Line, RawEvent, Song};
pub use score::{FrameCompiler, FrameScore, MidiCompiler, MidiScore};
