//! Resolved score output

pub mod frame;
pub mod midi;

pub use frame::{FrameCompiler, FrameNote, FrameScore, Phrase, FRAME_RATE};
pub use midi::{MidiCompiler, MidiNote, MidiScore, Ticks, Wait};
