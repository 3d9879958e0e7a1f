//! Renderers module
//!
//! Output formats for the score model. LilyPond is the only one.

pub mod lilypond;

pub use lilypond::{process_score, Settings, TranscodeError, TranscodeResult};
