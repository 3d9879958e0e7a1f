//! Score object model
//!
//! Read-only wrapper types for the musical score graph handed to the
//! LilyPond renderer: pitches, durations, measure elements, measures,
//! parts and scores. Optional presentation flags (`invisible`, `markup`,
//! `analysis_voice`, `instruction`) are plain fields filled in at ingestion.

pub mod duration;
pub mod elements;
pub mod pitch;
pub mod score;
pub mod serde_helpers;

// Re-export commonly used types
pub use duration::{Duration, NoteType, Tuplet};
pub use elements::*;
pub use pitch::{Pitch, PitchParseError, Step};
pub use score::*;
