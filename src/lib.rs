//! LilyPond output for symbolic music scores
//!
//! Converts an in-memory score (parts, measures, notes, chords, clefs, keys,
//! meters, barlines, text and metadata) into LilyPond source text, and can
//! hand the result to a local LilyPond install.

pub mod models;
pub mod renderers;

// Re-export commonly used types
pub use models::{Measure, Metadata, Part, Score};
pub use renderers::lilypond::{
    process_score, ElementPolicy, SettingValue, Settings, TranscodeError, TranscodeResult,
};
