//! Score to LilyPond transcoder
//!
//! Walks a [`Score`](crate::models::Score) depth-first and writes LilyPond
//! source text for it.
//!
//! # Overview
//!
//! Output is assembled bottom-up:
//! 1. **Codecs**: durations, pitches, clefs, barlines, key and time signatures
//! 2. **Events**: notes, rests and chords, including tied compound durations
//! 3. **Measures**: one bar-checked line per measure, with tuplets and pick-ups
//! 4. **Parts**: one LilyPond variable per part, named by the [`ScoreContext`]
//! 5. **Score**: preamble, parts, `\header` and the `\score` block
//!
//! # Basic Usage
//!
//! ```ignore
//! use score_lily::models::Score;
//! use score_lily::renderers::lilypond::{process_score, Settings};
//!
//! let score = Score::from_json_str(&std::fs::read_to_string("piece.json")?)?;
//! let source = process_score(&score, Some(&Settings::default()))?;
//! ```

pub mod attributes;
pub mod context;
pub mod duration;
pub mod errors;
pub mod measure;
pub mod notes;
pub mod part;
pub mod pitch;
pub mod runner;
pub mod score;
pub mod settings;
pub mod templates;

// Re-export main API
pub use context::ScoreContext;
pub use errors::{RenderError, SettingsError, TranscodeError, TranscodeResult};
pub use settings::{ElementPolicy, SettingValue, Settings};

use crate::models::Score;

/// Convert a whole score to LilyPond source.
///
/// Uses default settings when none are given.
pub fn process_score(score: &Score, settings: Option<&Settings>) -> TranscodeResult<String> {
    match settings {
        Some(settings) => score::score_to_lily(score, settings),
        None => score::score_to_lily(score, &Settings::default()),
    }
}
