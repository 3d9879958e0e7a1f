//! Pitch codec: pitches to LilyPond note names with absolute octave marks

use crate::models::Pitch;
use crate::renderers::lilypond::errors::{TranscodeError, TranscodeResult};

/// Octave marks indexed by octave number; middle C's octave (4) gets one `'`
const OCTAVE_MARKS: [&str; 13] = [
    ",,,",
    ",,",
    ",",
    "",
    "'",
    "''",
    "'''",
    "''''",
    "'''''",
    "''''''",
    "'''''''",
    "''''''''",
    "'''''''''",
];

/// LilyPond octave mark for an octave number
pub fn octave_num_to_lily(octave: i32) -> TranscodeResult<&'static str> {
    usize::try_from(octave)
        .ok()
        .and_then(|index| OCTAVE_MARKS.get(index))
        .copied()
        .ok_or(TranscodeError::OctaveOutOfRange(octave))
}

/// LilyPond note name for a pitch, e.g. `fis'` or `beses,,`.
///
/// Pitches without an explicit octave use their implicit octave.
pub fn pitch_to_lily(pitch: &Pitch, include_octave: bool) -> TranscodeResult<String> {
    let accidental = if pitch.alter > 0 { "is" } else { "es" };
    let mut lily = String::with_capacity(12);
    lily.push(pitch.step.letter());
    for _ in 0..pitch.alter.unsigned_abs() {
        lily.push_str(accidental);
    }

    if include_octave {
        lily.push_str(octave_num_to_lily(i32::from(pitch.effective_octave()))?);
    }

    Ok(lily)
}
