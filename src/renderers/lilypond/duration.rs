//! Duration codec
//!
//! Turns a single (possibly dotted) [`Duration`] into a LilyPond duration
//! token such as `4`, `2..` or `\breve`. Compound durations have to be split
//! into their components by the caller.

use num_rational::Rational64;
use once_cell::sync::Lazy;

use crate::models::Duration;
use crate::renderers::lilypond::errors::{TranscodeError, TranscodeResult};

/// Quarter lengths with a token of their own
static EXACT_DURATIONS: Lazy<Vec<(Rational64, &'static str)>> = Lazy::new(|| {
    vec![
        (Rational64::from_integer(16), "\\longa"),
        (Rational64::from_integer(8), "\\breve"),
        (Rational64::from_integer(4), "1"),
        (Rational64::from_integer(2), "2"),
        (Rational64::from_integer(1), "4"),
        (Rational64::new(1, 2), "8"),
        (Rational64::new(1, 4), "16"),
        (Rational64::new(1, 8), "32"),
        (Rational64::new(1, 16), "64"),
        (Rational64::new(1, 32), "128"),
        // Long-standing entry kept for compatibility with existing output
        (Rational64::new(5, 16), "128"),
    ]
});

/// Undotted values, longest first, used to name dotted durations
static BASE_DURATIONS: Lazy<Vec<(Rational64, &'static str)>> = Lazy::new(|| {
    vec![
        (Rational64::from_integer(16), "\\longa"),
        (Rational64::from_integer(8), "\\breve"),
        (Rational64::from_integer(4), "1"),
        (Rational64::from_integer(2), "2"),
        (Rational64::from_integer(1), "4"),
        (Rational64::new(1, 2), "8"),
        (Rational64::new(1, 4), "16"),
        (Rational64::new(1, 8), "32"),
        (Rational64::new(1, 16), "64"),
        (Rational64::new(1, 32), "128"),
    ]
});

/// Convert a duration to its LilyPond token.
///
/// With `known_tuplet`, a tuplet member is written as its nominal (undotted)
/// note type; the enclosing `\times` supplies the scaling. Tuplet members
/// outside a known tuplet are rejected.
pub fn duration_to_lily(duration: &Duration, known_tuplet: bool) -> TranscodeResult<String> {
    let zero = Rational64::from_integer(0);
    if duration.quarter_length == zero {
        return Err(TranscodeError::InvalidDuration(
            "cannot write a zero-length duration".to_string(),
        ));
    }

    if duration.is_compound() {
        return Err(TranscodeError::UnsupportedDuration(format!(
            "duration of {} quarters has {} components; write them separately",
            duration.quarter_length,
            duration.components.len()
        )));
    }

    let (quarter_length, dots) = if duration.is_tuplet() {
        if !known_tuplet {
            return Err(TranscodeError::UnsupportedDuration(format!(
                "tuplet duration of {} quarters outside a known tuplet",
                duration.quarter_length
            )));
        }
        let note_type = duration.note_type.ok_or_else(|| {
            TranscodeError::UnsupportedDuration(format!(
                "tuplet duration of {} quarters has no written type",
                duration.quarter_length
            ))
        })?;
        (note_type.quarter_length(), 0)
    } else {
        (duration.quarter_length, duration.dots)
    };

    if let Some((_, token)) = EXACT_DURATIONS.iter().find(|(ql, _)| *ql == quarter_length) {
        return Ok((*token).to_string());
    }

    BASE_DURATIONS
        .iter()
        .find(|(base, _)| *base < quarter_length)
        .map(|(_, token)| format!("{}{}", token, ".".repeat(usize::from(dots))))
        .ok_or_else(|| {
            TranscodeError::InvalidDuration(format!(
                "{} quarters is shorter than any writable value",
                quarter_length
            ))
        })
}
