//! Durations measured in quarter lengths
//!
//! A [`Duration`] carries its exact quarter length as a rational number, the
//! dot count and written note type of its notehead, optional tuplet ratios,
//! and, when it can't be written as a single (possibly dotted) value, the
//! list of components that must be tied together to express it.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use crate::models::serde_helpers;

/// Largest number of dots considered when recognising a dotted value
pub const MAX_DOTS: u8 = 4;

/// Written note value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteType {
    Longa,
    Breve,
    Whole,
    Half,
    Quarter,
    Eighth,
    #[serde(rename = "16th")]
    Sixteenth,
    #[serde(rename = "32nd")]
    ThirtySecond,
    #[serde(rename = "64th")]
    SixtyFourth,
    #[serde(rename = "128th")]
    HundredTwentyEighth,
}

impl NoteType {
    /// All note types, longest first
    pub const ALL: [NoteType; 10] = [
        NoteType::Longa,
        NoteType::Breve,
        NoteType::Whole,
        NoteType::Half,
        NoteType::Quarter,
        NoteType::Eighth,
        NoteType::Sixteenth,
        NoteType::ThirtySecond,
        NoteType::SixtyFourth,
        NoteType::HundredTwentyEighth,
    ];

    /// Undotted length of this note type in quarter notes
    pub fn quarter_length(self) -> Rational64 {
        match self {
            NoteType::Longa => Rational64::from_integer(16),
            NoteType::Breve => Rational64::from_integer(8),
            NoteType::Whole => Rational64::from_integer(4),
            NoteType::Half => Rational64::from_integer(2),
            NoteType::Quarter => Rational64::from_integer(1),
            NoteType::Eighth => Rational64::new(1, 2),
            NoteType::Sixteenth => Rational64::new(1, 4),
            NoteType::ThirtySecond => Rational64::new(1, 8),
            NoteType::SixtyFourth => Rational64::new(1, 16),
            NoteType::HundredTwentyEighth => Rational64::new(1, 32),
        }
    }
}

/// Length of `base` with `dots` augmentation dots: base * (2 - 2^-dots)
pub fn dotted_length(base: Rational64, dots: u8) -> Rational64 {
    let two = Rational64::from_integer(2);
    let shrink = Rational64::new(1, 1i64 << dots);
    base * (two - shrink)
}

/// Tuplet ratio: `actual` notes in the time of `normal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuplet {
    pub actual: u32,
    pub normal: u32,
}

impl Tuplet {
    pub fn new(actual: u32, normal: u32) -> Self {
        Self { actual, normal }
    }
}

/// A note length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDuration")]
pub struct Duration {
    #[serde(with = "serde_helpers::quarter_length")]
    pub quarter_length: Rational64,

    pub dots: u8,

    /// Written note type, when the length is a single notehead
    pub note_type: Option<NoteType>,

    /// Tied pieces of a duration that can't be written as one value.
    /// Empty (or a single entry) for simple durations.
    pub components: Vec<Duration>,

    pub tuplets: Vec<Tuplet>,
}

/// Serialized duration; a bare quarter length is expanded with [`Duration::new`]
#[derive(Deserialize)]
struct RawDuration {
    #[serde(with = "serde_helpers::quarter_length")]
    quarter_length: Rational64,
    #[serde(default)]
    dots: Option<u8>,
    #[serde(default)]
    note_type: Option<NoteType>,
    #[serde(default)]
    components: Vec<Duration>,
    #[serde(default)]
    tuplets: Vec<Tuplet>,
}

impl From<RawDuration> for Duration {
    fn from(raw: RawDuration) -> Self {
        let bare = raw.dots.is_none()
            && raw.note_type.is_none()
            && raw.components.is_empty()
            && raw.tuplets.is_empty();
        if bare {
            return Duration::new(raw.quarter_length);
        }
        Duration {
            quarter_length: raw.quarter_length,
            dots: raw.dots.unwrap_or(0),
            note_type: raw.note_type,
            components: raw.components,
            tuplets: raw.tuplets,
        }
    }
}

impl Duration {
    /// Build a duration from a quarter length, working out dots and tied
    /// components.
    pub fn new(quarter_length: Rational64) -> Self {
        if quarter_length == Rational64::from_integer(0) {
            return Self::atomic(quarter_length, None, 0);
        }

        if let Some((note_type, dots)) = match_dotted(quarter_length) {
            return Self::atomic(quarter_length, Some(note_type), dots);
        }

        let components = decompose(quarter_length);
        if components.len() == 1 {
            // Shorter than anything writable; keep it as an untyped value
            return Self::atomic(quarter_length, None, 0);
        }

        Self {
            quarter_length,
            dots: 0,
            note_type: None,
            components,
            tuplets: Vec::new(),
        }
    }

    /// Build a duration from a floating-point quarter length.
    ///
    /// Binary fractions (0.25, 0.375, 7.99609375 ...) convert exactly;
    /// use [`Duration::tuplet`] or [`Duration::new`] with a rational for
    /// thirds and other non-binary lengths.
    pub fn from_quarters(quarter_length: f64) -> Self {
        let ql = Rational64::approximate_float(quarter_length)
            .unwrap_or_else(|| Rational64::from_integer(0));
        Self::new(ql)
    }

    /// Undotted or dotted single value of the given type
    pub fn of_type(note_type: NoteType, dots: u8) -> Self {
        Self::atomic(dotted_length(note_type.quarter_length(), dots), Some(note_type), dots)
    }

    /// Member of an `actual:normal` tuplet written as `note_type`.
    ///
    /// A zero `actual` leaves the written length unscaled; the measure
    /// writer rejects such a ratio.
    pub fn tuplet(note_type: NoteType, dots: u8, actual: u32, normal: u32) -> Self {
        let written = dotted_length(note_type.quarter_length(), dots);
        let quarter_length = if actual == 0 {
            written
        } else {
            written * Rational64::new(i64::from(normal), i64::from(actual))
        };
        Self {
            quarter_length,
            dots,
            note_type: Some(note_type),
            components: Vec::new(),
            tuplets: vec![Tuplet::new(actual, normal)],
        }
    }

    fn atomic(quarter_length: Rational64, note_type: Option<NoteType>, dots: u8) -> Self {
        Self {
            quarter_length,
            dots,
            note_type,
            components: Vec::new(),
            tuplets: Vec::new(),
        }
    }

    /// True when the duration must be written as several tied values
    pub fn is_compound(&self) -> bool {
        self.components.len() > 1
    }

    pub fn is_tuplet(&self) -> bool {
        !self.tuplets.is_empty()
    }
}

/// Find a note type and dot count whose length is exactly `ql`
fn match_dotted(ql: Rational64) -> Option<(NoteType, u8)> {
    NoteType::ALL.iter().find_map(|&note_type| {
        (0..=MAX_DOTS)
            .find(|&dots| dotted_length(note_type.quarter_length(), dots) == ql)
            .map(|dots| (note_type, dots))
    })
}

/// Greedy decomposition into writable values, longest first.
///
/// A remainder that is itself a (dotted) value ends the list; otherwise the
/// longest base value that fits is taken.
fn decompose(ql: Rational64) -> Vec<Duration> {
    let zero = Rational64::from_integer(0);
    let mut components = Vec::new();
    let mut remainder = ql;

    while remainder > zero {
        if let Some((note_type, dots)) = match_dotted(remainder) {
            components.push(Duration::of_type(note_type, dots));
            return components;
        }

        match NoteType::ALL
            .iter()
            .find(|note_type| note_type.quarter_length() <= remainder)
        {
            Some(&note_type) => {
                components.push(Duration::of_type(note_type, 0));
                remainder -= note_type.quarter_length();
            }
            None => {
                components.push(Duration::atomic(remainder, None, 0));
                return components;
            }
        }
    }

    components
}
