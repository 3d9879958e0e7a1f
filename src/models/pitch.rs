//! Pitch representation
//!
//! A pitch is a letter name, a signed accidental count and an optional
//! octave. Pitches without an octave fall back to their implicit octave,
//! which defaults to the middle-C octave.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default octave used when a pitch carries no explicit octave
pub const DEFAULT_IMPLICIT_OCTAVE: i8 = 4;

/// Diatonic letter name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    /// Lower-case letter used by LilyPond's default (Dutch) note names
    pub fn letter(self) -> char {
        match self {
            Step::C => 'c',
            Step::D => 'd',
            Step::E => 'e',
            Step::F => 'f',
            Step::G => 'g',
            Step::A => 'a',
            Step::B => 'b',
        }
    }

    /// Parse a letter name (case insensitive)
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Step::C),
            'D' => Some(Step::D),
            'E' => Some(Step::E),
            'F' => Some(Step::F),
            'G' => Some(Step::G),
            'A' => Some(Step::A),
            'B' => Some(Step::B),
            _ => None,
        }
    }
}

/// A single pitch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    pub step: Step,

    /// Positive for sharps, negative for flats (e.g. -2 is a double flat)
    #[serde(default)]
    pub alter: i8,

    /// Explicit octave; middle C is in octave 4
    #[serde(default)]
    pub octave: Option<i8>,

    /// Octave to use when `octave` is absent
    #[serde(default = "default_implicit_octave")]
    pub implicit_octave: i8,
}

fn default_implicit_octave() -> i8 {
    DEFAULT_IMPLICIT_OCTAVE
}

impl Pitch {
    pub fn new(step: Step, alter: i8, octave: Option<i8>) -> Self {
        Self {
            step,
            alter,
            octave,
            implicit_octave: DEFAULT_IMPLICIT_OCTAVE,
        }
    }

    /// Octave to print: the explicit one, otherwise the implicit one
    pub fn effective_octave(&self) -> i8 {
        self.octave.unwrap_or(self.implicit_octave)
    }
}

/// Error returned when a pitch name can't be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid pitch name: {0:?}")]
pub struct PitchParseError(pub String);

impl FromStr for Pitch {
    type Err = PitchParseError;

    /// Parse names such as `C4`, `F##3`, `B-6`, `e-` or `f--2`.
    ///
    /// `#` raises and `-` lowers by one semitone; the octave is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PitchParseError(s.to_string());
        let mut chars = s.trim().chars().peekable();

        let step = chars.next().and_then(Step::from_letter).ok_or_else(err)?;

        let mut alter: i8 = 0;
        while let Some(&c) = chars.peek() {
            match c {
                '#' => alter += 1,
                '-' => alter -= 1,
                _ => break,
            }
            chars.next();
        }

        let rest: String = chars.collect();
        let octave = if rest.is_empty() {
            None
        } else {
            Some(rest.parse::<i8>().map_err(|_| err())?)
        };

        Ok(Pitch::new(step, alter, octave))
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.step.letter().to_ascii_uppercase())?;
        let mark = if self.alter > 0 { "#" } else { "-" };
        for _ in 0..self.alter.unsigned_abs() {
            f.write_str(mark)?;
        }
        if let Some(octave) = self.octave {
            write!(f, "{}", octave)?;
        }
        Ok(())
    }
}
