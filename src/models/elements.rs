//! Element types that can appear inside a measure
//!
//! Events (notes, rests, chords) plus the attribute and annotation objects
//! interleaved with them: clefs, key and time signatures, barlines, text
//! expressions and layout hints.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use crate::models::duration::Duration;
use crate::models::pitch::{Pitch, Step};

/// Tie attached to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieType {
    Start,
    Stop,
    Continue,
}

/// What sounds (or doesn't) for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Note(Pitch),
    Rest,
    Chord(Vec<Pitch>),
}

/// A note, rest or chord with its duration and optional decorations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub duration: Duration,

    #[serde(default)]
    pub tie: Option<TieType>,

    /// Literal LilyPond text appended after the event (usually a `\markup`)
    #[serde(default)]
    pub markup: Option<String>,

    /// Print as a spacer instead of a visible note or rest
    #[serde(default)]
    pub invisible: bool,
}

impl Event {
    pub fn note(pitch: Pitch, duration: Duration) -> Self {
        Self::with_kind(EventKind::Note(pitch), duration)
    }

    pub fn rest(duration: Duration) -> Self {
        Self::with_kind(EventKind::Rest, duration)
    }

    pub fn chord(pitches: Vec<Pitch>, duration: Duration) -> Self {
        Self::with_kind(EventKind::Chord(pitches), duration)
    }

    fn with_kind(kind: EventKind, duration: Duration) -> Self {
        Self {
            kind,
            duration,
            tie: None,
            markup: None,
            invisible: false,
        }
    }

    pub fn tied(mut self, tie: TieType) -> Self {
        self.tie = Some(tie);
        self
    }

    pub fn with_markup<S: Into<String>>(mut self, markup: S) -> Self {
        self.markup = Some(markup.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.invisible = true;
        self
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.kind, EventKind::Rest)
    }

    /// Notes and rests (not chords) can anchor a following text expression
    pub fn is_note_or_rest(&self) -> bool {
        matches!(self.kind, EventKind::Note(_) | EventKind::Rest)
    }

    pub fn quarter_length(&self) -> Rational64 {
        self.duration.quarter_length
    }
}

/// Clef kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clef {
    Treble,
    Bass,
    Tenor,
    Alto,
    Treble8vb,
    Treble8va,
    Bass8vb,
    Bass8va,
    FBaritone,
    CBaritone,
    FrenchViolin,
    MezzoSoprano,
    Percussion,
    Soprano,
    SubBass,
    /// Any other clef object (e.g. an explicit "no clef"), by description
    Other(String),
}

/// Key mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
    Ionian,
}

impl Mode {
    /// LilyPond mode keyword (without the backslash)
    pub fn keyword(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Aeolian => "aeolian",
            Mode::Locrian => "locrian",
            Mode::Ionian => "ionian",
        }
    }

    /// Distance of the mode's final from the major tonic, in fifths
    fn fifths_from_major(self) -> i32 {
        match self {
            Mode::Major | Mode::Ionian => 0,
            Mode::Lydian => -1,
            Mode::Mixolydian => 1,
            Mode::Dorian => 2,
            Mode::Minor | Mode::Aeolian => 3,
            Mode::Phrygian => 4,
            Mode::Locrian => 5,
        }
    }
}

/// Key signature as a count of sharps (positive) or flats (negative)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySignature {
    pub sharps: i8,

    #[serde(default)]
    pub mode: Option<Mode>,
}

impl KeySignature {
    pub fn new(sharps: i8, mode: Option<Mode>) -> Self {
        Self { sharps, mode }
    }

    /// Tonic pitch and mode. A key without a mode is taken as major.
    pub fn pitch_and_mode(&self) -> (Pitch, Mode) {
        let mode = self.mode.unwrap_or(Mode::Major);
        let fifths = i32::from(self.sharps) + mode.fifths_from_major();
        (pitch_from_fifths(fifths), mode)
    }
}

/// Pitch at `fifths` perfect fifths above C (negative goes down)
fn pitch_from_fifths(fifths: i32) -> Pitch {
    const LINE_OF_FIFTHS: [Step; 7] = [Step::F, Step::C, Step::G, Step::D, Step::A, Step::E, Step::B];
    let shifted = fifths + 1;
    let step = LINE_OF_FIFTHS[shifted.rem_euclid(7) as usize];
    let alter = shifted.div_euclid(7) as i8;
    Pitch::new(step, alter, None)
}

/// Time signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignature {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Length of a full bar in quarter notes
    pub fn bar_duration(&self) -> Rational64 {
        Rational64::new(i64::from(self.numerator) * 4, i64::from(self.denominator.max(1)))
    }
}

/// Barline with a named style (`regular`, `final`, `double` ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barline {
    pub style: String,
}

impl Barline {
    pub fn new<S: Into<String>>(style: S) -> Self {
        Self { style: style.into() }
    }

    pub fn is_regular(&self) -> bool {
        self.style == "regular"
    }
}

/// Vertical placement of a text expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Above,
    Below,
    #[default]
    Auto,
}

impl Placement {
    /// Placement from a signed vertical position (positive is above the staff)
    pub fn from_vertical(position: i32) -> Self {
        match position {
            p if p > 0 => Placement::Above,
            p if p < 0 => Placement::Below,
            _ => Placement::Auto,
        }
    }
}

/// Written expression text such as "con fuoco"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextExpression {
    pub content: String,

    #[serde(default)]
    pub placement: Placement,
}

impl TextExpression {
    pub fn new<S: Into<String>>(content: S, placement: Placement) -> Self {
        Self {
            content: content.into(),
            placement,
        }
    }
}

/// Page, system and staff layout objects; they carry no notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutHint {
    System,
    Page,
    Staff,
}

/// Anything that can appear inside a measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureElement {
    Event(Event),
    Clef(Clef),
    TimeSignature(TimeSignature),
    KeySignature(KeySignature),
    Barline(Barline),
    Text(TextExpression),
    Layout(LayoutHint),
    /// Importer bookkeeping with no notation meaning (e.g. **kern tandems)
    Housekeeping(String),
    /// An object the model doesn't know how to classify, by description
    Unknown(String),
}

impl MeasureElement {
    /// Short description used in log messages and errors
    pub fn describe(&self) -> String {
        match self {
            MeasureElement::Event(event) => match &event.kind {
                EventKind::Note(pitch) => format!("note {}", pitch),
                EventKind::Rest => "rest".to_string(),
                EventKind::Chord(pitches) => format!("chord of {} pitches", pitches.len()),
            },
            MeasureElement::Clef(clef) => format!("clef {:?}", clef),
            MeasureElement::TimeSignature(ts) => {
                format!("time signature {}/{}", ts.numerator, ts.denominator)
            }
            MeasureElement::KeySignature(ks) => format!("key signature {:+}", ks.sharps),
            MeasureElement::Barline(bar) => format!("barline {}", bar.style),
            MeasureElement::Text(text) => format!("text expression {:?}", text.content),
            MeasureElement::Layout(hint) => format!("{:?} layout", hint),
            MeasureElement::Housekeeping(what) => what.clone(),
            MeasureElement::Unknown(what) => what.clone(),
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            MeasureElement::Event(event) => Some(event),
            _ => None,
        }
    }
}

impl From<Event> for MeasureElement {
    fn from(event: Event) -> Self {
        MeasureElement::Event(event)
    }
}

impl From<Clef> for MeasureElement {
    fn from(clef: Clef) -> Self {
        MeasureElement::Clef(clef)
    }
}

impl From<TimeSignature> for MeasureElement {
    fn from(ts: TimeSignature) -> Self {
        MeasureElement::TimeSignature(ts)
    }
}

impl From<KeySignature> for MeasureElement {
    fn from(ks: KeySignature) -> Self {
        MeasureElement::KeySignature(ks)
    }
}

impl From<Barline> for MeasureElement {
    fn from(bar: Barline) -> Self {
        MeasureElement::Barline(bar)
    }
}

impl From<TextExpression> for MeasureElement {
    fn from(text: TextExpression) -> Self {
        MeasureElement::Text(text)
    }
}
