//! Measures, parts and scores
//!
//! The container types of the score graph. A [`Score`] holds parts and
//! metadata in source order, a [`Part`] holds measures (and the odd stray
//! object), and a [`Measure`] holds its elements at their offsets.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use crate::models::elements::{Event, MeasureElement, TimeSignature};
use crate::models::serde_helpers;

/// A measure element at its offset from the start of the measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureItem {
    #[serde(with = "serde_helpers::quarter_length")]
    pub offset: Rational64,
    pub element: MeasureElement,
}

/// One bar of music
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMeasure")]
pub struct Measure {
    pub number: i32,

    /// Nominal length implied by the time signature, in quarter notes
    #[serde(with = "serde_helpers::quarter_length")]
    pub bar_duration: Rational64,

    pub items: Vec<MeasureItem>,

    /// Hide the staff and everything in it for this measure
    pub invisible: bool,
}

impl Measure {
    pub fn new(number: i32, bar_duration: Rational64) -> Self {
        Self {
            number,
            bar_duration,
            items: Vec::new(),
            invisible: false,
        }
    }

    /// Empty measure whose nominal length comes from a time signature
    pub fn in_time(number: i32, time: &TimeSignature) -> Self {
        Self::new(number, time.bar_duration())
    }

    /// Append an element after everything already in the measure.
    ///
    /// Events advance the running offset by their length; everything else
    /// sits at the offset where it was appended.
    pub fn push<E: Into<MeasureElement>>(&mut self, element: E) -> &mut Self {
        let offset = self.end_offset();
        self.push_at(offset, element)
    }

    /// Append an element at an explicit offset
    pub fn push_at<E: Into<MeasureElement>>(&mut self, offset: Rational64, element: E) -> &mut Self {
        self.items.push(MeasureItem {
            offset,
            element: element.into(),
        });
        self
    }

    /// Builder form of [`Measure::push`]
    pub fn with<E: Into<MeasureElement>>(mut self, element: E) -> Self {
        self.push(element);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.invisible = true;
        self
    }

    /// Offset just after the last sounding event
    fn end_offset(&self) -> Rational64 {
        self.items
            .iter()
            .filter_map(|item| {
                item.element
                    .as_event()
                    .map(|event| item.offset + event.quarter_length())
            })
            .max()
            .unwrap_or_else(|| Rational64::from_integer(0))
    }

    /// Actual length of the measure's contents
    pub fn duration(&self) -> Rational64 {
        self.end_offset()
    }

    /// The element with the greatest offset strictly before `offset`.
    /// Among elements sharing that offset, the last one in order wins.
    pub fn element_before_offset(&self, offset: Rational64) -> Option<&MeasureElement> {
        self.items
            .iter()
            .filter(|item| item.offset < offset)
            .fold(None, |best: Option<&MeasureItem>, item| match best {
                Some(b) if b.offset > item.offset => Some(b),
                _ => Some(item),
            })
            .map(|item| &item.element)
    }
}

/// Serialized measure form where offsets may be left out
#[derive(Deserialize)]
struct RawMeasure {
    #[serde(default)]
    number: i32,
    #[serde(with = "serde_helpers::quarter_length")]
    bar_duration: Rational64,
    #[serde(default)]
    items: Vec<RawMeasureItem>,
    #[serde(default)]
    invisible: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMeasureItem {
    Placed {
        #[serde(default, with = "serde_helpers::optional_quarter_length")]
        offset: Option<Rational64>,
        element: MeasureElement,
    },
    Bare(MeasureElement),
}

impl From<RawMeasure> for Measure {
    fn from(raw: RawMeasure) -> Self {
        let mut measure = Measure::new(raw.number, raw.bar_duration);
        measure.invisible = raw.invisible;
        for item in raw.items {
            match item {
                RawMeasureItem::Placed {
                    offset: Some(offset),
                    element,
                } => {
                    measure.push_at(offset, element);
                }
                RawMeasureItem::Placed {
                    offset: None,
                    element,
                }
                | RawMeasureItem::Bare(element) => {
                    measure.push(element);
                }
            }
        }
        measure
    }
}

/// Anything that can appear directly inside a part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartElement {
    Measure(Measure),
    Instrument(String),
    Tempo(String),
    TimeSignature(TimeSignature),
    /// A note or rest outside any measure
    Event(Event),
    Housekeeping(String),
    Unknown(String),
}

impl PartElement {
    pub fn describe(&self) -> String {
        match self {
            PartElement::Measure(m) => format!("measure {}", m.number),
            PartElement::Instrument(name) => format!("instrument {}", name),
            PartElement::Tempo(text) => format!("tempo {}", text),
            PartElement::TimeSignature(ts) => {
                format!("time signature {}/{}", ts.numerator, ts.denominator)
            }
            PartElement::Event(event) => MeasureElement::Event(event.clone()).describe(),
            PartElement::Housekeeping(what) | PartElement::Unknown(what) => what.clone(),
        }
    }
}

/// One staff's worth of music
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Part {
    /// Instrument name shown at the start of the staff
    #[serde(default)]
    pub name: Option<String>,

    /// Render as a staff-less annotation lane instead of a staff
    #[serde(default)]
    pub analysis_voice: bool,

    /// Raw LilyPond spliced in right after the part opens
    #[serde(default)]
    pub instruction: Option<String>,

    #[serde(default)]
    pub contents: Vec<PartElement>,
}

impl Part {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_measure(mut self, measure: Measure) -> Self {
        self.contents.push(PartElement::Measure(measure));
        self
    }

    pub fn with_element(mut self, element: PartElement) -> Self {
        self.contents.push(element);
        self
    }

    pub fn analysis(mut self) -> Self {
        self.analysis_voice = true;
        self
    }

    pub fn with_instruction<S: Into<String>>(mut self, instruction: S) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Every event in the part in order, looking inside measures
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.contents.iter().flat_map(|element| {
            let events: Box<dyn Iterator<Item = &Event> + '_> = match element {
                PartElement::Measure(measure) => Box::new(
                    measure.items.iter().filter_map(|item| item.element.as_event()),
                ),
                PartElement::Event(event) => Box::new(std::iter::once(event)),
                _ => Box::new(std::iter::empty()),
            };
            events
        })
    }
}

/// Bibliographic information about a score
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub title: Option<String>,
    pub alternative_title: Option<String>,
    pub composer: Option<String>,
    pub date: Option<String>,
    pub movement_name: Option<String>,
    pub movement_number: Option<String>,
    pub opus_number: Option<String>,
}

/// Anything that can appear directly inside a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreElement {
    Part(Part),
    Metadata(Metadata),
    /// Staff bracket grouping; the output always uses one StaffGroup
    StaffGroup,
    /// Importer bookkeeping, score layout records, text boxes
    Housekeeping(String),
    Unknown(String),
}

impl ScoreElement {
    pub fn describe(&self) -> String {
        match self {
            ScoreElement::Part(part) => match &part.name {
                Some(name) => format!("part {}", name),
                None => "unnamed part".to_string(),
            },
            ScoreElement::Metadata(_) => "metadata".to_string(),
            ScoreElement::StaffGroup => "staff group".to_string(),
            ScoreElement::Housekeeping(what) | ScoreElement::Unknown(what) => what.clone(),
        }
    }
}

/// A whole score
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub children: Vec<ScoreElement>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.children.push(ScoreElement::Metadata(metadata));
        self
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.children.push(ScoreElement::Part(part));
        self
    }

    pub fn with_element(mut self, element: ScoreElement) -> Self {
        self.children.push(element);
        self
    }

    /// Load a score from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a score from its YAML form
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
