//! Measure assembler
//!
//! Writes one measure as a single tab-indented line (plus extra lines for
//! attribute changes and special barlines), ending with a bar check.

use num_rational::Rational64;

use crate::models::{
    Duration, Event, Measure, MeasureElement, NoteType, Placement, TextExpression,
};
use crate::renderers::lilypond::attributes::{
    barline_to_lily, clef_to_lily, key_signature_to_lily, time_signature_to_lily,
};
use crate::renderers::lilypond::duration::duration_to_lily;
use crate::renderers::lilypond::errors::{TranscodeError, TranscodeResult};
use crate::renderers::lilypond::notes::event_to_lily;
use crate::renderers::lilypond::settings::Settings;

/// Written after clef, key and time commands to start the next line
const ATTRIBUTE_APPEND: &str = "\n\t";

/// Round to two decimal places
fn round_hundredths(value: Rational64) -> Rational64 {
    let hundred = Rational64::from_integer(100);
    (value * hundred).round() / hundred
}

fn text_to_markup(text: &TextExpression) -> String {
    let direction = match text.placement {
        Placement::Above => '^',
        Placement::Below => '_',
        Placement::Auto => '-',
    };
    format!("{}\\markup{{ \"{}\" }} ", direction, text.content)
}

/// Duration token for `\partial`.
///
/// Lengths that are not a single (dotted) value, such as a quarter plus a
/// sixteenth or a lone triplet, are written as a scaled base value
/// (`4*5/4`, `16*4/3`).
fn partial_duration_to_lily(length: Rational64) -> TranscodeResult<String> {
    let duration = Duration::new(length);
    if !duration.is_compound() && duration.note_type.is_some() {
        return duration_to_lily(&duration, false);
    }

    let base = NoteType::ALL
        .iter()
        .copied()
        .find(|note_type| note_type.quarter_length() <= length)
        .unwrap_or(NoteType::HundredTwentyEighth);
    let token = duration_to_lily(&Duration::of_type(base, 0), false)?;
    Ok(format!("{}*{}", token, length / base.quarter_length()))
}

/// Assembly state for one measure
struct MeasureWriter<'a> {
    measure: &'a Measure,
    settings: &'a Settings,
    lily: String,
    barcheck_emitted: bool,
    /// Markup waiting for the next note or rest
    pending_markup: String,
}

impl<'a> MeasureWriter<'a> {
    fn new(measure: &'a Measure, settings: &'a Settings) -> Self {
        Self {
            measure,
            settings,
            lily: String::from("\t"),
            barcheck_emitted: false,
            pending_markup: String::new(),
        }
    }

    fn invisible(&self) -> bool {
        self.measure.invisible
    }

    fn write_partial(&mut self) -> TranscodeResult<()> {
        let length = self.measure.duration();
        let rounded = round_hundredths(length);
        if rounded > Rational64::from_integer(0) && rounded < self.measure.bar_duration {
            let token = partial_duration_to_lily(length)?;
            self.lily.push_str(&format!("\\partial {}\n\t", token));
        }
        Ok(())
    }

    /// Write the item at `index`; returns the index of the next unread item
    fn write_item(&mut self, index: usize) -> TranscodeResult<usize> {
        let measure = self.measure;
        let item = &measure.items[index];
        let mut next = index + 1;

        match &item.element {
            MeasureElement::Event(event) => {
                next = self.write_event(index, event)?;
                if !self.pending_markup.is_empty() {
                    self.lily.push_str(&self.pending_markup);
                    self.pending_markup.clear();
                }
            }
            MeasureElement::Clef(clef) => {
                self.lily
                    .push_str(&clef_to_lily(clef, ATTRIBUTE_APPEND, self.invisible())?);
            }
            MeasureElement::TimeSignature(time) => {
                self.lily
                    .push_str(&time_signature_to_lily(time, ATTRIBUTE_APPEND, self.invisible()));
            }
            MeasureElement::KeySignature(key) => {
                self.lily
                    .push_str(&key_signature_to_lily(key, ATTRIBUTE_APPEND, self.invisible())?);
            }
            MeasureElement::Barline(barline) => {
                self.barcheck_emitted = true;
                if barline.is_regular() {
                    self.lily.push_str("|\n");
                } else {
                    self.lily
                        .push_str(&format!("|\n\t{}\n", barline_to_lily(barline)?));
                }
            }
            MeasureElement::Text(text) => {
                let markup = text_to_markup(text);
                let anchored = measure
                    .element_before_offset(item.offset)
                    .and_then(MeasureElement::as_event)
                    .map_or(false, Event::is_note_or_rest);
                if anchored {
                    self.lily.push_str(&markup);
                } else {
                    self.pending_markup.push_str(&markup);
                }
            }
            MeasureElement::Layout(_) | MeasureElement::Housekeeping(_) => {}
            MeasureElement::Unknown(what) => {
                let message = format!("unknown object in measure {}: {}", measure.number, what);
                if self.settings.is_strict() {
                    return Err(TranscodeError::UnrecognizedElement(message));
                }
                log::warn!("Skipping {}", message);
            }
        }

        Ok(next)
    }

    fn write_event(&mut self, index: usize, event: &Event) -> TranscodeResult<usize> {
        if event.is_rest() && event.quarter_length() == self.measure.bar_duration {
            let head = if self.invisible() || event.invisible { "s" } else { "R" };
            self.lily
                .push_str(&format!("{}{} ", head, duration_to_lily(&event.duration, false)?));
            return Ok(index + 1);
        }

        if let Some(tuplet) = event.duration.tuplets.first() {
            return self.write_tuplet(index, event, tuplet.actual, tuplet.normal);
        }

        self.lily.push_str(&event_to_lily(event, false)?);
        self.lily.push(' ');
        Ok(index + 1)
    }

    /// `\times normal/actual { ... }` around the event at `index` and the
    /// `actual - 1` events after it
    fn write_tuplet(
        &mut self,
        index: usize,
        first: &Event,
        actual: u32,
        normal: u32,
    ) -> TranscodeResult<usize> {
        let measure = self.measure;
        let malformed = |reason: String| TranscodeError::MalformedTuplet {
            measure: measure.number,
            reason,
        };

        if actual == 0 || normal == 0 {
            return Err(malformed(format!("{}:{} is not a tuplet ratio", actual, normal)));
        }

        self.lily.push_str(&format!(
            "\\times {}/{} {{ {} ",
            normal,
            actual,
            event_to_lily(first, true)?
        ));

        let members = actual.saturating_sub(1) as usize;
        for offset in 1..=members {
            let item = measure.items.get(index + offset).ok_or_else(|| {
                malformed(format!(
                    "{}:{} tuplet ends after {} of {} notes",
                    actual, normal, offset, actual
                ))
            })?;
            let member = item.element.as_event().ok_or_else(|| {
                malformed(format!(
                    "{} inside a {}:{} tuplet",
                    item.element.describe(),
                    actual,
                    normal
                ))
            })?;
            self.lily.push_str(&event_to_lily(member, true)?);
            self.lily.push(' ');
        }

        self.lily.push_str("} ");
        Ok(index + 1 + members)
    }

    fn finish(mut self) -> String {
        if self.lily.len() > 1 && !self.barcheck_emitted {
            self.lily.push_str("|\n");
        }

        if !self.pending_markup.is_empty() {
            log::warn!(
                "Measure {}: no note or rest to attach {:?} to",
                self.measure.number,
                self.pending_markup
            );
            self.lily.push_str(&format!(
                "% Could not include this markup: {}\n",
                self.pending_markup
            ));
        }

        if self.invisible() {
            self.lily.push_str("\t\\startStaff\n");
        }

        self.lily
    }
}

/// LilyPond for one measure.
///
/// `first_or_last` enables pick-up detection: a measure shorter than its
/// bar duration gets a `\partial` command.
pub fn measure_to_lily(
    measure: &Measure,
    first_or_last: bool,
    settings: &Settings,
) -> TranscodeResult<String> {
    log::debug!("Writing measure {} ({} items)", measure.number, measure.items.len());

    let mut writer = MeasureWriter::new(measure, settings);

    if measure.invisible {
        writer.lily.push_str("\\stopStaff\n\t");
    }

    if first_or_last {
        writer.write_partial()?;
    }

    let mut index = 0;
    while index < measure.items.len() {
        index = writer.write_item(index)?;
    }

    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Barline, Clef, KeySignature, NoteType, Pitch, TimeSignature};
    use crate::renderers::lilypond::settings::ElementPolicy;
    use pretty_assertions::assert_eq;

    fn note(name: &str, ql: f64) -> Event {
        Event::note(name.parse::<Pitch>().unwrap(), Duration::from_quarters(ql))
    }

    fn triplet_sixteenth(name: &str) -> Event {
        Event::note(
            name.parse::<Pitch>().unwrap(),
            Duration::tuplet(NoteType::Sixteenth, 0, 3, 2),
        )
    }

    fn four_four(number: i32) -> Measure {
        Measure::in_time(number, &TimeSignature::new(4, 4))
    }

    #[test]
    fn test_key_only_measure() {
        let m = four_four(1).with(KeySignature::new(-3, None));
        assert_eq!(
            measure_to_lily(&m, false, &Settings::default()).unwrap(),
            "\t\\key ees \\major\n\t|\n"
        );
    }

    #[test]
    fn test_tuplet_then_rests() {
        let m = four_four(1)
            .with(TimeSignature::new(4, 4))
            .with(triplet_sixteenth("C4"))
            .with(triplet_sixteenth("D4"))
            .with(triplet_sixteenth("E4"))
            .with(Event::rest(Duration::from_quarters(0.5)))
            .with(Event::rest(Duration::from_quarters(1.0)))
            .with(Event::rest(Duration::from_quarters(2.0)));
        assert_eq!(
            measure_to_lily(&m, false, &Settings::default()).unwrap(),
            "\t\\time 4/4\n\t\\times 2/3 { c'16 d'16 e'16 } r8 r4 r2 |\n"
        );
    }

    #[test]
    fn test_partial_first_measure() {
        let m = Measure::new(0, Rational64::from_integer(4))
            .with(TimeSignature::new(4, 4))
            .with(triplet_sixteenth("C4"))
            .with(triplet_sixteenth("D4"))
            .with(triplet_sixteenth("E4"));
        assert_eq!(
            measure_to_lily(&m, true, &Settings::default()).unwrap(),
            "\t\\partial 8\n\t\\time 4/4\n\t\\times 2/3 { c'16 d'16 e'16 } |\n"
        );
    }

    #[test]
    fn test_partial_last_measure_with_final_barline() {
        let m = four_four(9)
            .with(note("G4", 0.5))
            .with(note("E4", 0.5))
            .with(note("F#4", 1.0))
            .with(note("B3", 1.0))
            .with(Barline::new("final"));
        assert_eq!(
            measure_to_lily(&m, true, &Settings::default()).unwrap(),
            "\t\\partial 2.\n\tg'8 e'8 fis'4 b4 |\n\t\\bar \"|.\"\n"
        );
    }

    #[test]
    fn test_partial_of_tied_length() {
        let m = Measure::new(0, Rational64::from_integer(4))
            .with(note("C4", 1.0))
            .with(note("D4", 0.25));
        assert_eq!(
            measure_to_lily(&m, true, &Settings::default()).unwrap(),
            "\t\\partial 4*5/4\n\tc'4 d'16 |\n"
        );
    }

    #[test]
    fn test_partial_durations() {
        assert_eq!(partial_duration_to_lily(Rational64::new(3, 2)).unwrap(), "4.");
        assert_eq!(partial_duration_to_lily(Rational64::new(5, 4)).unwrap(), "4*5/4");
        assert_eq!(partial_duration_to_lily(Rational64::new(1, 3)).unwrap(), "16*4/3");
        assert_eq!(partial_duration_to_lily(Rational64::from_integer(5)).unwrap(), "1*5/4");
    }

    #[test]
    fn test_zero_tuplet_ratio_is_malformed() {
        let mut m = four_four(6);
        m.push(Event::note(
            "C4".parse::<Pitch>().unwrap(),
            Duration::tuplet(NoteType::Eighth, 0, 0, 2),
        ));
        assert!(matches!(
            measure_to_lily(&m, false, &Settings::default()),
            Err(TranscodeError::MalformedTuplet { measure: 6, .. })
        ));
    }

    #[test]
    fn test_invisible_measure() {
        let m = four_four(1)
            .hidden()
            .with(TimeSignature::new(4, 4))
            .with(Event::rest(Duration::from_quarters(4.0)));
        assert_eq!(
            measure_to_lily(&m, false, &Settings::default()).unwrap(),
            "\t\\stopStaff\n\t\\once \\override Staff.TimeSignature #'transparent = ##t\n\t\\time 4/4\n\ts1 |\n\t\\startStaff\n"
        );
    }

    #[test]
    fn test_full_measure_rest() {
        let m = four_four(2).with(Event::rest(Duration::from_quarters(4.0)));
        assert_eq!(measure_to_lily(&m, false, &Settings::default()).unwrap(), "\tR1 |\n");
    }

    #[test]
    fn test_regular_barline_is_only_a_bar_check() {
        let m = four_four(2)
            .with(note("C4", 4.0))
            .with(Barline::new("regular"));
        assert_eq!(measure_to_lily(&m, false, &Settings::default()).unwrap(), "\tc'1 |\n");
    }

    #[test]
    fn test_empty_measure() {
        let m = four_four(3);
        assert_eq!(measure_to_lily(&m, true, &Settings::default()).unwrap(), "\t");
    }

    #[test]
    fn test_clef_line() {
        let m = four_four(1).with(Clef::Bass).with(note("C3", 4.0));
        assert_eq!(
            measure_to_lily(&m, false, &Settings::default()).unwrap(),
            "\t\\clef bass\n\tc1 |\n"
        );
    }

    #[test]
    fn test_text_after_note_is_attached_directly() {
        let mut m = four_four(1);
        m.push(note("C4", 2.0));
        m.push_at(Rational64::from_integer(2), TextExpression::new("dolce", Placement::Above));
        m.push(note("D4", 2.0));
        assert_eq!(
            measure_to_lily(&m, false, &Settings::default()).unwrap(),
            "\tc'2 ^\\markup{ \"dolce\" } d'2 |\n"
        );
    }

    #[test]
    fn test_text_at_measure_start_waits_for_a_note() {
        let m = four_four(1)
            .with(TextExpression::new("p", Placement::Below))
            .with(note("C4", 4.0));
        assert_eq!(
            measure_to_lily(&m, false, &Settings::default()).unwrap(),
            "\tc'1 _\\markup{ \"p\" } |\n"
        );
    }

    #[test]
    fn test_unattached_markup_is_reported() {
        let m = four_four(1)
            .with(Clef::Treble)
            .with(TextExpression::new("fine", Placement::Auto));
        assert_eq!(
            measure_to_lily(&m, false, &Settings::default()).unwrap(),
            "\t\\clef treble\n\t|\n% Could not include this markup: -\\markup{ \"fine\" } \n"
        );
    }

    #[test]
    fn test_short_tuplet_is_malformed() {
        let m = four_four(4)
            .with(triplet_sixteenth("C4"))
            .with(triplet_sixteenth("D4"));
        assert!(matches!(
            measure_to_lily(&m, false, &Settings::default()),
            Err(TranscodeError::MalformedTuplet { measure: 4, .. })
        ));
    }

    #[test]
    fn test_tuplet_interrupted_by_clef_is_malformed() {
        let m = four_four(4)
            .with(triplet_sixteenth("C4"))
            .with(Clef::Alto)
            .with(triplet_sixteenth("D4"));
        assert!(matches!(
            measure_to_lily(&m, false, &Settings::default()),
            Err(TranscodeError::MalformedTuplet { .. })
        ));
    }

    #[test]
    fn test_unknown_element_policy() {
        let mut m = four_four(5);
        m.push(MeasureElement::Unknown("staff layout".to_string()));
        m.push(note("C4", 4.0));

        let lenient = Settings::default();
        assert_eq!(measure_to_lily(&m, false, &lenient).unwrap(), "\tc'1 |\n");

        let strict = Settings {
            element_policy: ElementPolicy::Strict,
            ..Settings::default()
        };
        let err = measure_to_lily(&m, false, &strict).unwrap_err();
        assert!(matches!(err, TranscodeError::UnrecognizedElement(ref msg) if msg.contains("staff layout")));
    }

    #[test]
    fn test_round_hundredths() {
        assert_eq!(round_hundredths(Rational64::new(1, 3)), Rational64::new(33, 100));
        assert_eq!(round_hundredths(Rational64::new(3, 2)), Rational64::new(3, 2));
    }
}
