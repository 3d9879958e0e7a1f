//! Part assembler and analysis-voice emitter
//!
//! Each part becomes a LilyPond variable (`partaaaa = { ... }`) registered in
//! the [`ScoreContext`] so the `\score` block can reference it later.

use crate::models::{Part, PartElement};
use crate::renderers::lilypond::context::ScoreContext;
use crate::renderers::lilypond::errors::{TranscodeError, TranscodeResult};
use crate::renderers::lilypond::measure::measure_to_lily;
use crate::renderers::lilypond::notes::{event_to_lily, spacer_to_lily};
use crate::renderers::lilypond::settings::Settings;

/// Short instrument name: first three characters and a period
fn short_name(name: &str) -> String {
    if name.chars().count() > 3 {
        format!("{}.", name.chars().take(3).collect::<String>())
    } else {
        name.to_string()
    }
}

fn instrument_name_lines(name: &str) -> String {
    format!(
        "\t%% {}\n\t\\set Staff.instrumentName = \\markup{{ \"{}\" }}\n\t\\set Staff.shortInstrumentName = \\markup{{ \"{}\" }}\n",
        name,
        name,
        short_name(name)
    )
}

/// Spacer lines carrying an analysis part's markup, one event per line
pub fn analysis_voice_to_lily(part: &Part) -> TranscodeResult<String> {
    let mut lily = String::new();
    for event in part.events() {
        lily.push('\t');
        lily.push_str(&spacer_to_lily(event)?);
        lily.push('\n');
    }
    Ok(lily)
}

/// Measures and stray events of an ordinary part
fn part_body(part: &Part, settings: &Settings) -> TranscodeResult<String> {
    let mut lily = String::new();
    for element in &part.contents {
        match element {
            PartElement::Measure(measure) => {
                lily.push_str(&measure_to_lily(measure, measure.number == 0, settings)?);
            }
            // Names were handled above; tempo and part-level meter aren't written
            PartElement::Instrument(_) | PartElement::Tempo(_) | PartElement::TimeSignature(_) => {}
            PartElement::Event(event) => {
                lily.push_str(&event_to_lily(event, false)?);
                lily.push(' ');
            }
            PartElement::Housekeeping(_) => {}
            PartElement::Unknown(what) => {
                let message = format!("unknown object in part: {}", what);
                if settings.is_strict() {
                    return Err(TranscodeError::UnrecognizedElement(message));
                }
                log::warn!("Skipping {}", message);
            }
        }
    }
    Ok(lily)
}

/// LilyPond variable definition for one part.
///
/// The part is registered in `context` under a freshly generated name. A
/// named part shows its instrument name (when enabled); an unnamed analysis
/// part is written as a spacer lane instead of a staff.
pub fn part_to_lily(
    part: &Part,
    settings: &Settings,
    context: &mut ScoreContext,
) -> TranscodeResult<String> {
    let name = context.register_part();
    log::debug!("Writing part {} as {}", part.name.as_deref().unwrap_or("(unnamed)"), name);

    let mut lily = format!("{} =\n{{\n", name);

    if let Some(instruction) = &part.instruction {
        lily.push_str(instruction);
    }

    let instrument = part.name.as_deref().filter(|n| !n.is_empty());
    match instrument {
        Some(instrument) => {
            if settings.print_instrument_names {
                lily.push_str(&instrument_name_lines(instrument));
            }
            if part.analysis_voice {
                log::warn!(
                    "Analysis part {} has an instrument name; its annotations are not written",
                    instrument
                );
            }
        }
        None if part.analysis_voice => {
            context.register_analysis(&name);
            lily.push_str("\t%% vis annotated analysis\n");
            lily.push_str(&analysis_voice_to_lily(part)?);
        }
        None => {}
    }

    if let Some(visibility) = &settings.bar_numbers {
        lily.push_str(&format!(
            "\n\t\\override Score.BarNumber #'break-visibility = {}\n",
            visibility
        ));
    }

    if !part.analysis_voice {
        lily.push_str(&part_body(part, settings)?);
    }

    lily.push_str("}\n");
    Ok(lily)
}
