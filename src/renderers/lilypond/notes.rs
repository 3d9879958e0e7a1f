//! Note, rest and chord emitter

use crate::models::{Event, EventKind, TieType};
use crate::renderers::lilypond::duration::duration_to_lily;
use crate::renderers::lilypond::errors::{TranscodeError, TranscodeResult};
use crate::renderers::lilypond::pitch::pitch_to_lily;

/// Note head: `s` for hidden events, `r` for rests, a pitch or a `<...>` chord
fn event_head(event: &Event) -> TranscodeResult<String> {
    if event.invisible {
        return Ok("s".to_string());
    }
    match &event.kind {
        EventKind::Rest => Ok("r".to_string()),
        EventKind::Note(pitch) => pitch_to_lily(pitch, true),
        EventKind::Chord(pitches) => {
            if pitches.is_empty() {
                return Err(TranscodeError::InvalidChord("chord has no pitches".to_string()));
            }
            let names = pitches
                .iter()
                .map(|p| pitch_to_lily(p, true))
                .collect::<TranscodeResult<Vec<_>>>()?;
            Ok(format!("<{}>", names.join(" ")))
        }
    }
}

/// Head plus duration, tie and markup
fn write_event(head: &str, event: &Event, known_tuplet: bool) -> TranscodeResult<String> {
    let mut lily = if event.duration.is_compound() {
        event
            .duration
            .components
            .iter()
            .map(|component| -> TranscodeResult<String> {
                Ok(format!("{}{}", head, duration_to_lily(component, known_tuplet)?))
            })
            .collect::<TranscodeResult<Vec<_>>>()?
            .join("~ ")
    } else {
        format!("{}{}", head, duration_to_lily(&event.duration, known_tuplet)?)
    };

    if event.tie == Some(TieType::Start) {
        lily.push('~');
    }

    if let Some(markup) = &event.markup {
        lily.push_str(markup);
    }

    Ok(lily)
}

/// LilyPond for a note, rest or chord.
///
/// Durations that need several tied values are written as repeated heads
/// joined by ties, e.g. `c'1~ c'4`.
pub fn event_to_lily(event: &Event, known_tuplet: bool) -> TranscodeResult<String> {
    let head = event_head(event)?;
    write_event(&head, event, known_tuplet)
}

/// The event as a spacer (`s`), keeping its duration, tie and markup
pub fn spacer_to_lily(event: &Event) -> TranscodeResult<String> {
    write_event("s", event, false)
}
