//! Score assembler and `\header` emitter

use crate::models::{Metadata, Score, ScoreElement};
use crate::renderers::lilypond::context::ScoreContext;
use crate::renderers::lilypond::errors::{TranscodeError, TranscodeResult};
use crate::renderers::lilypond::part::part_to_lily;
use crate::renderers::lilypond::settings::Settings;
use crate::renderers::lilypond::templates::{render_lilypond, LilyPondTemplate, TemplateContext};

/// `\header` block for the score's metadata.
///
/// The tagline comes from settings: unset prints an empty tagline, an empty
/// string leaves LilyPond's default, anything else is printed as given.
pub fn metadata_to_lily(metadata: &Metadata, settings: &Settings) -> String {
    let mut lily = String::from("\\header {\n");

    if let Some(composer) = &metadata.composer {
        lily.push_str(&format!("\tcomposer = \\markup{{ \"{}\" }}\n", composer));
    }
    if let Some(date) = &metadata.date {
        lily.push_str(&format!("\tdate = \"{}\"\n", date));
    }
    if let Some(movement) = &metadata.movement_name {
        match &metadata.movement_number {
            Some(number) => lily.push_str(&format!(
                "\tsubtitle = \\markup{{ \"{}: {}\" }}\n",
                number, movement
            )),
            None => lily.push_str(&format!("\tsubtitle = \\markup{{ \"{}\" }}\n", movement)),
        }
    }
    if let Some(opus) = &metadata.opus_number {
        lily.push_str(&format!("\topus = \"{}\"\n", opus));
    }
    if let Some(title) = &metadata.title {
        match &metadata.alternative_title {
            Some(alternative) => lily.push_str(&format!(
                "\ttitle = \\markup{{ \"{}(\\\"{}\\\")\" }}\n",
                title, alternative
            )),
            None => lily.push_str(&format!("\ttitle = \\markup{{ \"{}\" }}\n", title)),
        }
    }

    match settings.tagline.as_deref() {
        None => lily.push_str("\ttagline = \"\"\n"),
        Some("") => {}
        Some(tagline) => lily.push_str(&format!("\ttagline = \"{}\"\n", tagline)),
    }

    lily.push_str("}\n");
    lily
}

/// Complete LilyPond source for a score.
///
/// Parts and metadata are written in source order between the preamble and
/// the `\score` block, which lists every part in the order it was written.
pub fn score_to_lily(score: &Score, settings: &Settings) -> TranscodeResult<String> {
    let mut context = ScoreContext::new();

    let preamble = TemplateContext::new(
        settings.lilypond_version.clone(),
        settings.paper_size.clone(),
    );
    let mut lily = render_lilypond(LilyPondTemplate::Preamble, &preamble)?;

    for child in &score.children {
        match child {
            ScoreElement::Part(part) => {
                lily.push_str(&part_to_lily(part, settings, &mut context)?);
                lily.push('\n');
            }
            ScoreElement::Metadata(metadata) => {
                lily.push_str(&metadata_to_lily(metadata, settings));
                lily.push('\n');
            }
            ScoreElement::StaffGroup | ScoreElement::Housekeeping(_) => {}
            ScoreElement::Unknown(what) => {
                let message = format!("unknown object in score: {}", what);
                if settings.is_strict() {
                    return Err(TranscodeError::UnrecognizedElement(message));
                }
                log::warn!("Skipping {}", message);
            }
        }
    }

    let block = context
        .part_names()
        .iter()
        .fold(
            TemplateContext::builder(settings.lilypond_version.clone(), settings.paper_size.clone()),
            |builder, name| builder.staff(name, context.is_analysis(name)),
        )
        .indent(settings.indent.as_deref())
        .build();
    lily.push_str(&render_lilypond(LilyPondTemplate::ScoreBlock, &block)?);

    log::debug!("Wrote score with {} parts", context.part_names().len());
    Ok(lily)
}
