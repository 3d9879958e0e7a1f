//! Emitters for clefs, barlines, key and time signatures
//!
//! The clef, key and time emitters take an `append` string written after each
//! generated command (the measure assembler passes `"\n\t"` to start the next
//! line) and an `invisible` flag that prefixes a one-off transparency override.

use crate::models::{Barline, Clef, KeySignature, TimeSignature};
use crate::renderers::lilypond::errors::{TranscodeError, TranscodeResult};
use crate::renderers::lilypond::pitch::pitch_to_lily;

fn transparent_override(grob: &str, append: &str) -> String {
    format!("\\once \\override Staff.{} #'transparent = ##t{}", grob, append)
}

fn clef_command(clef: &Clef) -> TranscodeResult<&'static str> {
    let command = match clef {
        Clef::Treble8vb => "\\clef \"treble_8\"",
        Clef::Treble8va => "\\clef \"treble^8\"",
        Clef::Bass8vb => "\\clef \"bass_8\"",
        Clef::Bass8va => "\\clef \"bass^8\"",
        Clef::Treble => "\\clef treble",
        Clef::Bass => "\\clef bass",
        Clef::Tenor => "\\clef tenor",
        Clef::Alto => "\\clef alto",
        Clef::FBaritone => "\\clef varbaritone",
        Clef::CBaritone => "\\clef baritone",
        Clef::FrenchViolin => "\\clef french",
        Clef::MezzoSoprano => "\\clef mezzosoprano",
        Clef::Percussion => "\\clef percussion",
        Clef::Soprano => "\\clef soprano",
        Clef::SubBass => "\\clef subbass",
        Clef::Other(what) => {
            return Err(TranscodeError::UnrecognizedElement(format!(
                "clef type not recognized: {}",
                what
            )))
        }
    };
    Ok(command)
}

/// `\clef` command for a clef
pub fn clef_to_lily(clef: &Clef, append: &str, invisible: bool) -> TranscodeResult<String> {
    let command = clef_command(clef)?;
    let mut lily = if invisible {
        transparent_override("Clef", append)
    } else {
        String::new()
    };
    lily.push_str(command);
    lily.push_str(append);
    Ok(lily)
}

/// `\bar` command for a barline style
pub fn barline_to_lily(barline: &Barline) -> TranscodeResult<String> {
    let symbol = match barline.style.as_str() {
        "regular" => "|",
        "dotted" => ":",
        "dashed" => "dashed",
        "heavy" => "|.|",
        "double" => "||",
        "final" => "|.",
        "heavy-light" => ".|",
        "heavy-heavy" => ".|.",
        "tick" | "short" => "'",
        "none" => "",
        other => {
            return Err(TranscodeError::UnrecognizedElement(format!(
                "barline type not recognized ({})",
                other
            )))
        }
    };
    Ok(format!("\\bar \"{}\"", symbol))
}

/// `\key` command; keys without a mode are written as major
pub fn key_signature_to_lily(
    key: &KeySignature,
    append: &str,
    invisible: bool,
) -> TranscodeResult<String> {
    let (tonic, mode) = key.pitch_and_mode();
    let mut lily = if invisible {
        transparent_override("KeySignature", append)
    } else {
        String::new()
    };
    lily.push_str(&format!(
        "\\key {} \\{}{}",
        pitch_to_lily(&tonic, false)?,
        mode.keyword(),
        append
    ));
    Ok(lily)
}

/// `\time` command
pub fn time_signature_to_lily(time: &TimeSignature, append: &str, invisible: bool) -> String {
    let mut lily = if invisible {
        transparent_override("TimeSignature", append)
    } else {
        String::new()
    };
    lily.push_str(&format!("\\time {}/{}{}", time.numerator, time.denominator, append));
    lily
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mode;

    #[test]
    fn test_clef_commands() {
        let cases = [
            (Clef::Treble, "\\clef treble"),
            (Clef::Bass, "\\clef bass"),
            (Clef::Tenor, "\\clef tenor"),
            (Clef::Alto, "\\clef alto"),
            (Clef::Treble8vb, "\\clef \"treble_8\""),
            (Clef::Treble8va, "\\clef \"treble^8\""),
            (Clef::Bass8vb, "\\clef \"bass_8\""),
            (Clef::Bass8va, "\\clef \"bass^8\""),
            (Clef::FBaritone, "\\clef varbaritone"),
            (Clef::CBaritone, "\\clef baritone"),
            (Clef::FrenchViolin, "\\clef french"),
            (Clef::MezzoSoprano, "\\clef mezzosoprano"),
            (Clef::Percussion, "\\clef percussion"),
            (Clef::Soprano, "\\clef soprano"),
            (Clef::SubBass, "\\clef subbass"),
        ];
        for (clef, expected) in cases {
            assert_eq!(clef_to_lily(&clef, "", false).unwrap(), expected);
        }
    }

    #[test]
    fn test_clef_append_and_invisible() {
        assert_eq!(clef_to_lily(&Clef::Treble, "\n", false).unwrap(), "\\clef treble\n");
        assert_eq!(
            clef_to_lily(&Clef::Treble, " hello ", true).unwrap(),
            "\\once \\override Staff.Clef #'transparent = ##t hello \\clef treble hello "
        );
    }

    #[test]
    fn test_unknown_clef() {
        let err = clef_to_lily(&Clef::Other("no clef".to_string()), "\n", false).unwrap_err();
        assert!(matches!(err, TranscodeError::UnrecognizedElement(ref m) if m.contains("no clef")));
    }

    #[test]
    fn test_barlines() {
        let cases = [
            ("regular", "\\bar \"|\""),
            ("dotted", "\\bar \":\""),
            ("dashed", "\\bar \"dashed\""),
            ("heavy", "\\bar \"|.|\""),
            ("double", "\\bar \"||\""),
            ("final", "\\bar \"|.\""),
            ("heavy-light", "\\bar \".|\""),
            ("heavy-heavy", "\\bar \".|.\""),
            ("tick", "\\bar \"'\""),
            ("short", "\\bar \"'\""),
            ("none", "\\bar \"\""),
        ];
        for (style, expected) in cases {
            assert_eq!(barline_to_lily(&Barline::new(style)).unwrap(), expected);
        }
        assert!(matches!(
            barline_to_lily(&Barline::new("wavy")),
            Err(TranscodeError::UnrecognizedElement(_))
        ));
    }

    #[test]
    fn test_key_signatures() {
        assert_eq!(
            key_signature_to_lily(&KeySignature::new(-3, None), "\n\t", false).unwrap(),
            "\\key ees \\major\n\t"
        );
        assert_eq!(
            key_signature_to_lily(&KeySignature::new(3, Some(Mode::Minor)), "", false).unwrap(),
            "\\key fis \\minor"
        );
        assert_eq!(
            key_signature_to_lily(&KeySignature::new(0, None), "\n\t", true).unwrap(),
            "\\once \\override Staff.KeySignature #'transparent = ##t\n\t\\key c \\major\n\t"
        );
    }

    #[test]
    fn test_time_signatures() {
        assert_eq!(
            time_signature_to_lily(&TimeSignature::new(6, 8), "\n\t", false),
            "\\time 6/8\n\t"
        );
        assert_eq!(
            time_signature_to_lily(&TimeSignature::new(4, 4), "\n\t", true),
            "\\once \\override Staff.TimeSignature #'transparent = ##t\n\t\\time 4/4\n\t"
        );
    }
}
