// Whole-score LilyPond output through the public API

use num_rational::Rational64;
use pretty_assertions::assert_eq;
use score_lily::models::{
    Barline, Clef, Duration, Event, Measure, Metadata, Part, PartElement, Pitch, Score,
    ScoreElement, TimeSignature,
};
use score_lily::{process_score, Settings, TranscodeError};

const PREAMBLE: &str =
    "% LilyPond output from score-lily\n\\version \"2.16.0\"\n\n\\paper {\n\t#(set-paper-size \"letter\")\n}\n\n";

const LAYOUT_CONTEXTS: &str = "\t\t% VisAnnotation Context
\t\t\\context
\t\t{
\t\t\t\\type \"Engraver_group\"
\t\t\t\\name VisAnnotation
\t\t\t\\alias Voice
\t\t\t\\consists \"Output_property_engraver\"
\t\t\t\\consists \"Script_engraver\"
\t\t\t\\consists \"Text_engraver\"
\t\t\t\\consists \"Skip_event_swallow_translator\"
\t\t\t\\consists \"Axis_group_engraver\"
\t\t}
\t\t% End VisAnnotation Context
\t\t
\t\t% Modify \"StaffGroup\" context to accept VisAnnotation context.
\t\t\\context
\t\t{
\t\t\t\\StaffGroup
\t\t\t\\accepts VisAnnotation
\t\t}
\t}
}

";

fn note(name: &str, ql: f64) -> Event {
    Event::note(name.parse::<Pitch>().unwrap(), Duration::from_quarters(ql))
}

fn violin_part() -> Part {
    Part::named("Violin").with_measure(
        Measure::in_time(1, &TimeSignature::new(4, 4))
            .with(Clef::Treble)
            .with(TimeSignature::new(4, 4))
            .with(note("C5", 2.0))
            .with(note("D5", 2.0))
            .with(Barline::new("final")),
    )
}

fn analysis_part() -> Part {
    Part::new().analysis().with_measure(
        Measure::in_time(1, &TimeSignature::new(4, 4))
            .with(note("C4", 4.0).with_markup("^\\markup{ \"I\" }")),
    )
}

#[test]
fn test_complete_score() {
    let score = Score::new()
        .with_metadata(Metadata {
            title: Some("Test".to_string()),
            composer: Some("Tester".to_string()),
            ..Metadata::default()
        })
        .with_part(violin_part())
        .with_part(analysis_part());

    let lily = process_score(&score, None).expect("score should convert");

    let expected = [
        PREAMBLE,
        "\\header {\n\tcomposer = \\markup{ \"Tester\" }\n\ttitle = \\markup{ \"Test\" }\n}\n\n",
        "partaaaa =\n{\n\t%% Violin\n\t\\set Staff.instrumentName = \\markup{ \"Violin\" }\n\t\\set Staff.shortInstrumentName = \\markup{ \"Vio.\" }\n",
        "\t\\clef treble\n\t\\time 4/4\n\tc''2 d''2 |\n\t\\bar \"|.\"\n}\n\n",
        "partaaab =\n{\n\t%% vis annotated analysis\n\ts1^\\markup{ \"I\" }\n}\n\n",
        "\\score {\n\t\\new StaffGroup\n\t<<\n",
        "\t\t\\new Staff = \"partaaaa\" \\partaaaa\n",
        "\t\t\\new VisAnnotation = \"partaaab\" \\partaaab\n",
        "\t>>\n\t\\layout{\n",
        LAYOUT_CONTEXTS,
    ]
    .concat();

    assert_eq!(lily, expected);
}

#[test]
fn test_staff_entries_follow_registration_order() {
    let score = Score::new()
        .with_part(analysis_part())
        .with_part(violin_part())
        .with_part(violin_part());

    let lily = process_score(&score, None).unwrap();
    let staff_block = "\t<<\n\t\t\\new VisAnnotation = \"partaaaa\" \\partaaaa\n\t\t\\new Staff = \"partaaab\" \\partaaab\n\t\t\\new Staff = \"partaaac\" \\partaaac\n\t>>\n";
    assert!(lily.contains(staff_block), "unexpected staff list in:\n{}", lily);
}

#[test]
fn test_indent_and_paper_settings() {
    let mut settings = Settings::default();
    settings.set("indent", "#0").unwrap();
    settings.set("paper_size", "a4").unwrap();
    settings.set("lilypond_version", "2.24.0").unwrap();

    let lily = process_score(&Score::new(), Some(&settings)).unwrap();
    assert!(lily.starts_with("% LilyPond output from score-lily\n\\version \"2.24.0\"\n\n\\paper {\n\t#(set-paper-size \"a4\")\n}\n\n"));
    assert!(lily.contains("\t\\layout{\n\t\tindent = #0\n\t\t% VisAnnotation Context\n"));
}

#[test]
fn test_staff_group_and_housekeeping_write_nothing() {
    let score = Score::new()
        .with_element(ScoreElement::StaffGroup)
        .with_element(ScoreElement::Housekeeping("global comment".to_string()));
    let lily = process_score(&score, None).unwrap();
    assert!(lily.starts_with(&format!("{}\\score {{\n", PREAMBLE)));
}

#[test]
fn test_pickup_and_final_measures() {
    let part = Part::new()
        .with_measure(Measure::new(0, Rational64::from_integer(4)).with(note("G4", 1.0)))
        .with_measure(
            Measure::new(1, Rational64::from_integer(4))
                .with(note("C5", 3.0))
                .with(Barline::new("final")),
        );
    let lily = process_score(&Score::new().with_part(part), None).unwrap();
    assert!(lily.contains("partaaaa =\n{\n\t\\partial 4\n\tg'4 |\n\tc''2. |\n\t\\bar \"|.\"\n}\n\n"));
}

#[test]
fn test_codec_errors_propagate() {
    let part = Part::new().with_measure(
        Measure::new(1, Rational64::from_integer(4)).with(note("C13", 4.0)),
    );
    let err = process_score(&Score::new().with_part(part), None).unwrap_err();
    assert_eq!(err, TranscodeError::OctaveOutOfRange(13));
}

#[test]
fn test_bare_events_in_part() {
    let part = Part::new()
        .with_element(PartElement::Event(note("E4", 0.5)))
        .with_element(PartElement::Event(Event::rest(Duration::from_quarters(0.5))));
    let lily = process_score(&Score::new().with_part(part), None).unwrap();
    assert!(lily.contains("partaaaa =\n{\ne'8 r8 }\n\n"));
}

#[test]
fn test_score_from_json() {
    let json = r#"{
        "children": [
            {"metadata": {"title": "From JSON", "opus_number": "7"}},
            {"part": {
                "name": "Cello",
                "contents": [
                    {"instrument": "Violoncello"},
                    {"measure": {
                        "number": 1,
                        "bar_duration": 3,
                        "items": [
                            {"clef": "bass"},
                            {"key_signature": {"sharps": 2}},
                            {"time_signature": {"numerator": 3, "denominator": 4}},
                            {"event": {"kind": {"note": {"step": "D", "octave": 3}}, "duration": {"quarter_length": 1.5}}},
                            {"event": {"kind": {"note": {"step": "F", "alter": 1, "octave": 3}}, "duration": {"quarter_length": "1/2"}, "tie": "start"}},
                            {"event": {"kind": {"chord": [{"step": "A", "octave": 2}, {"step": "A", "octave": 3}]}, "duration": {"quarter_length": 1}}},
                            {"barline": {"style": "double"}}
                        ]
                    }}
                ]
            }},
            "staff_group"
        ]
    }"#;

    let score = Score::from_json_str(json).expect("valid score JSON");
    let lily = process_score(&score, None).unwrap();

    assert!(lily.contains("\\header {\n\topus = \"7\"\n\ttitle = \\markup{ \"From JSON\" }\n}\n\n"));
    assert!(lily.contains(
        "partaaaa =\n{\n\t%% Cello\n\t\\set Staff.instrumentName = \\markup{ \"Cello\" }\n\t\\set Staff.shortInstrumentName = \\markup{ \"Cel.\" }\n\t\\clef bass\n\t\\key d \\major\n\t\\time 3/4\n\td4. fis8~ <a, a>4 |\n\t\\bar \"||\"\n}\n"
    ));
}
