//! LilyPond template rendering
//!
//! The fixed parts of a document (version and paper preamble, the `\score`
//! block with its layout boilerplate) live in Mustache templates embedded at
//! compile time. Only triple-brace (unescaped) variables are used, and never
//! on a line of their own, so the templates' tabs and newlines come through
//! untouched.

use serde::Serialize;

use crate::renderers::lilypond::errors::{TranscodeError, TranscodeResult};

/// Template selection
#[derive(Debug, Clone, Copy)]
pub enum LilyPondTemplate {
    /// Provenance comment, `\version` and `\paper` block
    Preamble,
    /// `\score` block with staff list and layout contexts
    ScoreBlock,
}

/// Context data for template rendering
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    /// LilyPond version (e.g., "2.16.0")
    pub version: String,

    pub paper_size: String,

    /// Pre-rendered `\new Staff` / `\new VisAnnotation` lines
    pub staves: String,

    /// Pre-rendered `indent = ...` line, or empty
    pub indent: String,
}

impl TemplateContext {
    pub fn new(version: String, paper_size: String) -> Self {
        Self {
            version,
            paper_size,
            staves: String::new(),
            indent: String::new(),
        }
    }

    pub fn builder(version: String, paper_size: String) -> TemplateContextBuilder {
        TemplateContextBuilder::new(version, paper_size)
    }
}

/// Builder for TemplateContext
pub struct TemplateContextBuilder {
    context: TemplateContext,
}

impl TemplateContextBuilder {
    pub fn new(version: String, paper_size: String) -> Self {
        Self {
            context: TemplateContext::new(version, paper_size),
        }
    }

    /// Add one staff line; analysis parts get a `VisAnnotation` context
    pub fn staff(mut self, name: &str, analysis: bool) -> Self {
        let context_type = if analysis { "VisAnnotation" } else { "Staff" };
        self.context
            .staves
            .push_str(&format!("\t\t\\new {} = \"{}\" \\{}\n", context_type, name, name));
        self
    }

    /// Set the layout indent (e.g. `#0`); `None` leaves LilyPond's default
    pub fn indent(mut self, indent: Option<&str>) -> Self {
        self.context.indent = indent
            .map(|value| format!("\t\tindent = {}\n", value))
            .unwrap_or_default();
        self
    }

    pub fn build(self) -> TemplateContext {
        self.context
    }
}

/// Get template content by type
pub fn get_template_content(template_type: LilyPondTemplate) -> &'static str {
    match template_type {
        LilyPondTemplate::Preamble => include_str!("templates/preamble.ly.mustache"),
        LilyPondTemplate::ScoreBlock => include_str!("templates/score.ly.mustache"),
    }
}

/// Render a template with the given context
pub fn render_lilypond(
    template_type: LilyPondTemplate,
    context: &TemplateContext,
) -> TranscodeResult<String> {
    let template = mustache::compile_str(get_template_content(template_type))
        .map_err(|e| TranscodeError::Template(e.to_string()))?;
    template
        .render_to_string(context)
        .map_err(|e| TranscodeError::Template(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_template_context_builder() {
        let context = TemplateContext::builder("2.16.0".to_string(), "letter".to_string())
            .staff("partaaaa", false)
            .staff("partaaab", true)
            .indent(Some("#0"))
            .build();

        assert_eq!(
            context.staves,
            "\t\t\\new Staff = \"partaaaa\" \\partaaaa\n\t\t\\new VisAnnotation = \"partaaab\" \\partaaab\n"
        );
        assert_eq!(context.indent, "\t\tindent = #0\n");
    }

    #[test]
    fn test_render_preamble() {
        let context = TemplateContext::new("2.16.0".to_string(), "a4".to_string());
        let rendered = render_lilypond(LilyPondTemplate::Preamble, &context).unwrap();
        assert_eq!(
            rendered,
            "% LilyPond output from score-lily\n\\version \"2.16.0\"\n\n\\paper {\n\t#(set-paper-size \"a4\")\n}\n\n"
        );
    }

    #[test]
    fn test_render_score_block_keeps_whitespace() {
        let context = TemplateContext::builder("2.16.0".to_string(), "letter".to_string())
            .staff("partaaaa", false)
            .build();
        let rendered = render_lilypond(LilyPondTemplate::ScoreBlock, &context).unwrap();
        assert!(rendered.starts_with(
            "\\score {\n\t\\new StaffGroup\n\t<<\n\t\t\\new Staff = \"partaaaa\" \\partaaaa\n\t>>\n\t\\layout{\n\t\t% VisAnnotation Context\n"
        ));
        assert!(rendered.contains("\t\t\t\\name VisAnnotation\n"));
        assert!(rendered.contains("\t\t\t\\accepts VisAnnotation\n"));
        assert!(rendered.ends_with("\t\t}\n\t}\n}\n\n"));
    }

    #[test]
    fn test_values_are_not_html_escaped() {
        let context = TemplateContext::new("2.16.0".to_string(), "<a&b>".to_string());
        let rendered = render_lilypond(LilyPondTemplate::Preamble, &context).unwrap();
        assert!(rendered.contains("(set-paper-size \"<a&b>\")"));
    }
}
