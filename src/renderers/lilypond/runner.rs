//! Writing `.ly` files and launching LilyPond on them
//!
//! LilyPond runs in the background: [`run_lilypond`] spawns the process and
//! hands back the [`Child`] without waiting for the PDF. Its output streams
//! are discarded so the process keeps running after the handle is dropped.

use std::fs;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::renderers::lilypond::errors::RenderError;
use crate::renderers::lilypond::settings::Settings;

/// Output basename for LilyPond's `-o`: the file name without a trailing `.ly`
pub fn pdf_basename(filename: &str) -> &str {
    match filename.strip_suffix(".ly") {
        Some(stem) if !stem.is_empty() => stem,
        _ => filename,
    }
}

/// Write LilyPond source to a file
pub fn write_source<P: AsRef<Path>>(path: P, source: &str) -> Result<(), RenderError> {
    fs::write(path.as_ref(), source)?;
    log::debug!("Wrote {} bytes to {}", source.len(), path.as_ref().display());
    Ok(())
}

/// Start LilyPond on `filename`, producing a PDF next to it
pub fn run_lilypond(filename: &str, settings: &Settings) -> Result<Child, RenderError> {
    let program = settings.lilypond_path.as_str();
    log::info!("Running {} on {}", program, filename);

    Command::new(program)
        .arg("--pdf")
        .arg("-o")
        .arg(pdf_basename(filename))
        .arg(filename)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| RenderError::Spawn {
            program: program.to_string(),
            source,
        })
}
