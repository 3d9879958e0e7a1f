//! Error types for LilyPond transcoding
//!
//! Codec errors (durations, pitches, clefs, barlines) always abort the
//! transcoding pass. Structural errors are only raised in strict mode; the
//! lenient default logs and skips the offending element instead.

use thiserror::Error;

/// Transcoding failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    /// Zero-length or unrepresentable duration
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Duration that can't be written by a single call to the duration codec
    #[error("Unsupported duration: {0}")]
    UnsupportedDuration(String),

    /// Unknown clef, barline style, or (in strict mode) stream element
    #[error("Unrecognized element: {0}")]
    UnrecognizedElement(String),

    /// Octave outside the 0..=12 range LilyPond marks can express
    #[error("Octave out of range: {0}")]
    OctaveOutOfRange(i32),

    /// Chord without any pitches
    #[error("Invalid chord: {0}")]
    InvalidChord(String),

    /// Tuplet group whose members don't follow it in the measure
    #[error("Malformed tuplet in measure {measure}: {reason}")]
    MalformedTuplet { measure: i32, reason: String },

    /// Settings key outside the recognised set
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    /// Settings value of the wrong type for its key
    #[error("Invalid value for setting {key}: {reason}")]
    InvalidSettingValue { key: String, reason: String },

    /// Mustache template failed to compile or render
    #[error("Template rendering failed: {0}")]
    Template(String),
}

/// Result alias used throughout the renderer
pub type TranscodeResult<T> = Result<T, TranscodeError>;

/// Failures while loading settings or probing for LilyPond
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid LilyPond version string: {0:?}")]
    InvalidVersion(String),

    #[error("Could not run LilyPond: {0}")]
    Detection(String),
}

/// Failures while writing source files or launching LilyPond
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
