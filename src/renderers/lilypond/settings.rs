//! Settings for LilyPond output
//!
//! A closed set of options, readable and writable by name through
//! [`Settings::get`] and [`Settings::set`] and loadable from YAML or JSON.
//! Names outside the set are rejected with
//! [`TranscodeError::UnknownSetting`].

use std::process::Command;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::renderers::lilypond::errors::{SettingsError, TranscodeError, TranscodeResult};

/// Recognised setting names
pub const SETTING_KEYS: [&str; 8] = [
    "bar numbers",
    "tagline",
    "indent",
    "print_instrument_names",
    "paper_size",
    "lilypond_path",
    "lilypond_version",
    "lilypond_version_numbers",
];

/// What to do with objects the renderer can't classify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementPolicy {
    /// Log a warning and skip the object
    #[default]
    Lenient,
    /// Fail with [`TranscodeError::UnrecognizedElement`]
    Strict,
}

/// A setting value as seen through the name-based accessors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Flag(bool),
    Version(u64, u64, u64),
    Unset,
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Text(s)
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Flag(b)
    }
}

impl From<Option<String>> for SettingValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(SettingValue::Unset, SettingValue::Text)
    }
}

/// Configuration options for LilyPond output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Value for `Score.BarNumber #'break-visibility`, e.g. `#end-of-line-invisible`
    #[serde(rename = "bar numbers", alias = "bar_numbers")]
    pub bar_numbers: Option<String>,

    /// `None` prints an empty tagline; `Some("")` keeps LilyPond's default
    pub tagline: Option<String>,

    /// Value for the `indent` layout variable, e.g. `#0`
    pub indent: Option<String>,

    pub print_instrument_names: bool,

    pub paper_size: String,

    pub lilypond_path: String,

    pub lilypond_version: String,

    pub lilypond_version_numbers: (u64, u64, u64),

    /// Handling of unrecognized objects in measures, parts and scores
    pub element_policy: ElementPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bar_numbers: None,
            tagline: Some(String::new()),
            indent: None,
            print_instrument_names: true,
            paper_size: "letter".to_string(),
            lilypond_path: "/usr/bin/lilypond".to_string(),
            lilypond_version: "2.16.0".to_string(),
            lilypond_version_numbers: (2, 16, 0),
            element_policy: ElementPolicy::Lenient,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from YAML; missing fields take their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_yaml::from_str(yaml)?;
        settings.sync_version_numbers()?;
        Ok(settings)
    }

    /// Load settings from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sync_version_numbers()?;
        Ok(settings)
    }

    fn sync_version_numbers(&mut self) -> Result<(), SettingsError> {
        self.lilypond_version_numbers = make_lily_version_numbers(&self.lilypond_version)?;
        Ok(())
    }

    pub fn is_strict(&self) -> bool {
        self.element_policy == ElementPolicy::Strict
    }

    /// Read a setting by name
    pub fn get(&self, key: &str) -> TranscodeResult<SettingValue> {
        let value: SettingValue = match key {
            "bar numbers" => self.bar_numbers.clone().into(),
            "tagline" => self.tagline.clone().into(),
            "indent" => self.indent.clone().into(),
            "print_instrument_names" => SettingValue::Flag(self.print_instrument_names),
            "paper_size" => SettingValue::Text(self.paper_size.clone()),
            "lilypond_path" => SettingValue::Text(self.lilypond_path.clone()),
            "lilypond_version" => SettingValue::Text(self.lilypond_version.clone()),
            "lilypond_version_numbers" => {
                let (major, minor, patch) = self.lilypond_version_numbers;
                SettingValue::Version(major, minor, patch)
            }
            _ => return Err(TranscodeError::UnknownSetting(key.to_string())),
        };
        Ok(value)
    }

    /// Change a setting by name.
    ///
    /// Setting `lilypond_version` also refreshes `lilypond_version_numbers`.
    pub fn set<V: Into<SettingValue>>(&mut self, key: &str, value: V) -> TranscodeResult<()> {
        let value: SettingValue = value.into();
        let invalid = |reason: &str| TranscodeError::InvalidSettingValue {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        match key {
            "bar numbers" => {
                self.bar_numbers = optional_text(value).ok_or_else(|| invalid("expected text"))?
            }
            "tagline" => {
                self.tagline = optional_text(value).ok_or_else(|| invalid("expected text"))?
            }
            "indent" => {
                self.indent = optional_text(value).ok_or_else(|| invalid("expected text"))?
            }
            "print_instrument_names" => match value {
                SettingValue::Flag(flag) => self.print_instrument_names = flag,
                _ => return Err(invalid("expected a flag")),
            },
            "paper_size" => {
                self.paper_size = required_text(value).ok_or_else(|| invalid("expected text"))?
            }
            "lilypond_path" => {
                self.lilypond_path = required_text(value).ok_or_else(|| invalid("expected text"))?
            }
            "lilypond_version" => {
                let version = required_text(value).ok_or_else(|| invalid("expected text"))?;
                self.lilypond_version_numbers = make_lily_version_numbers(&version)
                    .map_err(|e| invalid(&e.to_string()))?;
                self.lilypond_version = version;
            }
            "lilypond_version_numbers" => match value {
                SettingValue::Version(major, minor, patch) => {
                    self.lilypond_version_numbers = (major, minor, patch)
                }
                _ => return Err(invalid("expected a version triple")),
            },
            _ => return Err(TranscodeError::UnknownSetting(key.to_string())),
        }
        Ok(())
    }

    /// Settings with path and version taken from the installed LilyPond
    pub fn detected() -> Result<Self, SettingsError> {
        let (path, version) = detect_lilypond()?;
        let mut settings = Settings::default();
        settings.lilypond_version_numbers = make_lily_version_numbers(&version)?;
        settings.lilypond_path = path;
        settings.lilypond_version = version;
        Ok(settings)
    }
}

fn optional_text(value: SettingValue) -> Option<Option<String>> {
    match value {
        SettingValue::Text(text) => Some(Some(text)),
        SettingValue::Unset => Some(None),
        _ => None,
    }
}

fn required_text(value: SettingValue) -> Option<String> {
    match value {
        SettingValue::Text(text) => Some(text),
        _ => None,
    }
}

/// Split a `major.minor.patch` version string into numbers
pub fn make_lily_version_numbers(version: &str) -> Result<(u64, u64, u64), SettingsError> {
    let invalid = || SettingsError::InvalidVersion(version.to_string());
    let mut parts = version.trim().split('.');
    let mut next = || -> Result<u64, SettingsError> {
        parts
            .next()
            .and_then(|p| p.parse::<u64>().ok())
            .ok_or_else(invalid)
    };
    let numbers = (next()?, next()?, next()?);
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(numbers)
}

static VERSION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"GNU LilyPond (\d+\.\d+\.\d+)").expect("static regex"));

/// Pull the version out of `lilypond --version` output
pub fn parse_lilypond_version_output(output: &str) -> Option<String> {
    VERSION_LINE
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Find LilyPond on the `PATH` and ask it for its version.
///
/// Returns `(path, version)`.
pub fn detect_lilypond() -> Result<(String, String), SettingsError> {
    let which = Command::new("which")
        .arg("lilypond")
        .output()
        .map_err(|e| SettingsError::Detection(e.to_string()))?;
    let path = String::from_utf8_lossy(&which.stdout).trim().to_string();
    if path.is_empty() {
        return Err(SettingsError::Detection("lilypond not found on PATH".to_string()));
    }

    let version_output = Command::new(&path)
        .arg("--version")
        .output()
        .map_err(|e| SettingsError::Detection(e.to_string()))?;
    let text = String::from_utf8_lossy(&version_output.stdout);
    let version = parse_lilypond_version_output(&text)
        .ok_or_else(|| SettingsError::Detection(format!("unexpected version output: {}", text.trim())))?;

    log::debug!("Detected LilyPond {} at {}", version, path);
    Ok((path, version))
}
