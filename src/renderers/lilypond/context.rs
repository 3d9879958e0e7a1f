//! Per-score rendering state
//!
//! Parts register here as they are emitted; the `\score` block reads the
//! registry back to reference each part's variable in order.

/// Letters available to identifier suffixes
const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Minimum suffix length of a generated part name
const NAME_WIDTH: usize = 4;

/// Registries built up while one score is rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreContext {
    part_names: Vec<String>,
    analysis_parts: Vec<String>,
}

impl ScoreContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next part identifier and return it.
    ///
    /// Identifiers are `part` plus a base-26 letter suffix of the registration
    /// index (`partaaaa`, `partaaab`, ...), so they never collide and stay
    /// letters-only as LilyPond requires.
    pub fn register_part(&mut self) -> String {
        let name = format!("part{}", letter_suffix(self.part_names.len()));
        self.part_names.push(name.clone());
        name
    }

    /// Mark a registered part as an analysis lane
    pub fn register_analysis(&mut self, name: &str) {
        if !self.is_analysis(name) {
            self.analysis_parts.push(name.to_string());
        }
    }

    pub fn is_analysis(&self, name: &str) -> bool {
        self.analysis_parts.iter().any(|n| n == name)
    }

    /// Registered part names, in registration order
    pub fn part_names(&self) -> &[String] {
        &self.part_names
    }

    pub fn analysis_parts(&self) -> &[String] {
        &self.analysis_parts
    }
}

/// Encode `index` as lowercase base-26 letters, at least four wide
fn letter_suffix(index: usize) -> String {
    let mut digits = Vec::with_capacity(NAME_WIDTH);
    let mut rest = index;
    loop {
        digits.push(ALPHABET[rest % 26]);
        rest /= 26;
        if rest == 0 && digits.len() >= NAME_WIDTH {
            break;
        }
    }
    digits.iter().rev().map(|&b| b as char).collect()
}
