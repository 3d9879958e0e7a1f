//! Serde helpers for rational quarter lengths
//!
//! Quarter lengths are read either as plain numbers (`0.25`, `3`) or as
//! `"n/d"` strings (`"1/3"`), and always written as `"n/d"` strings so that
//! tuplet lengths survive a round trip.

use num_rational::Rational64;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuarterLength {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Parse `"n/d"`, `"n"` or a decimal like `"0.375"`
pub fn parse_quarter_length(text: &str) -> Option<Rational64> {
    let text = text.trim();
    if let Some((numer, denom)) = text.split_once('/') {
        let numer: i64 = numer.trim().parse().ok()?;
        let denom: i64 = denom.trim().parse().ok()?;
        if denom == 0 {
            return None;
        }
        return Some(Rational64::new(numer, denom));
    }
    if let Ok(whole) = text.parse::<i64>() {
        return Some(Rational64::from_integer(whole));
    }
    text.parse::<f64>().ok().and_then(Rational64::approximate_float)
}

pub mod quarter_length {
    use super::*;

    pub fn serialize<S>(value: &Rational64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Rational64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawQuarterLength::deserialize(deserializer)?;
        let parsed = match raw {
            RawQuarterLength::Integer(whole) => Some(Rational64::from_integer(whole)),
            RawQuarterLength::Float(f) => Rational64::approximate_float(f),
            RawQuarterLength::Text(ref text) => parse_quarter_length(text),
        };
        parsed.ok_or_else(|| serde::de::Error::custom("invalid quarter length"))
    }
}

/// Same as [`quarter_length`], for offsets that may be omitted
pub mod optional_quarter_length {
    use super::*;

    pub fn serialize<S>(value: &Option<Rational64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_some(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Rational64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawQuarterLength>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(RawQuarterLength::Integer(whole)) => Ok(Some(Rational64::from_integer(whole))),
            Some(RawQuarterLength::Float(f)) => Rational64::approximate_float(f)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom("invalid quarter length")),
            Some(RawQuarterLength::Text(text)) => parse_quarter_length(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom("invalid quarter length")),
        }
    }
}
