//! Conversion between seconds and `HH:MM:SS` display strings.
//!
//! Parsing never fails loudly: malformed input yields `0`, and callers that
//! need a positive value (segment lengths) treat `0` as "no valid value".

use crate::error::{EditError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format seconds as zero-padded `HH:MM:SS`, truncating fractional seconds.
///
/// ```
/// use segcut_timeline::format_timestamp;
///
/// assert_eq!(format_timestamp(125.9), "00:02:05");
/// assert_eq!(format_timestamp(3600.0), "01:00:00");
/// ```
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Parse `HH:MM:SS` into seconds.
///
/// Exactly three `:`-separated parts are required; anything else, or a part
/// that is not a number, yields `0`. Empty parts count as zero.
pub fn parse_timestamp(text: &str) -> f64 {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() != 3 {
        return 0.0;
    }

    let mut values = [0.0f64; 3];
    for (slot, part) in values.iter_mut().zip(&parts) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.parse::<f64>() {
            Ok(v) if v.is_finite() => *slot = v,
            _ => return 0.0,
        }
    }

    values[0] * 3600.0 + values[1] * 60.0 + values[2]
}

/// Parse a segment length: `HH:MM:SS`, or a bare integer number of seconds.
///
/// Bare input uses leading-integer semantics, so `"90s"` is 90 and `"1.5"`
/// is 1. Empty or unparseable input yields `0`.
pub fn parse_length(text: &str) -> f64 {
    let text = text.trim();
    if text.contains(':') {
        return parse_timestamp(text);
    }

    let digits_end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    text[..digits_end].parse::<i64>().map(|v| v as f64).unwrap_or(0.0)
}

/// A validated, strictly positive segment length in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SegmentLength(f64);

impl SegmentLength {
    /// Validate a length given in seconds.
    pub fn new(seconds: f64) -> Result<Self> {
        if seconds.is_finite() && seconds > 0.0 {
            Ok(Self(seconds))
        } else {
            Err(EditError::InvalidLength { length: seconds })
        }
    }

    /// Parse a length typed by a user (`HH:MM:SS` or seconds).
    pub fn parse(text: &str) -> Result<Self> {
        Self::new(parse_length(text))
    }

    pub fn as_secs(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for SegmentLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_timestamp(self.0))
    }
}

impl<'de> Deserialize<'de> for SegmentLength {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = TimeValue::deserialize(deserializer)?;
        Self::new(value.as_length()).map_err(serde::de::Error::custom)
    }
}

/// A time as it arrives from a caller: seconds, or text to be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Seconds(f64),
    Text(String),
}

impl TimeValue {
    /// Interpret as a boundary time (`HH:MM:SS` for text).
    pub fn as_timestamp(&self) -> f64 {
        match self {
            Self::Seconds(s) => *s,
            Self::Text(t) => parse_timestamp(t),
        }
    }

    /// Interpret as a segment length (`HH:MM:SS` or bare seconds for text).
    pub fn as_length(&self) -> f64 {
        match self {
            Self::Seconds(s) => *s,
            Self::Text(t) => parse_length(t),
        }
    }

    /// Interpret as a relative shift. `None` means "do nothing".
    pub fn as_delta(&self) -> Option<f64> {
        match self {
            Self::Seconds(s) if s.is_finite() && *s != 0.0 => Some(*s),
            Self::Seconds(_) => None,
            Self::Text(t) => parse_delta(t),
        }
    }
}

impl From<f64> for TimeValue {
    fn from(seconds: f64) -> Self {
        Self::Seconds(seconds)
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Unit of a relative shift entered by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftUnit {
    Minutes,
    #[default]
    Seconds,
}

impl ShiftUnit {
    /// Convert a delta in this unit to seconds.
    pub fn to_seconds(self, delta: f64) -> f64 {
        match self {
            Self::Minutes => delta * 60.0,
            Self::Seconds => delta,
        }
    }
}

impl std::str::FromStr for ShiftUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m" | "min" | "minutes" => Ok(Self::Minutes),
            "s" | "sec" | "seconds" => Ok(Self::Seconds),
            _ => Err(format!("Unknown shift unit: {}", s)),
        }
    }
}

/// Parse a relative shift. Zero or non-numeric input means "do nothing".
pub fn parse_delta(text: &str) -> Option<f64> {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v != 0.0 => Some(v),
        _ => None,
    }
}
