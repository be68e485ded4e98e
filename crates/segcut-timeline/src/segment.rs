//! Segment records and their identifiers.

use crate::time::format_timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a segment.
///
/// Anchors keep their identifier across regeneration; every segment the
/// generator or cascade creates gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(Uuid);

impl SegmentId {
    /// Generate a new random segment ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SegmentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One named, time-bounded slice of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: SegmentId,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub output_name: String,
}

impl Segment {
    /// Create an unlocked, unnamed segment. The namer assigns its name.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            id: SegmentId::new(),
            start,
            end,
            locked: false,
            output_name: String::new(),
        }
    }

    /// Builder-style lock, mostly useful in tests and fixtures.
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{} {}{}",
            format_timestamp(self.start),
            format_timestamp(self.end),
            self.output_name,
            if self.locked { " [locked]" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_serialization_uses_camel_case() {
        let seg = Segment::new(0.0, 60.0).with_name("segment_01");
        let json = serde_json::to_value(&seg).unwrap();
        assert_eq!(json["outputName"], "segment_01");
        assert_eq!(json["locked"], false);
        assert_eq!(json["end"], 60.0);
    }

    #[test]
    fn test_segment_deserialize_defaults() {
        let json = r#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","start":1.0,"end":2.0}"#;
        let seg: Segment = serde_json::from_str(json).unwrap();
        assert!(!seg.locked);
        assert!(seg.output_name.is_empty());
        assert_eq!(seg.width(), 1.0);
    }

    #[test]
    fn test_segment_ids_are_unique() {
        assert_ne!(SegmentId::new(), SegmentId::new());
    }

    #[test]
    fn test_segment_display() {
        let seg = Segment::new(60.0, 120.0).with_name("b").with_locked(true);
        assert_eq!(seg.to_string(), "00:01:00-00:02:00 b [locked]");
    }
}
