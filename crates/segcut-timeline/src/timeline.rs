//! The segment store: a fixed duration and its ordered segment sequence.
//!
//! A `Timeline` is a plain value. Every operation works on a copy and the
//! copy only replaces the committed one once [`Timeline::validate`] accepts it, so
//! a rejected edit is never observable.

use crate::error::{EditError, Result};
use crate::segment::Segment;
use serde::{Deserialize, Serialize};

/// Base identifier used when the source file is unknown.
pub const DEFAULT_BASE_NAME: &str = "output";

/// Full duration plus its ordered segment decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    duration: f64,
    base_name: String,
    segments: Vec<Segment>,
}

/// One entry of the cut list handed to the export collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutSpec {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub output_name: String,
}

impl Timeline {
    /// Create an empty timeline for media of the given duration.
    pub fn new(duration: f64) -> Result<Self> {
        Self::with_base_name(duration, DEFAULT_BASE_NAME)
    }

    /// Create an empty timeline whose generated names use `base_name`.
    pub fn with_base_name(duration: f64, base_name: impl Into<String>) -> Result<Self> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(EditError::InvalidDuration(duration));
        }
        Ok(Self {
            duration,
            base_name: base_name.into(),
            segments: Vec::new(),
        })
    }

    /// Build a timeline from existing segments, validating them.
    pub fn from_segments(
        duration: f64,
        base_name: impl Into<String>,
        segments: Vec<Segment>,
    ) -> Result<Self> {
        let mut timeline = Self::with_base_name(duration, base_name)?;
        timeline.segments = segments;
        timeline.validate()?;
        Ok(timeline)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        if index < self.segments.len() {
            Ok(())
        } else {
            Err(EditError::IndexOutOfBounds {
                index,
                len: self.segments.len(),
            })
        }
    }

    /// Position and start of the first locked segment after `index`.
    ///
    /// Falls back to the sequence length and the timeline duration when no
    /// anchor follows.
    pub fn next_anchor(&self, index: usize) -> (usize, f64) {
        self.segments
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, s)| s.locked)
            .map(|(i, s)| (i, s.start))
            .unwrap_or((self.segments.len(), self.duration))
    }

    /// Check the invariants every committed timeline must satisfy.
    ///
    /// Segments must be sorted by start and each one must lie inside
    /// `[0, duration]` with a positive width. Gaps are allowed (deleting a
    /// segment leaves one) and anchors are not cross-checked here; see
    /// [`Timeline::check_anchors`].
    pub fn validate(&self) -> Result<()> {
        for (i, seg) in self.segments.iter().enumerate() {
            if seg.start < 0.0 {
                return Err(EditError::OutOfRange {
                    value: seg.start,
                    limit: self.duration,
                });
            }
            if !(seg.end > seg.start) {
                return Err(EditError::InvalidRange {
                    start: seg.start,
                    end: seg.end,
                });
            }
            if seg.end > self.duration {
                return Err(EditError::OutOfRange {
                    value: seg.end,
                    limit: self.duration,
                });
            }
            if i > 0 && seg.start < self.segments[i - 1].start {
                return Err(EditError::Unordered { index: i - 1 });
            }
        }
        Ok(())
    }

    /// Find locked segments that are out of order or overlap each other.
    ///
    /// Returns the positions of each offending pair. The generator assumes
    /// sorted, disjoint anchors; this check is opt-in.
    pub fn check_anchors(&self) -> Vec<(usize, usize)> {
        let anchors: Vec<(usize, &Segment)> = self
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.locked)
            .collect();

        anchors
            .windows(2)
            .filter(|pair| pair[1].1.start < pair[0].1.end)
            .map(|pair| (pair[0].0, pair[1].0))
            .collect()
    }

    /// Sum of uncovered time between `0` and `duration`.
    pub fn uncovered(&self) -> f64 {
        let mut cursor = 0.0;
        let mut gap = 0.0;
        for seg in &self.segments {
            if seg.start > cursor {
                gap += seg.start - cursor;
            }
            cursor = f64::max(cursor, seg.end);
        }
        gap + (self.duration - cursor).max(0.0)
    }

    /// The ordered cut list for the export collaborator.
    pub fn cut_list(&self) -> Vec<CutSpec> {
        self.segments
            .iter()
            .map(|s| CutSpec {
                start_seconds: s.start,
                end_seconds: s.end,
                output_name: s.output_name.clone(),
            })
            .collect()
    }
}
