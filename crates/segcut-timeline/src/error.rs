//! Error types for segcut-timeline.
//!
//! Every variant describes a rejected edit. Rejections are never fatal: the
//! committed timeline stays exactly as it was and the caller is expected to
//! re-present the previous value.

use crate::time::format_timestamp;

fn ts(seconds: &f64) -> String {
    format_timestamp(*seconds)
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, EditError>;

/// Reasons an edit is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// The segment length is missing, non-positive or could not be parsed.
    #[error("invalid segment length: {length} (use HH:MM:SS or a number of seconds)")]
    InvalidLength { length: f64 },

    /// A segment would end at or before its start.
    #[error("end {} must be after start {}", ts(.end), ts(.start))]
    InvalidRange { start: f64, end: f64 },

    /// An edit would move a boundary across a locked neighbor.
    #[error("{} conflicts with locked segment ending at {}", ts(.value), ts(.locked_end))]
    BoundaryConflict { value: f64, locked_end: f64 },

    /// A shifted start falls outside `[0, limit)`.
    #[error("{} is outside the allowed range 00:00:00..{}", ts(.value), ts(.limit))]
    OutOfRange { value: f64, limit: f64 },

    /// The timeline duration is not positive.
    #[error("invalid timeline duration: {0}")]
    InvalidDuration(f64),

    /// No segment exists at the given position.
    #[error("no segment at index {index} (timeline has {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The first segment's start is pinned and cannot be shifted.
    #[error("segment {index} cannot be shifted")]
    PinnedSegment { index: usize },

    /// An edit moved a segment's start past the segment after it.
    #[error("segment {index} would start after the segment following it")]
    Unordered { index: usize },

    /// Two locked segments are out of order or overlap (strict anchor mode only).
    #[error("locked segments {first} and {second} overlap or are out of order")]
    AnchorOverlap { first: usize, second: usize },
}

impl EditError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidLength { .. } => "invalid_length",
            Self::InvalidRange { .. } => "invalid_range",
            Self::BoundaryConflict { .. } => "boundary_conflict",
            Self::OutOfRange { .. } => "out_of_range",
            Self::InvalidDuration(_) => "invalid_duration",
            Self::IndexOutOfBounds { .. } => "index_out_of_bounds",
            Self::PinnedSegment { .. } => "pinned_segment",
            Self::Unordered { .. } => "unordered",
            Self::AnchorOverlap { .. } => "anchor_overlap",
        }
    }

    /// The boundary value that caused the rejection, when there is one.
    pub fn offending_value(&self) -> Option<f64> {
        match self {
            Self::InvalidLength { length } => Some(*length),
            Self::InvalidRange { end, .. } => Some(*end),
            Self::BoundaryConflict { value, .. } | Self::OutOfRange { value, .. } => Some(*value),
            Self::InvalidDuration(duration) => Some(*duration),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EditError::BoundaryConflict {
            value: 50.0,
            locked_end: 60.0,
        };
        assert_eq!(
            err.to_string(),
            "00:00:50 conflicts with locked segment ending at 00:01:00"
        );

        let err = EditError::OutOfRange {
            value: 130.0,
            limit: 125.0,
        };
        assert_eq!(
            err.to_string(),
            "00:02:10 is outside the allowed range 00:00:00..00:02:05"
        );

        let err = EditError::InvalidRange {
            start: 60.0,
            end: 30.0,
        };
        assert_eq!(err.to_string(), "end 00:00:30 must be after start 00:01:00");
    }

    #[test]
    fn test_error_kind_and_value() {
        let err = EditError::InvalidLength { length: 0.0 };
        assert_eq!(err.kind(), "invalid_length");
        assert_eq!(err.offending_value(), Some(0.0));

        let err = EditError::IndexOutOfBounds { index: 4, len: 2 };
        assert_eq!(err.kind(), "index_out_of_bounds");
        assert_eq!(err.offending_value(), None);
    }
}
