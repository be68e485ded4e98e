//! Bulk segmentation of a timeline.

use crate::error::{EditError, Result};
use crate::naming::{renumber, NameTemplate};
use crate::segment::Segment;
use crate::time::SegmentLength;
use crate::timeline::Timeline;

/// Remainders shorter than this are absorbed instead of becoming slivers.
pub const TAIL_TOLERANCE: f64 = 0.1;

/// Upper bound on the segments a single fill may produce.
pub const MAX_SEGMENTS: usize = 100_000;

/// Reject a `length` that would cut `span` seconds into more than
/// [`MAX_SEGMENTS`] pieces.
pub(crate) fn check_segment_count(span: f64, length: f64) -> Result<()> {
    if span / length > MAX_SEGMENTS as f64 {
        return Err(EditError::InvalidLength { length });
    }
    Ok(())
}

/// Fill `[start, end)` with consecutive segments of `length` seconds.
///
/// The last segment is clamped to `end`, and a tail shorter than
/// [`TAIL_TOLERANCE`] is merged into the segment before it. A region shorter
/// than the tolerance produces nothing.
pub fn fill_region(start: f64, end: f64, length: f64) -> Vec<Segment> {
    let mut out = Vec::new();
    if !(length > 0.0) {
        return out;
    }

    let mut t = start;
    while t < end - TAIL_TOLERANCE {
        let mut next = f64::min(t + length, end);
        if end - next < TAIL_TOLERANCE {
            next = end;
        }
        if next <= t {
            break;
        }
        out.push(Segment::new(t, next));
        t = next;
    }
    out
}

impl Timeline {
    /// Produce a full replacement segmentation.
    ///
    /// Without `keep_locked` (or without any locked segment) the whole
    /// duration is filled. Otherwise locked segments are kept verbatim as
    /// anchors and only the regions around them are filled. Anchors are
    /// assumed to be sorted and disjoint; nothing corrects them.
    ///
    /// A length so short that the duration would need more than
    /// [`MAX_SEGMENTS`] segments is rejected with `InvalidLength`.
    pub fn generate(
        &self,
        length: SegmentLength,
        keep_locked: bool,
        template: &NameTemplate,
    ) -> Result<Timeline> {
        let len = length.as_secs();
        check_segment_count(self.duration(), len)?;

        let mut anchors: Vec<&Segment> = if keep_locked {
            self.segments().iter().filter(|s| s.locked).collect()
        } else {
            Vec::new()
        };
        anchors.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut segments = Vec::with_capacity(self.len().max(1));
        if anchors.is_empty() {
            segments.extend(fill_region(0.0, self.duration(), len));
        } else {
            if anchors[0].start > 0.0 {
                segments.extend(fill_region(0.0, anchors[0].start, len));
            }
            for (i, anchor) in anchors.iter().enumerate() {
                segments.push((*anchor).clone());
                let next_start = anchors
                    .get(i + 1)
                    .map(|a| a.start)
                    .unwrap_or(self.duration());
                if anchor.end < next_start {
                    segments.extend(fill_region(anchor.end, next_start, len));
                }
            }
        }

        segments.sort_by(|a, b| a.start.total_cmp(&b.start));
        renumber(&mut segments, template, self.base_name());

        let mut next = self.clone();
        *next.segments_mut() = segments;
        next.validate()?;

        tracing::debug!(
            segments = next.len(),
            anchors = anchors.len(),
            length = len,
            "generated segmentation"
        );
        Ok(next)
    }
}
