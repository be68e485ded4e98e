//! Regeneration of the unlocked region that follows an edited segment.

use crate::error::Result;
use crate::generate::{check_segment_count, fill_region};
use crate::naming::{renumber, NameTemplate};
use crate::segment::Segment;
use crate::time::SegmentLength;
use crate::timeline::Timeline;

/// Length used when no valid segment length is configured.
pub const FALLBACK_LENGTH: f64 = 60.0;

impl Timeline {
    /// Rebuild everything between segment `from` and the next anchor.
    ///
    /// The segment at `from` is clamped so it ends no later than the next
    /// locked segment (or the timeline end), and every segment strictly
    /// between the two is replaced by a fresh fill. Manual edits and names in
    /// that region are discarded.
    pub fn cascade(
        &self,
        from: usize,
        length: Option<SegmentLength>,
        template: &NameTemplate,
    ) -> Result<Timeline> {
        let mut next = self.clone();
        next.cascade_in_place(from, length, template)?;
        next.validate()?;
        Ok(next)
    }

    pub(crate) fn cascade_in_place(
        &mut self,
        from: usize,
        length: Option<SegmentLength>,
        template: &NameTemplate,
    ) -> Result<()> {
        self.check_index(from)?;

        let (limit_index, limit) = self.next_anchor(from);
        let len = length.map(|l| l.as_secs()).unwrap_or(FALLBACK_LENGTH);
        let region_start = f64::min(self.segments()[from].end, limit);
        check_segment_count(limit - region_start, len)?;

        let base = self.base_name().to_string();
        let segments = self.segments_mut();
        if segments[from].end > limit {
            segments[from].end = limit;
        }

        let fresh = fill_region(segments[from].end, limit, len);
        let created = fresh.len();
        let replaced: Vec<Segment> = segments.splice(from + 1..limit_index, fresh).collect();

        renumber(segments, template, &base);

        tracing::trace!(from, limit, replaced = replaced.len(), created, "cascaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(tl: &Timeline) -> Vec<(f64, f64)> {
        tl.segments().iter().map(|s| (s.start, s.end)).collect()
    }

    fn scenario_a() -> Timeline {
        Timeline::with_base_name(125.0, "a")
            .unwrap()
            .generate(
                SegmentLength::new(60.0).unwrap(),
                false,
                &NameTemplate::default(),
            )
            .unwrap()
    }

    #[test]
    fn test_cascade_regenerates_after_shortened_segment() {
        let mut tl = scenario_a();
        tl.segments_mut()[0].end = 40.0;

        let out = tl
            .cascade(0, SegmentLength::new(60.0).ok(), &NameTemplate::default())
            .unwrap();
        assert_eq!(bounds(&out), vec![(0.0, 40.0), (40.0, 100.0), (100.0, 125.0)]);
    }

    #[test]
    fn test_cascade_stops_at_anchor() {
        let tl = Timeline::from_segments(
            200.0,
            "a",
            vec![
                Segment::new(0.0, 30.0),
                Segment::new(30.0, 60.0).with_name("manual"),
                Segment::new(60.0, 100.0),
                Segment::new(100.0, 200.0).with_locked(true).with_name("keep"),
            ],
        )
        .unwrap();

        let out = tl
            .cascade(0, SegmentLength::new(50.0).ok(), &NameTemplate::default())
            .unwrap();
        assert_eq!(
            bounds(&out),
            vec![(0.0, 30.0), (30.0, 80.0), (80.0, 100.0), (100.0, 200.0)]
        );
        assert_eq!(out.segments()[1].output_name, "segment_02");
        assert_eq!(out.segments()[3].output_name, "keep");
    }

    #[test]
    fn test_cascade_clamps_into_anchor() {
        let mut tl = Timeline::from_segments(
            200.0,
            "a",
            vec![
                Segment::new(0.0, 50.0),
                Segment::new(50.0, 100.0),
                Segment::new(100.0, 200.0).with_locked(true),
            ],
        )
        .unwrap();
        tl.segments_mut()[0].end = 150.0;

        let out = tl.cascade(0, None, &NameTemplate::default()).unwrap();
        assert_eq!(bounds(&out), vec![(0.0, 100.0), (100.0, 200.0)]);
    }

    #[test]
    fn test_cascade_uses_fallback_length() {
        let mut tl = Timeline::from_segments(200.0, "a", vec![Segment::new(0.0, 200.0)]).unwrap();
        tl.segments_mut()[0].end = 20.0;

        let out = tl.cascade(0, None, &NameTemplate::default()).unwrap();
        assert_eq!(
            bounds(&out),
            vec![(0.0, 20.0), (20.0, 80.0), (80.0, 140.0), (140.0, 200.0)]
        );
    }

    #[test]
    fn test_cascade_rejects_too_many_segments() {
        let mut tl = scenario_a();
        tl.segments_mut()[0].end = 5.0;
        let before = tl.clone();

        let err = tl
            .cascade(0, SegmentLength::new(0.0001).ok(), &NameTemplate::default())
            .unwrap_err();
        assert_eq!(err, crate::EditError::InvalidLength { length: 0.0001 });
        assert_eq!(tl, before);
    }

    #[test]
    fn test_cascade_bad_index() {
        let tl = scenario_a();
        assert!(tl.cascade(7, None, &NameTemplate::default()).is_err());
    }
}
