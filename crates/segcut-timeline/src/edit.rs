//! Single-segment edits.
//!
//! Each edit returns a new timeline or the reason it was rejected. The
//! receiver is never modified.

use crate::cascade::FALLBACK_LENGTH;
use crate::error::{EditError, Result};
use crate::naming::renumber;
use crate::segment::Segment;
use crate::settings::EngineSettings;
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};

/// Width of appended segments and of a segment whose start was pushed past
/// its end.
pub const DEFAULT_WIDTH: f64 = FALLBACK_LENGTH;

/// Which boundary of a segment an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    Start,
    End,
}

impl std::str::FromStr for Boundary {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            _ => Err(format!("Unknown boundary: {}", s)),
        }
    }
}

impl Timeline {
    /// Move one boundary of segment `index` to `value` seconds.
    ///
    /// Moving a start drags an unlocked predecessor's end along and refuses
    /// to cross a locked predecessor. Moving an end cascades the region after
    /// the segment.
    ///
    /// A start moved to or past its own end pushes the end to
    /// `min(start + DEFAULT_WIDTH, duration)`. That push does not cascade, so
    /// the segment may overlap the ones after it until the next end edit or
    /// generate. Only order by start is enforced here.
    pub fn set_boundary(
        &self,
        index: usize,
        field: Boundary,
        value: f64,
        settings: &EngineSettings,
    ) -> Result<Timeline> {
        self.check_index(index)?;
        let mut next = self.clone();
        let duration = next.duration();

        match field {
            Boundary::Start => {
                if !(value >= 0.0) {
                    return Err(EditError::OutOfRange {
                        value,
                        limit: duration,
                    });
                }

                let segments = next.segments_mut();
                if index > 0 {
                    let prev = &mut segments[index - 1];
                    if prev.locked {
                        if value < prev.end {
                            return Err(EditError::BoundaryConflict {
                                value,
                                locked_end: prev.end,
                            });
                        }
                    } else {
                        prev.end = value;
                    }
                }

                let seg = &mut segments[index];
                seg.start = value;
                if seg.start >= seg.end {
                    seg.end = f64::min(seg.start + DEFAULT_WIDTH, duration);
                }
            }
            Boundary::End => {
                let seg = &mut next.segments_mut()[index];
                if !(value > seg.start) {
                    return Err(EditError::InvalidRange {
                        start: seg.start,
                        end: value,
                    });
                }
                seg.end = value;
                next.cascade_in_place(index, settings.segment_length, &settings.name_template)?;
            }
        }

        next.validate()?;
        Ok(next)
    }

    /// Move segment `index` by `delta` seconds, keeping its width.
    ///
    /// A zero or non-finite delta leaves the timeline as it is. The new start
    /// must stay inside `[0, limit)` where `limit` is the start of the next
    /// locked segment, or the duration.
    pub fn shift(&self, index: usize, delta: f64, settings: &EngineSettings) -> Result<Timeline> {
        self.check_index(index)?;
        if !delta.is_finite() || delta == 0.0 {
            return Ok(self.clone());
        }
        if index == 0 {
            return Err(EditError::PinnedSegment { index });
        }

        let (_, limit) = self.next_anchor(index);
        let seg = &self.segments()[index];
        let new_start = seg.start + delta;
        if new_start >= limit || new_start < 0.0 {
            return Err(EditError::OutOfRange {
                value: new_start,
                limit,
            });
        }

        let mut next = self.clone();
        let segments = next.segments_mut();
        let width = segments[index].width();
        segments[index].start = new_start;
        segments[index].end = new_start + width;

        let prev = &mut segments[index - 1];
        if !prev.locked {
            prev.end = new_start;
        } else if new_start < prev.end {
            return Err(EditError::BoundaryConflict {
                value: new_start,
                locked_end: prev.end,
            });
        }

        next.cascade_in_place(index, settings.segment_length, &settings.name_template)?;
        next.validate()?;
        Ok(next)
    }

    /// Lock or unlock segment `index`. Names are not touched.
    pub fn set_locked(&self, index: usize, locked: bool) -> Result<Timeline> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.segments_mut()[index].locked = locked;
        Ok(next)
    }

    pub fn toggle_lock(&self, index: usize) -> Result<Timeline> {
        self.check_index(index)?;
        let locked = self.segments()[index].locked;
        self.set_locked(index, !locked)
    }

    /// Give segment `index` a manual output name.
    ///
    /// Unlocked segments lose the name again at the next renumbering.
    pub fn rename(&self, index: usize, name: &str) -> Result<Timeline> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.segments_mut()[index].output_name = name.to_string();
        Ok(next)
    }

    /// Remove segment `index`. The gap it leaves is not filled.
    pub fn delete(&self, index: usize, settings: &EngineSettings) -> Result<Timeline> {
        self.check_index(index)?;
        let mut next = self.clone();
        let base = next.base_name().to_string();
        let segments = next.segments_mut();
        segments.remove(index);
        renumber(segments, &settings.name_template, &base);
        Ok(next)
    }

    /// Add a one-minute segment after the last one, clamped to the duration.
    pub fn append(&self, settings: &EngineSettings) -> Result<Timeline> {
        let start = self.segments().last().map(|s| s.end).unwrap_or(0.0);
        let end = f64::min(start + DEFAULT_WIDTH, self.duration());

        let mut next = self.clone();
        let base = next.base_name().to_string();
        let segments = next.segments_mut();
        segments.push(Segment::new(start, end));
        renumber(segments, &settings.name_template, &base);

        next.validate()?;
        Ok(next)
    }

    /// Remove every segment.
    pub fn clear(&self) -> Timeline {
        let mut next = self.clone();
        next.segments_mut().clear();
        next
    }
}
