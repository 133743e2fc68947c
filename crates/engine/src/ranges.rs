use serde::{Deserialize, Serialize};

use crate::clip::{Clip, ClipId};
use crate::time::GAP_TOLERANCE;

/// One derived region of the virtual timeline.
///
/// Ranges are recomputed whenever the clip set changes and never persisted.
/// Together they are disjoint, contiguous and cover `[0, duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineRange {
    Clip {
        start: f64,
        duration: f64,
        clip_id: ClipId,
    },
    Gap {
        start: f64,
        duration: f64,
    },
}

impl TimelineRange {
    pub fn start(&self) -> f64 {
        match self {
            Self::Clip { start, .. } | Self::Gap { start, .. } => *start,
        }
    }

    pub fn duration(&self) -> f64 {
        match self {
            Self::Clip { duration, .. } | Self::Gap { duration, .. } => *duration,
        }
    }

    pub fn end(&self) -> f64 {
        self.start() + self.duration()
    }

    pub fn contains(&self, seconds: f64) -> bool {
        self.start() <= seconds && seconds < self.end()
    }

    pub fn clip_id(&self) -> Option<ClipId> {
        match self {
            Self::Clip { clip_id, .. } => Some(*clip_id),
            Self::Gap { .. } => None,
        }
    }
}

/// Walks normalized clips and derives the covering range list.
///
/// A gap is emitted wherever the next clip starts more than the tolerance
/// past the cursor. Trailing space after the last clip is not playable and
/// gets no range.
pub fn compute_ranges(clips: &[Clip]) -> Vec<TimelineRange> {
    let mut ranges = Vec::with_capacity(clips.len() * 2);
    let mut cursor = 0.0_f64;

    for clip in clips {
        if clip.start > cursor + GAP_TOLERANCE {
            ranges.push(TimelineRange::Gap {
                start: cursor,
                duration: clip.start - cursor,
            });
            cursor = clip.start;
        }

        // The range starts at the cursor, absorbing sub-tolerance joins and
        // transient overlaps, so the list stays contiguous and disjoint.
        let end = clip.end();
        if end <= cursor {
            continue;
        }
        ranges.push(TimelineRange::Clip {
            start: cursor,
            duration: end - cursor,
            clip_id: clip.id,
        });
        cursor = end;
    }

    ranges
}

/// Total playable duration: the end of the last range, 0 when empty.
pub fn timeline_duration(ranges: &[TimelineRange]) -> f64 {
    ranges.last().map(TimelineRange::end).unwrap_or(0.0)
}

/// Finds the range containing `seconds`, if any.
pub fn range_at(ranges: &[TimelineRange], seconds: f64) -> Option<&TimelineRange> {
    ranges.iter().find(|range| range.contains(seconds))
}

#[cfg(test)]
mod tests {
    use super::{TimelineRange, compute_ranges, range_at, timeline_duration};
    use crate::clip::Clip;
    use crate::media::{MediaKind, MediaRef};

    fn clip(id: u64, start: f64, duration: f64) -> Clip {
        Clip {
            id,
            media: MediaRef {
                id: 100 + id,
                kind: MediaKind::Video,
                locator: format!("media://{id}"),
                duration: Some(duration),
            },
            start,
            base_duration: duration,
            trim_start: 0.0,
            trim_end: duration,
        }
    }

    #[test]
    fn contiguous_clips_produce_no_gap() {
        let ranges = compute_ranges(&[clip(1, 0.0, 5.0), clip(2, 5.0, 3.0)]);
        assert_eq!(ranges.len(), 2);
        assert!(matches!(ranges[0], TimelineRange::Clip { clip_id: 1, .. }));
        assert!(matches!(ranges[1], TimelineRange::Clip { clip_id: 2, .. }));
        assert_eq!(timeline_duration(&ranges), 8.0);
    }

    #[test]
    fn distant_clips_get_a_gap_range_between_them() {
        let ranges = compute_ranges(&[clip(1, 0.0, 5.0), clip(2, 8.0, 2.0)]);
        assert_eq!(ranges.len(), 3);
        let TimelineRange::Gap { start, duration } = ranges[1] else {
            panic!("middle range must be a gap");
        };
        assert_eq!(start, 5.0);
        assert_eq!(duration, 3.0);
        assert_eq!(timeline_duration(&ranges), 10.0);
    }

    #[test]
    fn leading_space_before_first_clip_is_a_gap() {
        let ranges = compute_ranges(&[clip(1, 2.0, 5.0)]);
        assert_eq!(ranges.len(), 2);
        assert!(matches!(ranges[0], TimelineRange::Gap { .. }));
        assert_eq!(ranges[0].start(), 0.0);
        assert_eq!(ranges[0].end(), 2.0);
    }

    #[test]
    fn joins_within_tolerance_emit_no_gap() {
        let ranges = compute_ranges(&[clip(1, 0.0, 5.0), clip(2, 5.005, 2.0)]);
        assert_eq!(ranges.len(), 2);
    }

    #[test]
    fn no_trailing_gap_after_final_clip() {
        let ranges = compute_ranges(&[clip(1, 0.0, 5.0)]);
        assert_eq!(ranges.len(), 1);
        assert_eq!(timeline_duration(&ranges), 5.0);
    }

    #[test]
    fn empty_clip_list_yields_no_ranges() {
        let ranges = compute_ranges(&[]);
        assert!(ranges.is_empty());
        assert_eq!(timeline_duration(&ranges), 0.0);
    }

    #[test]
    fn ranges_are_disjoint_contiguous_and_cover_the_timeline() {
        let clips = [
            clip(1, 0.5, 2.0),
            clip(2, 2.5, 1.0),
            clip(3, 7.0, 3.0),
            clip(4, 10.0, 0.5),
        ];
        let ranges = compute_ranges(&clips);

        assert_eq!(ranges[0].start(), 0.0);
        for pair in ranges.windows(2) {
            assert!(
                (pair[0].end() - pair[1].start()).abs() < 1e-9,
                "ranges must be contiguous: {pair:?}"
            );
        }
        assert_eq!(timeline_duration(&ranges), 10.5);
    }

    #[test]
    fn range_at_resolves_boundaries_to_the_later_range() {
        let ranges = compute_ranges(&[clip(1, 0.0, 5.0), clip(2, 5.0, 3.0)]);
        assert_eq!(range_at(&ranges, 5.0).and_then(|r| r.clip_id()), Some(2));
        assert_eq!(range_at(&ranges, 4.999).and_then(|r| r.clip_id()), Some(1));
        assert!(range_at(&ranges, 8.0).is_none());
        assert!(range_at(&ranges, -0.1).is_none());
    }

    #[test]
    fn overlapping_placements_never_produce_overlapping_ranges() {
        let ranges = compute_ranges(&[clip(1, 0.0, 5.0), clip(2, 4.0, 3.0)]);
        for pair in ranges.windows(2) {
            assert!(pair[0].end() <= pair[1].start() + 1e-9);
        }
    }
}
